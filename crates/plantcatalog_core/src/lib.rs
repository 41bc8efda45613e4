//! Core data access for the plant catalog.
//! Owns the `Plant` record, its validation rules and SQLite persistence.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::plant::{validate_catalog_number, Plant, PlantId, PlantValidationError};
pub use repo::plant_repo::{
    PlantKey, PlantListQuery, PlantRepository, RepoError, RepoResult, SqlitePlantRepository,
};
pub use service::plant_service::{PlantService, PlantServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
