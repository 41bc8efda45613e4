//! Repository layer for catalog persistence.
//!
//! # Responsibility
//! - Define the data-access contract used by the catalog service.
//! - Keep SQL details out of validation and business rules.
//!
//! # Invariants
//! - Writes call `Plant::validate()` before touching SQL.
//! - Zero-row updates and deletes surface as `RepoError::NotFound`.

pub mod plant_repo;
