//! Subcommand execution against a catalog database file.
//!
//! # Invariants
//! - Each call opens its own connection; nothing is cached between calls.
//! - Returned errors are the user-facing manager messages unchanged.

use log::error;
use plantcatalog_core::db::open_db;
use plantcatalog_core::{
    core_version, Plant, PlantService, PlantServiceError, PlantValidationError,
    SqlitePlantRepository,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;

/// One parsed CLI operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Add(String),
    Delete(String),
    List,
    Search(String),
    Get(String),
    Update(String),
    Version,
}

/// Runs `request` and renders its JSON result.
pub fn execute(db_path: &Path, request: Request) -> Result<Value, String> {
    match request {
        Request::Version => render(json!({ "version": core_version() })),
        Request::Add(payload) => {
            let plant = parse_plant_payload(&payload)?;
            with_plant_service(db_path, |service| match plant.as_ref() {
                Some(plant) => service.add_plant(plant),
                None => Err(PlantValidationError::MissingPlant.into()),
            })
        }
        Request::Update(payload) => {
            let plant = parse_plant_payload(&payload)?;
            with_plant_service(db_path, |service| service.update_plant(plant.as_ref()))
        }
        Request::Delete(catalog_number) => with_plant_service(db_path, |service| {
            service.delete_plant(&catalog_number)?;
            Ok(json!({ "deleted": catalog_number.trim() }))
        }),
        Request::List => with_plant_service(db_path, |service| service.get_all_plants()),
        Request::Search(food_type) => {
            with_plant_service(db_path, |service| service.search_by_food_type(&food_type))
        }
        Request::Get(catalog_number) => {
            with_plant_service(db_path, |service| service.get_plant(&catalog_number))
        }
    }
}

fn with_plant_service<T: Serialize>(
    db_path: &Path,
    f: impl FnOnce(&PlantService<SqlitePlantRepository<'_>>) -> Result<T, PlantServiceError>,
) -> Result<Value, String> {
    let conn = open_db(db_path).map_err(|err| format!("catalog DB open failed: {err}"))?;
    let repo = SqlitePlantRepository::try_new(&conn)
        .map_err(|err| format!("catalog repo init failed: {err}"))?;
    let service = PlantService::new(repo);
    let output = f(&service).map_err(|err| {
        if let PlantServiceError::Repo(source) = &err {
            error!("event=cli_command module=cli status=error error_code=repo_failure error={source}");
        }
        err.to_string()
    })?;
    render(output)
}

fn parse_plant_payload(payload: &str) -> Result<Option<Plant>, String> {
    serde_json::from_str::<Option<Plant>>(payload)
        .map_err(|err| format!("invalid plant JSON: {err}"))
}

fn render<T: Serialize>(value: T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|err| format!("failed to render JSON output: {err}"))
}
