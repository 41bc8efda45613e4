//! Plant catalog manager.
//!
//! # Responsibility
//! - Guard repository calls with identifier and field validation.
//! - Turn empty results into `NotFound` with stable, user-facing messages.
//!
//! # Invariants
//! - Repository is never called with a blank catalog number or food type.
//! - Invalid plants never reach SQL.
//! - Every error message listed in this module is part of the public contract.

use crate::model::plant::{Plant, PlantValidationError};
use crate::repo::plant_repo::{PlantKey, PlantListQuery, PlantRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const INVALID_PLANT_MESSAGE: &str = "Invalid plant!";
pub const EMPTY_CATALOG_NUMBER_MESSAGE: &str = "Catalog number cannot be empty.";
pub const EMPTY_FOOD_TYPE_MESSAGE: &str = "Food type cannot be empty.";
pub const NO_PLANT_FOUND_MESSAGE: &str = "No plant found.";
pub const NO_PLANT_WITH_FOOD_TYPE_MESSAGE: &str = "No plant found with the given food type.";

pub type ServiceResult<T> = Result<T, PlantServiceError>;

/// Caller-facing error for catalog use-cases.
#[derive(Debug)]
pub enum PlantServiceError {
    /// Blank or malformed identifier input.
    InvalidArgument(&'static str),
    /// Plant payload failed field validation. Displays as `Invalid plant!`.
    Validation(PlantValidationError),
    /// Query matched nothing.
    NotFound(String),
    /// Catalog number already belongs to another plant.
    AlreadyExists(String),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but read-back did not find the row.
    InconsistentState(&'static str),
}

impl Display for PlantServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => f.write_str(message),
            Self::Validation(_) => f.write_str(INVALID_PLANT_MESSAGE),
            Self::NotFound(message) => f.write_str(message),
            Self::AlreadyExists(message) => f.write_str(message),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent catalog state: {details}"),
        }
    }
}

impl Error for PlantServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PlantValidationError> for PlantServiceError {
    fn from(value: PlantValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for PlantServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(key) => Self::NotFound(not_found_message(&key)),
            RepoError::DuplicateCatalogNumber(catalog_number) => Self::AlreadyExists(format!(
                "A plant with catalog number `{catalog_number}` already exists."
            )),
            other => Self::Repo(other),
        }
    }
}

/// Manager over a plant repository.
pub struct PlantService<R: PlantRepository> {
    repo: R,
}

impl<R: PlantRepository> PlantService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new plant, returning it with its assigned id.
    ///
    /// # Errors
    /// - `Validation` when any field rule fails.
    /// - `AlreadyExists` when the catalog number is taken.
    pub fn add_plant(&self, plant: &Plant) -> ServiceResult<Plant> {
        if let Err(err) = plant.validate() {
            warn!("event=plant_add module=service status=error error_code=invalid_plant reason={err}");
            return Err(err.into());
        }

        let id = self.repo.create_plant(plant)?;
        info!(
            "event=plant_add module=service status=ok id={id} catalog_number={}",
            plant.catalog_number
        );
        self.repo
            .get_plant_by_id(id)?
            .ok_or(PlantServiceError::InconsistentState(
                "created plant not found in read-back",
            ))
    }

    /// Removes the plant owning `catalog_number`.
    ///
    /// # Errors
    /// - `InvalidArgument` for blank input.
    /// - `NotFound` when no plant has this catalog number.
    pub fn delete_plant(&self, catalog_number: &str) -> ServiceResult<()> {
        let catalog_number = require_non_blank(catalog_number, EMPTY_CATALOG_NUMBER_MESSAGE)?;
        self.repo.delete_plant_by_catalog_number(catalog_number)?;
        info!("event=plant_delete module=service status=ok catalog_number={catalog_number}");
        Ok(())
    }

    /// Returns every plant ordered by id.
    ///
    /// # Errors
    /// - `NotFound` (`No plant found.`) when the catalog is empty.
    pub fn get_all_plants(&self) -> ServiceResult<Vec<Plant>> {
        let plants = self.repo.list_plants(&PlantListQuery::default())?;
        if plants.is_empty() {
            return Err(PlantServiceError::NotFound(
                NO_PLANT_FOUND_MESSAGE.to_string(),
            ));
        }
        Ok(plants)
    }

    /// Returns all plants whose food type equals `food_type`, ignoring case
    /// and surrounding whitespace.
    pub fn search_by_food_type(&self, food_type: &str) -> ServiceResult<Vec<Plant>> {
        let food_type = require_non_blank(food_type, EMPTY_FOOD_TYPE_MESSAGE)?;
        let query = PlantListQuery {
            food_type: Some(food_type.to_string()),
            ..PlantListQuery::default()
        };
        let plants = self.repo.list_plants(&query)?;
        if plants.is_empty() {
            return Err(PlantServiceError::NotFound(
                NO_PLANT_WITH_FOOD_TYPE_MESSAGE.to_string(),
            ));
        }
        Ok(plants)
    }

    /// Returns the plant owning `catalog_number`.
    pub fn get_plant(&self, catalog_number: &str) -> ServiceResult<Plant> {
        let catalog_number = require_non_blank(catalog_number, EMPTY_CATALOG_NUMBER_MESSAGE)?;
        self.repo
            .get_plant_by_catalog_number(catalog_number)?
            .ok_or_else(|| {
                PlantServiceError::NotFound(not_found_message(&PlantKey::CatalogNumber(
                    catalog_number.to_string(),
                )))
            })
    }

    /// Persists every field of `plant` over the stored row with the same
    /// identity (`id` when set, else `catalog_number`).
    ///
    /// `None` models a missing payload and fails like an invalid plant.
    pub fn update_plant(&self, plant: Option<&Plant>) -> ServiceResult<Plant> {
        let Some(plant) = plant else {
            warn!("event=plant_update module=service status=error error_code=missing_plant");
            return Err(PlantValidationError::MissingPlant.into());
        };
        if let Err(err) = plant.validate() {
            warn!("event=plant_update module=service status=error error_code=invalid_plant reason={err}");
            return Err(err.into());
        }

        self.repo.update_plant(plant)?;
        info!(
            "event=plant_update module=service status=ok catalog_number={}",
            plant.catalog_number
        );

        let stored = match plant.id {
            Some(id) => self.repo.get_plant_by_id(id)?,
            None => self
                .repo
                .get_plant_by_catalog_number(&plant.catalog_number)?,
        };
        stored.ok_or(PlantServiceError::InconsistentState(
            "updated plant not found in read-back",
        ))
    }

    /// Returns the number of stored plants.
    pub fn count_plants(&self) -> ServiceResult<u64> {
        Ok(self.repo.count_plants()?)
    }
}

fn require_non_blank<'a>(value: &'a str, message: &'static str) -> ServiceResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlantServiceError::InvalidArgument(message));
    }
    Ok(trimmed)
}

fn not_found_message(key: &PlantKey) -> String {
    format!("No plant found with {key}.")
}
