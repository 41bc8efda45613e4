//! Plant catalog record and field validation.
//!
//! # Responsibility
//! - Define the canonical `Plant` shape shared by repository and service.
//! - Provide explicit field validation with structured failure reasons.
//!
//! # Invariants
//! - `catalog_number` is non-blank and matches `AAAA-0000`.
//! - `name` is non-blank.
//! - `quantity` is never negative.
//! - Stored free-text fields carry no surrounding whitespace.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned primary key.
pub type PlantId = i64;

static CATALOG_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{4}-[0-9]{4}$").expect("valid catalog number regex"));

/// Field-level validation failure for a plant record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlantValidationError {
    /// No plant payload was supplied.
    MissingPlant,
    /// Catalog number is empty or whitespace only.
    EmptyCatalogNumber,
    /// Catalog number does not follow the `AAAA-0000` format.
    MalformedCatalogNumber(String),
    /// Display name is empty or whitespace only.
    EmptyName,
    /// Stock quantity is below zero.
    NegativeQuantity(i32),
}

impl Display for PlantValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPlant => write!(f, "plant payload is missing"),
            Self::EmptyCatalogNumber => write!(f, "catalog_number cannot be empty"),
            Self::MalformedCatalogNumber(value) => write!(
                f,
                "catalog_number `{value}` must match AAAA-0000 (4 uppercase letters, '-', 4 digits)"
            ),
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::NegativeQuantity(value) => {
                write!(f, "quantity ({value}) must be >= 0")
            }
        }
    }
}

impl Error for PlantValidationError {}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plant {
    /// Primary key; `None` until the store assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlantId>,
    /// Unique business key, e.g. `ROSA-0001`.
    pub catalog_number: String,
    pub name: String,
    pub plant_type: String,
    /// Category label used by food-type search.
    pub food_type: String,
    pub quantity: i32,
    pub is_edible: bool,
}

impl Plant {
    /// Creates an unsaved plant (`id = None`).
    ///
    /// Does not validate; call [`Plant::validate`] or go through the service.
    pub fn new(
        catalog_number: impl Into<String>,
        name: impl Into<String>,
        plant_type: impl Into<String>,
        food_type: impl Into<String>,
        quantity: i32,
        is_edible: bool,
    ) -> Self {
        Self {
            id: None,
            catalog_number: catalog_number.into(),
            name: name.into(),
            plant_type: plant_type.into(),
            food_type: food_type.into(),
            quantity,
            is_edible,
        }
    }

    /// Checks every field rule, returning the first violation.
    pub fn validate(&self) -> Result<(), PlantValidationError> {
        validate_catalog_number(&self.catalog_number)?;

        if self.name.trim().is_empty() {
            return Err(PlantValidationError::EmptyName);
        }

        if self.quantity < 0 {
            return Err(PlantValidationError::NegativeQuantity(self.quantity));
        }

        Ok(())
    }

    /// Returns a copy with surrounding whitespace removed from the free-text
    /// fields. `catalog_number` is left as-is so malformed keys still fail
    /// validation.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            plant_type: self.plant_type.trim().to_string(),
            food_type: self.food_type.trim().to_string(),
            ..self.clone()
        }
    }

    /// Returns whether this record has been persisted.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Validates the catalog number format alone.
pub fn validate_catalog_number(value: &str) -> Result<(), PlantValidationError> {
    if value.trim().is_empty() {
        return Err(PlantValidationError::EmptyCatalogNumber);
    }
    if !CATALOG_NUMBER_RE.is_match(value) {
        return Err(PlantValidationError::MalformedCatalogNumber(
            value.to_string(),
        ));
    }
    Ok(())
}
