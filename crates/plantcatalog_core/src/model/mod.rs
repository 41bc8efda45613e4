//! Domain model for the plant catalog.
//!
//! # Invariants
//! - Every persisted plant carries a store-assigned `PlantId`.
//! - `catalog_number` is the unique business key.

pub mod plant;
