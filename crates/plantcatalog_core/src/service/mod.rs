//! Catalog use-case services.
//!
//! # Responsibility
//! - Apply input checks and business rules on top of repository calls.
//! - Translate absence and invalid input into caller-facing error kinds.

pub mod plant_service;
