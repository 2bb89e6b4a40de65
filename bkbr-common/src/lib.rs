//! # Backburner Common Library
//!
//! Shared code for the Backburner binaries including:
//! - Recipe data model and tag derivation
//! - The local recipe store (single JSON document, atomic rewrite)
//! - Configuration loading and root folder resolution
//! - Human-readable cooking time formatting

pub mod config;
pub mod error;
pub mod human_time;
pub mod recipe;
pub mod store;

pub use error::{Error, Result};
pub use recipe::{IngredientGroup, Recipe};
pub use store::RecipeStore;
