//! HTTP API handlers for bkbr-ui

pub mod fetch;
pub mod health;
pub mod recipes;

pub use fetch::fetch_recipe;
pub use health::health_routes;
pub use recipes::{delete_recipe, get_recipe, list_recipes};
