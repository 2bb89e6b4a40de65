//! Import services: scrape client, image fetcher and the pipeline tying them
//! to the recipe store

pub mod image_fetcher;
pub mod recipe_importer;
pub mod scrape_client;

pub use image_fetcher::{ImageError, ImageFetcher};
pub use recipe_importer::{ImportError, RecipeImporter};
pub use scrape_client::{validate_url, ScrapeClient, ScrapeError};
