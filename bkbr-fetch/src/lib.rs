//! bkbr-fetch library interface
//!
//! Exposes the import services so the browse service (bkbr-ui) and the
//! integration tests can drive the same pipeline as the command-line tool.

pub mod services;

pub use services::{
    validate_url, ImageError, ImageFetcher, ImportError, RecipeImporter, ScrapeClient, ScrapeError,
};
