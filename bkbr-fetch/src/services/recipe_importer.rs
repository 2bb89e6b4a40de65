//! Recipe import pipeline
//!
//! fetch → download image → derive tags → save. One import runs at a time;
//! a second request while one is in flight is rejected instead of queued.
//! The image download always finishes before the store is written, so a
//! saved `local_image` never names a file that is not there yet.

use crate::services::image_fetcher::{base_filename, ImageError, ImageFetcher};
use crate::services::scrape_client::{validate_url, ScrapeClient, ScrapeError};
use bkbr_common::config::{ScrapeConfig, StoragePaths};
use bkbr_common::{Recipe, RecipeStore};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Import errors; every variant ends the current attempt
#[derive(Debug, Error)]
pub enum ImportError {
    /// Another import is still running
    #[error("A recipe fetch is already in progress")]
    Busy,

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Store(#[from] bkbr_common::Error),
}

impl ImportError {
    /// Rejected before any I/O
    pub fn is_invalid_url(&self) -> bool {
        matches!(self, ImportError::Scrape(ScrapeError::InvalidUrl(_)))
    }
}

/// Runs the fetch/save sequence against one store
pub struct RecipeImporter {
    scrape_client: ScrapeClient,
    image_fetcher: ImageFetcher,
    store: Arc<RecipeStore>,
    in_flight: Mutex<()>,
}

impl RecipeImporter {
    pub fn new(scrape_client: ScrapeClient, image_fetcher: ImageFetcher, store: Arc<RecipeStore>) -> Self {
        Self {
            scrape_client,
            image_fetcher,
            store,
            in_flight: Mutex::new(()),
        }
    }

    /// Build clients from configuration for the given storage layout
    pub fn from_config(
        config: &ScrapeConfig,
        paths: &StoragePaths,
        store: Arc<RecipeStore>,
    ) -> Result<Self, ImportError> {
        let scrape_client = ScrapeClient::new(config)?;
        let image_fetcher =
            ImageFetcher::new(paths.images_dir(), Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(scrape_client, image_fetcher, store))
    }

    pub fn store(&self) -> &Arc<RecipeStore> {
        &self.store
    }

    pub fn image_fetcher(&self) -> &ImageFetcher {
        &self.image_fetcher
    }

    /// True while an import holds the single-flight guard
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Fetch the recipe at `url` and save it
    ///
    /// Returns the recipe as stored (with id, tags and local image).
    pub async fn import(&self, url: &str) -> Result<Recipe, ImportError> {
        let url = validate_url(url)?;

        let _guard = self.in_flight.try_lock().map_err(|_| {
            warn!(url = %url, "Rejected fetch, another one is in progress");
            ImportError::Busy
        })?;

        info!(url = %url, "Importing recipe");
        let mut recipe = self.scrape_client.scrape(url.as_str()).await?;

        // Names the image only. save() assigns the id under the store lock, so
        // a delete of the newest recipe meanwhile can make the two differ.
        let reserved_id = self.with_store(|store| store.next_id()).await?;

        if validate_url(&recipe.image).is_ok() {
            let filename = base_filename(&reserved_id.to_string(), &recipe.image);
            let stored = self.image_fetcher.download(&recipe.image, &filename).await?;
            recipe.local_image = Some(stored);
        } else {
            warn!(title = %recipe.title, image = %recipe.image, "Recipe has no usable image URL, saving without one");
        }

        recipe.derive_tags();

        let downloaded = recipe.local_image.clone();
        let outcome = self
            .with_store(move |store| store.save(recipe))
            .await
            .and_then(|saved| saved.map_err(ImportError::from));

        match outcome {
            Ok(saved) => {
                info!(
                    id = saved.id.unwrap_or_default(),
                    title = %saved.title,
                    local_image = saved.local_image.as_deref().unwrap_or("-"),
                    "Recipe imported"
                );
                Ok(saved)
            }
            Err(e) => {
                warn!(error = %e, "Saving imported recipe failed");
                // The document does not reference the image, drop it
                if let Some(filename) = downloaded {
                    if let Err(remove_err) = self.image_fetcher.remove(&filename) {
                        warn!(filename = %filename, error = %remove_err, "Could not remove orphaned image");
                    }
                }
                Err(e)
            }
        }
    }

    /// Run a store call on the blocking pool
    async fn with_store<T, F>(&self, f: F) -> Result<T, ImportError>
    where
        F: FnOnce(&RecipeStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| {
                ImportError::Store(bkbr_common::Error::Io(std::io::Error::other(format!(
                    "store task failed: {}",
                    e
                ))))
            })
    }
}
