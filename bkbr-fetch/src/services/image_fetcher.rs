//! Hero image download into the local images directory
//!
//! Filenames never collide: when the requested name is taken, `_1`, `_2`, …
//! is inserted before the extension until a free name is found. The body is
//! fully written to a temporary file in the images directory before it is
//! moved into place, so a failed download leaves nothing behind.

use reqwest::Url;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use thiserror::Error;

const USER_AGENT: &str = concat!("Backburner/", env!("CARGO_PKG_VERSION"));

/// Image fetcher errors
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid image filename: {0}")]
    InvalidFilename(String),

    #[error("Image download failed: {0}")]
    NetworkError(String),

    #[error("Image host returned {0}: {1}")]
    ApiError(u16, String),

    #[error("Image file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads hero images and manages the cached files
pub struct ImageFetcher {
    http_client: reqwest::Client,
    images_dir: PathBuf,
}

impl ImageFetcher {
    pub fn new(images_dir: impl Into<PathBuf>, timeout: Duration) -> Result<Self, ImageError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ImageError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            images_dir: images_dir.into(),
        })
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Create the images directory if it does not exist
    pub fn ensure_dir(&self) -> Result<(), ImageError> {
        std::fs::create_dir_all(&self.images_dir)?;
        Ok(())
    }

    /// Download `image_url` and store it as `filename` or the next free
    /// variant of it
    ///
    /// Returns the filename actually used, relative to the images directory.
    pub async fn download(&self, image_url: &str, filename: &str) -> Result<String, ImageError> {
        check_filename(filename)?;
        let url = Url::parse(image_url.trim())
            .map_err(|e| ImageError::InvalidUrl(format!("{}: {}", image_url, e)))?;

        self.ensure_dir()?;

        tracing::debug!(url = %url, filename = %filename, "Downloading image");

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ImageError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ImageError::ApiError(status.as_u16(), error_text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageError::NetworkError(e.to_string()))?;

        let dir = self.images_dir.clone();
        let requested = filename.to_string();
        let stored = tokio::task::spawn_blocking(move || store_unique(&dir, &requested, &bytes))
            .await
            .map_err(|e| ImageError::Io(std::io::Error::other(e.to_string())))??;

        tracing::info!(url = %url, filename = %stored, "Image saved");
        Ok(stored)
    }

    /// Delete a cached image; a missing file is not an error
    pub fn remove(&self, filename: &str) -> Result<(), ImageError> {
        check_filename(filename)?;
        match std::fs::remove_file(self.images_dir.join(filename)) {
            Ok(()) => {
                tracing::debug!(filename = %filename, "Removed cached image");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// `<stem><ext>` where ext is taken from the image URL path when it looks
/// like a real extension (1-5 ASCII alphanumerics), lowercased
pub fn base_filename(stem: &str, image_url: &str) -> String {
    let ext = Url::parse(image_url.trim())
        .ok()
        .and_then(|url| {
            let last = url.path_segments()?.last()?.to_string();
            let (_, ext) = last.rsplit_once('.')?;
            let valid = (1..=5).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric());
            valid.then(|| ext.to_ascii_lowercase())
        });

    match ext {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem.to_string(),
    }
}

/// Collision variant `index` of `filename`: `3.jpg` → `3_1.jpg`, `3` → `3_1`
pub fn candidate_name(filename: &str, index: u32) -> String {
    if index == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, index, ext),
        _ => format!("{}_{}", filename, index),
    }
}

/// First variant of `filename` that does not exist in `dir`
fn next_free_name(dir: &Path, filename: &str) -> String {
    let mut index = 0;
    loop {
        let name = candidate_name(filename, index);
        if !dir.join(&name).exists() {
            return name;
        }
        index += 1;
    }
}

fn check_filename(filename: &str) -> Result<(), ImageError> {
    let plain = !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\']);
    if plain {
        Ok(())
    } else {
        Err(ImageError::InvalidFilename(filename.to_string()))
    }
}

/// Write `bytes` to a temporary file in `dir`, then move it to the first free
/// variant of `filename` without overwriting anything
fn store_unique(dir: &Path, filename: &str, bytes: &[u8]) -> Result<String, ImageError> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;

    loop {
        let name = next_free_name(dir, filename);
        match tmp.persist_noclobber(dir.join(&name)) {
            Ok(_) => return Ok(name),
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                // Lost a race for this name; probe again
                tmp = e.file;
            }
            Err(e) => return Err(ImageError::Io(e.error)),
        }
    }
}
