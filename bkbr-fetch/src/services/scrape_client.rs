//! Remote scrape client
//!
//! Sends one request per submitted URL to the configured scraping service
//! and decodes the response body into a [`Recipe`]. No retries.

use bkbr_common::config::{ScrapeConfig, ScrapeMethod};
use bkbr_common::Recipe;
use reqwest::Url;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("Backburner/", env!("CARGO_PKG_VERSION"));

/// Scrape client errors
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Rejected before any network call
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Scrape service error {0}: {1}")]
    ApiError(u16, String),

    #[error("Error decoding response: {0}")]
    DecodeError(String),
}

/// `POST /scrape` body
#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
}

/// Check a user-supplied recipe URL
///
/// Must be a non-empty absolute http(s) URL with a host.
pub fn validate_url(input: &str) -> Result<Url, ScrapeError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ScrapeError::InvalidUrl("URL is empty".to_string()));
    }

    let url = Url::parse(input).map_err(|e| ScrapeError::InvalidUrl(format!("{}: {}", input, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScrapeError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            input,
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ScrapeError::InvalidUrl(format!("{}: no host", input)));
    }

    Ok(url)
}

/// Client for the recipe scraping service
pub struct ScrapeClient {
    http_client: reqwest::Client,
    base_url: String,
    method: ScrapeMethod,
}

impl ScrapeClient {
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScrapeError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            method: config.method,
        })
    }

    /// Full scrape endpoint URL
    pub fn endpoint(&self) -> String {
        format!("{}/scrape", self.base_url)
    }

    pub fn method(&self) -> ScrapeMethod {
        self.method
    }

    /// Scrape one recipe page
    ///
    /// The URL is validated first; an invalid URL never reaches the network.
    pub async fn scrape(&self, recipe_url: &str) -> Result<Recipe, ScrapeError> {
        let url = validate_url(recipe_url)?;
        let endpoint = self.endpoint();

        tracing::debug!(url = %url, endpoint = %endpoint, method = %self.method, "Requesting scrape");

        let request = match self.method {
            ScrapeMethod::Get => self
                .http_client
                .get(&endpoint)
                .query(&[("url", url.as_str())]),
            ScrapeMethod::Post => self
                .http_client
                .post(&endpoint)
                .json(&ScrapeRequest { url: url.as_str() }),
        };

        let response = request.send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Scrape request failed");
            ScrapeError::NetworkError(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(url = %url, status = status.as_u16(), "Scrape service returned error");
            return Err(ScrapeError::ApiError(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::NetworkError(e.to_string()))?;

        let recipe: Recipe = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Scrape response did not decode");
            ScrapeError::DecodeError(e.to_string())
        })?;

        tracing::info!(
            url = %url,
            title = %recipe.title,
            host = %recipe.host,
            "Scraped recipe"
        );

        Ok(recipe)
    }
}
