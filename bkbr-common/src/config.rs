//! Configuration loading and root folder resolution

use crate::store::RECIPES_FILE_NAME;
use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "BKBR_ROOT_FOLDER";

/// Public scraping service used when nothing else is configured
pub const DEFAULT_SCRAPE_BASE_URL: &str = "https://recipescraperapi.onrender.com";

/// Images subdirectory of the root folder
pub const IMAGES_DIR_NAME: &str = "images";

/// Bootstrap configuration loaded from TOML
///
/// Every section is optional; a missing file yields all defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding recipes.json and images/
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub scrape: ScrapeConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote scraping endpoint settings
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Base URL; requests go to `<base_url>/scrape`
    #[serde(default = "default_scrape_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub method: ScrapeMethod,

    /// Per-request timeout for scrape and image downloads
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: default_scrape_base_url(),
            method: ScrapeMethod::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// How the scrape endpoint receives the recipe URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeMethod {
    /// `GET <base>/scrape?url=<escaped>`
    #[default]
    Get,
    /// `POST <base>/scrape` with `{"url": "..."}`
    Post,
}

impl FromStr for ScrapeMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(ScrapeMethod::Get),
            "post" => Ok(ScrapeMethod::Post),
            other => Err(format!("unknown scrape method '{}' (expected get or post)", other)),
        }
    }
}

impl fmt::Display for ScrapeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeMethod::Get => write!(f, "GET"),
            ScrapeMethod::Post => write!(f, "POST"),
        }
    }
}

/// HTTP service settings (bkbr-ui)
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); RUST_LOG wins when set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_scrape_base_url() -> String {
    DEFAULT_SCRAPE_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_port() -> u16 {
    5780
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Load configuration
    ///
    /// An explicit path must exist and parse. Without one, the per-user
    /// config file is used when present; a missing file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigOrigin)> {
        if let Some(path) = explicit {
            let content = std::fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
            })?;
            return Ok((Self::from_toml_str(&content)?, ConfigOrigin::File(path.to_path_buf())));
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)?;
                Ok((Self::from_toml_str(&content)?, ConfigOrigin::File(path)))
            }
            Some(path) => Ok((Self::default(), ConfigOrigin::Missing(path))),
            None => Ok((Self::default(), ConfigOrigin::Defaults)),
        }
    }
}

/// Where the active configuration came from, for startup logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Parsed from this file
    File(PathBuf),
    /// Default location checked, nothing there
    Missing(PathBuf),
    /// No config directory on this platform
    Defaults,
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOrigin::File(path) => write!(f, "{}", path.display()),
            ConfigOrigin::Missing(path) => {
                write!(f, "defaults (no config file at {})", path.display())
            }
            ConfigOrigin::Defaults => write!(f, "defaults"),
        }
    }
}

/// Per-user config file location (`<config_dir>/backburner/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("backburner").join("config.toml"))
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent default
    default_root_folder()
}

/// OS-dependent default root folder
///
/// `~/.local/share/backburner` on Linux, `~/Library/Application Support/backburner`
/// on macOS, `%LOCALAPPDATA%\backburner` on Windows.
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("backburner"))
        .unwrap_or_else(|| PathBuf::from("./backburner_data"))
}

/// File layout under the root folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The recipe document
    pub fn recipes_file(&self) -> PathBuf {
        self.root.join(RECIPES_FILE_NAME)
    }

    /// Directory of cached hero images
    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR_NAME)
    }

    /// Create the root and images directories if missing
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(self.images_dir())?;
        Ok(())
    }
}
