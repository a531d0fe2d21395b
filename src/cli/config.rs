//! Configuration file
//!
//! A single JSON document. Every field has a default, so `{}` is a valid
//! config.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::SchemaProfile;
use crate::http_server::HttpServerConfig;
use crate::observability::LoggingConfig;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// JSON store file (default "db.json")
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// CSV seed source
    #[serde(default)]
    pub csv_path: Option<String>,

    /// Directory holding `<name>.png` images (default "public/images")
    #[serde(default = "default_images_dir")]
    pub images_dir: String,

    /// Prefix of derived image URLs (default "/images")
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Required-field profile (default "basic")
    #[serde(default)]
    pub schema: SchemaProfile,

    /// Page size override; the profile decides when unset
    #[serde(default)]
    pub default_limit: Option<usize>,

    /// Re-seed from `csv_path` every time the server starts
    #[serde(default)]
    pub seed_on_start: bool,

    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_store_path() -> String {
    "db.json".to_string()
}

fn default_images_dir() -> String {
    "public/images".to_string()
}

fn default_image_base_url() -> String {
    "/images".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            csv_path: None,
            images_dir: default_images_dir(),
            image_base_url: default_image_base_url(),
            schema: SchemaProfile::default(),
            default_limit: None,
            seed_on_start: false,
            server: HttpServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        if self.default_limit == Some(0) {
            return Err(CliError::config_error("default_limit must be > 0"));
        }

        if self.seed_on_start && self.csv_path.is_none() {
            return Err(CliError::config_error(
                "seed_on_start requires csv_path to be set",
            ));
        }

        if self.image_base_url.is_empty() {
            return Err(CliError::config_error("image_base_url must not be empty"));
        }

        if !self.server.route_prefix.starts_with('/') {
            return Err(CliError::config_error(format!(
                "Invalid route_prefix: '{}'. It must start with '/'.",
                self.server.route_prefix
            )));
        }

        Ok(())
    }

    /// Page size for list requests without a `limit`
    pub fn effective_limit(&self) -> usize {
        self.default_limit
            .unwrap_or_else(|| self.schema.default_limit())
    }

    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.store_path)
    }

    pub fn images_path(&self) -> PathBuf {
        PathBuf::from(&self.images_dir)
    }

    /// Route that serves images so derived record URLs resolve.
    ///
    /// The path part of `image_base_url`, e.g. `/images` for both
    /// `/images` and `http://host:8000/images/`. `None` when that path is
    /// the root or the URL has no path at all.
    pub fn image_route(&self) -> Option<String> {
        let base = self.image_base_url.as_str();
        let path = match base.split_once("://") {
            Some((_, rest)) => &rest[rest.find('/')?..],
            None if base.starts_with('/') => base,
            None => return None,
        };

        let route = path.trim_end_matches('/');
        if route.is_empty() {
            None
        } else {
            Some(route.to_string())
        }
    }

    /// CSV path, or an error naming the missing setting
    pub fn require_csv_path(&self) -> CliResult<PathBuf> {
        self.csv_path
            .as_ref()
            .map(PathBuf::from)
            .ok_or_else(|| CliError::config_error("csv_path is required for seeding"))
    }
}
