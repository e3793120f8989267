//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/infra-beacon/config.toml

pub mod defaults;

use crate::constants::geo::INDEX_PRECISION;
use crate::error::{Error, Result};
use crate::proximity::SearchScope;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Report storage
    #[serde(default)]
    pub store: StoreConfig,

    /// Duplicate detection and nearby search
    #[serde(default)]
    pub proximity: ProximityConfig,

    /// Image classification
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Map rendering
    #[serde(default)]
    pub map: MapConfig,

    /// URL generation settings
    #[serde(default)]
    pub url: UrlConfig,

    /// API keys for various services
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Report storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store backend ("memory" or "file")
    #[serde(default = "default_store")]
    pub backend: String,

    /// Reports file for the file store; the XDG data dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Duplicate detection and nearby search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityConfig {
    /// Radius in meters for flagging a submission as a duplicate
    #[serde(default = "default_duplicate_radius")]
    pub duplicate_radius: f64,

    /// Default radius in meters for nearby searches
    #[serde(default = "default_nearby_radius")]
    pub nearby_radius: f64,

    /// Geohash prefix length scanned for candidates
    #[serde(default = "default_search_precision")]
    pub search_precision: usize,

    /// Also scan the 8 cells around the centre cell
    #[serde(default)]
    pub search_neighbors: bool,
}

/// Image classification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Classifier backend ("placeholder" or "gemini")
    #[serde(default = "default_classifier")]
    pub backend: String,

    /// Model name for hosted classifiers
    #[serde(default = "default_model")]
    pub model: String,
}

/// Map rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Maximum reports loaded for markers, heatmap and clusters
    #[serde(default = "default_report_limit")]
    pub report_limit: usize,

    /// Zoom used for clusters when none is given
    #[serde(default = "default_zoom")]
    pub default_zoom: i32,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiKeysConfig {
    /// Google Generative Language API key
    #[serde(default)]
    pub gemini: String,
}

// Default value functions for serde
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_store() -> String {
    DEFAULT_STORE.to_string()
}
fn default_duplicate_radius() -> f64 {
    DEFAULT_DUPLICATE_RADIUS
}
fn default_nearby_radius() -> f64 {
    DEFAULT_NEARBY_RADIUS
}
fn default_search_precision() -> usize {
    DEFAULT_SEARCH_PRECISION
}
fn default_classifier() -> String {
    DEFAULT_CLASSIFIER.to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_report_limit() -> usize {
    DEFAULT_REPORT_LIMIT
}
fn default_zoom() -> i32 {
    DEFAULT_ZOOM
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/@{lat},{lng},18z".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/#map=18/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}".to_string(),
    );
    providers
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            proximity: ProximityConfig::default(),
            classifier: ClassifierConfig::default(),
            map: MapConfig::default(),
            url: UrlConfig::default(),
            api_keys: ApiKeysConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store(),
            path: None,
        }
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            duplicate_radius: default_duplicate_radius(),
            nearby_radius: default_nearby_radius(),
            search_precision: default_search_precision(),
            search_neighbors: false,
        }
    }
}

impl ProximityConfig {
    pub fn scope(&self) -> SearchScope {
        SearchScope::from_flag(self.search_neighbors)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: default_classifier(),
            model: default_model(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            report_limit: default_report_limit(),
            default_zoom: default_zoom(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let config: Config = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })?
        } else {
            let config = Config::default();
            config.save()?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Check cross-field constraints
    ///
    /// The search prefix must be shorter than the indexed geohash, and radii
    /// must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let precision = self.proximity.search_precision;
        if precision == 0 || precision >= INDEX_PRECISION {
            return Err(Error::Config(format!(
                "proximity.search_precision must be between 1 and {}, got {}",
                INDEX_PRECISION - 1,
                precision
            )));
        }

        for (key, radius) in [
            ("proximity.duplicate_radius", self.proximity.duplicate_radius),
            ("proximity.nearby_radius", self.proximity.nearby_radius),
        ] {
            if !radius.is_finite() || radius < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a non-negative number, got {}",
                    key, radius
                )));
            }
        }

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["store", "backend"] => Some(self.store.backend.clone()),
            ["store", "path"] => Some(self.store.path.clone().unwrap_or_default()),

            ["proximity", "duplicate_radius"] => Some(self.proximity.duplicate_radius.to_string()),
            ["proximity", "nearby_radius"] => Some(self.proximity.nearby_radius.to_string()),
            ["proximity", "search_precision"] => {
                Some(self.proximity.search_precision.to_string())
            }
            ["proximity", "search_neighbors"] => {
                Some(self.proximity.search_neighbors.to_string())
            }

            ["classifier", "backend"] => Some(self.classifier.backend.clone()),
            ["classifier", "model"] => Some(self.classifier.model.clone()),

            ["map", "report_limit"] => Some(self.map.report_limit.to_string()),
            ["map", "default_zoom"] => Some(self.map.default_zoom.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            ["api_keys", "gemini"] => Some(self.api_keys.gemini.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = parse_value(key, value)?;
            }

            ["store", "backend"] => {
                self.store.backend = value.to_string();
            }
            ["store", "path"] => {
                self.store.path = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }

            ["proximity", "duplicate_radius"] => {
                self.proximity.duplicate_radius = parse_value(key, value)?;
            }
            ["proximity", "nearby_radius"] => {
                self.proximity.nearby_radius = parse_value(key, value)?;
            }
            ["proximity", "search_precision"] => {
                self.proximity.search_precision = parse_value(key, value)?;
            }
            ["proximity", "search_neighbors"] => {
                self.proximity.search_neighbors = parse_value(key, value)?;
            }

            ["classifier", "backend"] => {
                self.classifier.backend = value.to_string();
            }
            ["classifier", "model"] => {
                self.classifier.model = value.to_string();
            }

            ["map", "report_limit"] => {
                self.map.report_limit = parse_value(key, value)?;
            }
            ["map", "default_zoom"] => {
                self.map.default_zoom = parse_value(key, value)?;
            }

            ["url", "default"] => {
                self.url.default = value.to_string();
            }

            ["api_keys", "gemini"] => {
                self.api_keys.gemini = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        self.validate()
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "server.host",
            "server.port",
            "store.backend",
            "store.path",
            "proximity.duplicate_radius",
            "proximity.nearby_radius",
            "proximity.search_precision",
            "proximity.search_neighbors",
            "classifier.backend",
            "classifier.model",
            "map.report_limit",
            "map.default_zoom",
            "url.default",
            "api_keys.gemini",
        ]
    }

    /// Gemini key, if one is configured
    pub fn gemini_key(&self) -> Option<&str> {
        if self.api_keys.gemini.is_empty() {
            None
        } else {
            Some(&self.api_keys.gemini)
        }
    }

    /// Format a map URL for a report location using the specified provider
    ///
    /// Replaces {lat} and {lng} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, lat: f64, lng: f64) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
