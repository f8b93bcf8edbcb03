//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/gnss-nearby/config.toml

pub mod defaults;

use crate::cluster::ClusterStrategy;
use crate::constants::map::REFERENCE_ZOOM;
use crate::error::{Error, Result};
use crate::station::validate_radius;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Station-metadata backend
    #[serde(default)]
    pub api: ApiConfig,

    /// Nearby-station query settings
    #[serde(default)]
    pub nearby: NearbyConfig,

    /// Overlap detection settings
    #[serde(default)]
    pub overlap: OverlapConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Station-metadata backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token (empty for none)
    #[serde(default)]
    pub token: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Nearby-station query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyConfig {
    /// Show nearby stations
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Search radius in kilometers (100-200, step 10)
    #[serde(default = "default_radius_km")]
    pub radius_km: u32,
}

/// Overlap detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlapConfig {
    /// Fixed threshold in meters; negative derives it from the map scale
    #[serde(default = "default_override_distance")]
    pub override_distance: f64,

    /// Zoom level the threshold is evaluated at
    #[serde(default = "default_reference_zoom")]
    pub reference_zoom: u8,

    /// Clustering strategy: seed or transitive
    #[serde(default = "default_strategy")]
    pub strategy: String,
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

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

// Default value functions for serde
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_enabled() -> bool {
    true
}
fn default_radius_km() -> u32 {
    DEFAULT_RADIUS_KM
}
fn default_override_distance() -> f64 {
    NO_OVERRIDE_DISTANCE
}
fn default_reference_zoom() -> u8 {
    REFERENCE_ZOOM
}
fn default_strategy() -> String {
    DEFAULT_STRATEGY.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for NearbyConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            radius_km: default_radius_km(),
        }
    }
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            override_distance: default_override_distance(),
            reference_zoom: default_reference_zoom(),
            strategy: default_strategy(),
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

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl OverlapConfig {
    /// The override distance, or None when the map scale decides
    pub fn override_distance(&self) -> Option<f64> {
        Some(self.override_distance).filter(|d| *d >= 0.0)
    }

    /// The configured clustering strategy
    pub fn strategy(&self) -> Result<ClusterStrategy> {
        self.strategy.parse().map_err(Error::Config)
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

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

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

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["api", "base_url"] => Some(self.api.base_url.clone()),
            ["api", "token"] => Some(self.api.token.clone()),
            ["api", "timeout_secs"] => Some(self.api.timeout_secs.to_string()),

            ["nearby", "enabled"] => Some(self.nearby.enabled.to_string()),
            ["nearby", "radius_km"] => Some(self.nearby.radius_km.to_string()),

            ["overlap", "override_distance"] => Some(self.overlap.override_distance.to_string()),
            ["overlap", "reference_zoom"] => Some(self.overlap.reference_zoom.to_string()),
            ["overlap", "strategy"] => Some(self.overlap.strategy.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["output", "format"] => Some(self.output.format.clone()),

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
            ["api", "base_url"] => {
                self.api.base_url = value.to_string();
            }
            ["api", "token"] => {
                self.api.token = value.to_string();
            }
            ["api", "timeout_secs"] => {
                self.api.timeout_secs = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid timeout value: {}", value))
                })?;
            }

            ["nearby", "enabled"] => {
                self.nearby.enabled = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid boolean value: {}", value))
                })?;
            }
            ["nearby", "radius_km"] => {
                let radius: u32 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid radius value: {}", value))
                })?;
                validate_radius(radius)?;
                self.nearby.radius_km = radius;
            }

            ["overlap", "override_distance"] => {
                self.overlap.override_distance = match value {
                    "none" | "off" => NO_OVERRIDE_DISTANCE,
                    _ => value.parse().map_err(|_| {
                        Error::Config(format!("Invalid distance value: {}", value))
                    })?,
                };
            }
            ["overlap", "reference_zoom"] => {
                self.overlap.reference_zoom = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid zoom value: {}", value))
                })?;
            }
            ["overlap", "strategy"] => {
                let strategy: ClusterStrategy = value.parse().map_err(Error::Config)?;
                self.overlap.strategy = strategy.to_string();
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            ["output", "format"] => {
                self.output.format = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "api.base_url",
            "api.token",
            "api.timeout_secs",
            "nearby.enabled",
            "nearby.radius_km",
            "overlap.override_distance",
            "overlap.reference_zoom",
            "overlap.strategy",
            "server.host",
            "server.port",
            "output.format",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
