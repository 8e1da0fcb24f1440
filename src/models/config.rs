use crate::assets::AssetLoader;
use serde::Deserialize;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Hostname printed in the call-to-action panel when the request
    /// carries no origin of its own
    #[serde(default = "default_origin_host")]
    pub origin_host: String,

    /// Background image loading
    #[serde(default)]
    pub background: BackgroundConfig,

    /// PNG output
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_origin_host() -> String {
    "localhost".to_string()
}

/// What to do when a background image cannot be loaded
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundFailure {
    /// Fail the render with an image load error
    #[default]
    Error,
    /// Render the gradient background instead
    Gradient,
}

/// Configuration for fetching background images
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BackgroundConfig {
    /// Seconds to wait for a background image before giving up
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Largest accepted image body in bytes
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Failure policy
    #[serde(default)]
    pub on_failure: BackgroundFailure,

    /// Number of fetched images kept in memory
    #[serde(default = "default_cache_entries")]
    pub cache_entries: usize,

    /// How long a fetched image stays cached
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_cache_entries() -> usize {
    32
}

fn default_cache_ttl_secs() -> u64 {
    300 // 5 minutes
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_bytes: default_max_bytes(),
            on_failure: BackgroundFailure::default(),
            cache_entries: default_cache_entries(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Configuration for encoded output
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct OutputConfig {
    /// Re-compress PNG output with oxipng
    #[serde(default)]
    pub optimize_png: bool,
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        origin_host = %config.origin_host,
                        on_failure = ?config.background.on_failure,
                        optimize_png = config.output.optimize_png,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin_host: default_origin_host(),
            background: BackgroundConfig::default(),
            output: OutputConfig::default(),
        }
    }
}
