use serde::Deserialize;

/// Production API endpoint
pub const DEFAULT_BASE_PATH: &str = "https://api.webcrawlerapi.com";

/// API version segment used when none is configured
pub const DEFAULT_API_VERSION: &str = "v1";

/// Delay before the first status poll (milliseconds)
pub const DEFAULT_INITIAL_PULL_DELAY_MS: u64 = 2000;

/// Number of status polls before giving up
pub const DEFAULT_MAX_POLLING_RETRIES: u32 = 100;

/// Main configuration structure for webcrawlerapi
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

impl Config {
    /// Builds a configuration with defaults for everything but the API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                api_key: api_key.into(),
                base_path: default_base_path(),
                api_version: default_api_version(),
            },
            polling: PollingConfig::default(),
        }
    }

    /// Replaces file values with the ones given explicitly
    pub fn apply_overrides(&mut self, api_key: Option<&str>, base_path: Option<&str>) {
        if let Some(api_key) = api_key {
            self.api.api_key = api_key.to_string();
        }
        if let Some(base_path) = base_path {
            self.api.base_path = base_path.to_string();
        }
    }
}

/// Remote API connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Bearer token sent with every authenticated request
    ///
    /// May be left out of the file and supplied on the command line instead.
    #[serde(rename = "api-key", default)]
    pub api_key: String,

    /// Base URL of the API, without a version segment
    #[serde(rename = "base-path", default = "default_base_path")]
    pub base_path: String,

    /// Version segment for scrape endpoints (e.g. "v1")
    #[serde(rename = "api-version", default = "default_api_version")]
    pub api_version: String,
}

/// Job polling behavior
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Wait before the first poll, and between polls until the server recommends otherwise
    #[serde(
        rename = "initial-pull-delay-ms",
        default = "default_initial_pull_delay_ms"
    )]
    pub initial_pull_delay_ms: u64,

    /// Maximum number of status polls per job
    #[serde(
        rename = "max-polling-retries",
        default = "default_max_polling_retries"
    )]
    pub max_polling_retries: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            initial_pull_delay_ms: DEFAULT_INITIAL_PULL_DELAY_MS,
            max_polling_retries: DEFAULT_MAX_POLLING_RETRIES,
        }
    }
}

fn default_base_path() -> String {
    DEFAULT_BASE_PATH.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_initial_pull_delay_ms() -> u64 {
    DEFAULT_INITIAL_PULL_DELAY_MS
}

fn default_max_polling_retries() -> u32 {
    DEFAULT_MAX_POLLING_RETRIES
}
