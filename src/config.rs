use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Which collected object the combined document designates as the store.
///
/// Two generations of receipt pipelines disagree on this: older flows emit
/// the store as the last JSON they create, newer ones emit it first and log
/// intermediate location lookups afterwards. Neither can be inferred from the
/// log itself, so the rule is a deployment setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreSelection {
    /// The last collected object is the store; everything before it is an item.
    #[default]
    LastIsStore,
    /// The first collected object is the store; later objects carrying
    /// location/address fields are dropped from the items.
    FirstIsStore,
}

/// Pipeline connection and output settings
#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Base URL of the pipeline API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Account the saved pipeline belongs to
    pub user_id: String,
    /// Saved pipeline to start
    pub saved_item_id: String,
    /// API key sent in the Authorization header
    #[serde(default)]
    pub api_key: Option<String>,
    /// Seconds between status polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Seconds before an unfinished run is abandoned
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
    /// Directory for raw pipeline outputs
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Directory for objects mined from the run log
    #[serde(default = "default_items_dir")]
    pub items_dir: String,
    /// Store designation rule for the combined document
    #[serde(default)]
    pub store_selection: StoreSelection,
}

// Default value functions
fn default_base_url() -> String {
    "https://api.gumloop.com/api/v1".to_string()
}

fn default_poll_interval() -> u64 {
    2
}

fn default_poll_timeout() -> u64 {
    120
}

fn default_output_dir() -> String {
    "test_folders".to_string()
}

fn default_items_dir() -> String {
    "item_json".to_string()
}

impl PipelineConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with PANTRY__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: PANTRY__SAVED_ITEM_ID
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<PipelineConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Environment variables with PANTRY_ prefix
        // Use double underscore for nested: PANTRY__POLL_TIMEOUT_SECS
        .add_source(
            Environment::with_prefix("PANTRY")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
