use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::channel::MembershipPolicy;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub channels: ChannelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Minimum payload length accepted by the length stage
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Previously used payloads that must not be sent again
    #[serde(default)]
    pub history: Vec<String>,
    /// Format checks applied after the length checks, in order
    #[serde(default)]
    pub patterns: Vec<PatternConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    /// Human-readable format name used in the rejection message
    pub name: String,
    pub regex: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ChannelConfig {
    #[serde(default)]
    pub membership: MembershipPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_min_length() -> usize {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("pipeline.min_length", default_min_length() as i64)?
            .set_default("channels.membership", "multiset")?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // DISPATCH__PIPELINE__MIN_LENGTH, DISPATCH__LOGGING__FORMAT, etc.
            .add_source(
                Environment::with_prefix("DISPATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("pipeline.history"),
            );

        builder.build()?.try_deserialize()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            history: vec![],
            patterns: vec![],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}
