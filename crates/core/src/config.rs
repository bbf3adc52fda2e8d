use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

/// Root application configuration. Loaded from environment variables
/// with the prefix `WAYFINDER__` and an optional TOML/JSON/YAML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub journey: JourneySourceConfig,
    /// Feature flags consulted by flag-backed guards.
    #[serde(default)]
    pub flags: HashMap<String, bool>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavigationConfig {
    /// Upper bound on hops per resolution. Defaults to the number of
    /// registered steps.
    #[serde(default)]
    pub max_hops: Option<usize>,
    #[serde(default = "default_redirect_prefix")]
    pub redirect_prefix: String,
    /// Where hosts send the user when a resolution fails.
    #[serde(default = "default_fallback_path")]
    pub fallback_path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JourneySourceConfig {
    #[serde(default)]
    pub definition_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

fn default_redirect_prefix() -> String {
    "redirect:".to_string()
}
fn default_fallback_path() -> String {
    "/pay-penalty/unscheduled-service-down".to_string()
}
fn default_log_filter() -> String {
    "wayfinder=info".to_string()
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            max_hops: None,
            redirect_prefix: default_redirect_prefix(),
            fallback_path: default_fallback_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional file, overridden by environment
    /// variables.
    pub fn load_from(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("WAYFINDER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(
            file = path.unwrap_or("-"),
            flags = config.flags.len(),
            "Loaded configuration"
        );
        Ok(config)
    }
}
