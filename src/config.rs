use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::SuggestionSettings;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub suggestions: SuggestionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MatchingSettings {
    /// Largest group size accepted by the random preferences endpoint
    #[serde(default = "default_max_group_size")]
    pub max_group_size: usize,
    #[serde(default = "default_group_size")]
    pub default_group_size: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_group_size: default_max_group_size(),
            default_group_size: default_group_size(),
        }
    }
}

fn default_max_group_size() -> usize { 10 }
fn default_group_size() -> usize { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with STABLE_MATCH)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., STABLE_MATCH__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        settings.try_deserialize::<Self>()?.validated()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize::<Self>()?.validated()
    }

    /// Reject suggestion tunables that would break the impact estimate
    fn validated(self) -> Result<Self, ConfigError> {
        let suggestions = &self.suggestions;
        for (name, value) in [
            ("happiness_step", suggestions.happiness_step),
            ("stability_jitter", suggestions.stability_jitter),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Message(format!(
                    "suggestions.{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }
        Ok(self)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("STABLE_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matching_limits() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.max_group_size, 10);
        assert_eq!(matching.default_group_size, 5);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_load_from_partial_file() {
        let path = std::env::temp_dir().join(format!("stable-match-{}.toml", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nport = 9000\n\n[suggestions]\nmax_suggestions = 5").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.suggestions.max_suggestions, 5);
        assert_eq!(settings.suggestions.locality_window, 2);
        assert_eq!(settings.matching.max_group_size, 10);
    }

    #[test]
    fn test_load_rejects_bad_suggestion_tunables() {
        for body in ["stability_jitter = inf", "stability_jitter = -0.5", "happiness_step = nan"] {
            let path = std::env::temp_dir().join(format!("stable-match-{}.toml", uuid::Uuid::new_v4()));
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "[suggestions]\n{}", body).unwrap();

            let result = Settings::load_from(&path);
            std::fs::remove_file(&path).ok();

            assert!(result.is_err(), "accepted {}", body);
        }
    }
}
