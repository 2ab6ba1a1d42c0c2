//! Configuration for the vehicle schema decoder
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (vehicle-schemas.toml)
//! - Environment variables (VEHICLE_SCHEMAS__*)
//!
//! The decoder never loads configuration on its own; callers build a
//! [`DecoderConfig`] (directly or through [`Settings::load`]) and hand it to
//! [`crate::Decoder::new`].
//!
//! ## Example config file (vehicle-schemas.toml):
//! ```toml
//! [decoder]
//! error_policy = "collect"
//! log_unknown_keys = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Top-level settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Decoder behaviour
    #[serde(default)]
    pub decoder: DecoderConfig,
}

/// Decoder behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// What to do after the first field error inside a record
    #[serde(default)]
    pub error_policy: ErrorPolicy,

    /// Report keys with no schema match at debug level
    #[serde(default)]
    pub log_unknown_keys: bool,
}

/// Field error handling within one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Decode every field, then fail with all field errors
    #[default]
    Collect,
    /// Fail at the first field error
    FailFast,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::Collect,
            log_unknown_keys: false,
        }
    }
}

impl DecoderConfig {
    pub fn fail_fast() -> Self {
        Self {
            error_policy: ErrorPolicy::FailFast,
            ..Self::default()
        }
    }
}

impl Settings {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "vehicle-schemas.toml",
            ".vehicle-schemas.toml",
            "config/vehicle-schemas.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "vehicle", "vehicle-schemas") {
            let xdg_config = config_dir.config_dir().join("vehicle-schemas.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // VEHICLE_SCHEMAS__DECODER__ERROR_POLICY=fail_fast
        builder = builder.add_source(
            Environment::with_prefix("VEHICLE_SCHEMAS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let settings = Settings::default();
        assert_eq!(settings.decoder.error_policy, ErrorPolicy::Collect);
        assert!(!settings.decoder.log_unknown_keys);
    }

    #[test]
    fn test_serialize_config() {
        let settings = Settings {
            decoder: DecoderConfig::fail_fast(),
        };
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        assert!(toml_str.contains("[decoder]"));
        assert!(toml_str.contains("error_policy = \"fail_fast\""));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let path = path.to_str().unwrap();

        let settings = Settings {
            decoder: DecoderConfig {
                error_policy: ErrorPolicy::FailFast,
                log_unknown_keys: true,
            },
        };
        settings.save(path).unwrap();

        let loaded = Settings::load_from(Some(path)).unwrap();
        assert_eq!(loaded.decoder, settings.decoder);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(Settings::load_from(path.to_str()).is_err());
    }
}
