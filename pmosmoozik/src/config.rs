//! Client configuration
//!
//! ```yaml
//! api_key: "..."
//! secret: "..."
//! format: xml              # or json
//! blocking: true
//! base_url: "https://www.smoozik.com/index.php/api/"
//! timeout_secs: 30
//! user_agent: "PMOMusic/0.1.0 (pmosmoozik)"
//! array_detection: sibling_repetition_or_plural
//! ```
//!
//! Every field except `api_key` and `secret` has a default. Values can be
//! overridden from the environment with the `SMOOZIK_` variables listed in
//! [`SmoozikConfig::apply_env_overrides`].

use crate::api::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::error::{Error, Result};
use crate::parser::{ArrayDetection, ResponseFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Prefix of the environment variables read by [`SmoozikConfig::from_env`]
pub const ENV_PREFIX: &str = "SMOOZIK_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmoozikConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub format: ResponseFormat,
    #[serde(default = "SmoozikConfig::default_blocking")]
    pub blocking: bool,
    #[serde(default = "SmoozikConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "SmoozikConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "SmoozikConfig::default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub array_detection: ArrayDetection,
}

impl SmoozikConfig {
    const fn default_blocking() -> bool {
        true
    }

    fn default_base_url() -> String {
        DEFAULT_BASE_URL.to_string()
    }

    const fn default_timeout_secs() -> u64 {
        DEFAULT_REQUEST_TIMEOUT_SECS
    }

    fn default_user_agent() -> String {
        DEFAULT_USER_AGENT.to_string()
    }

    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret: secret.into(),
            ..Default::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading Smoozik configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides(std::env::vars())?;
        Ok(config)
    }

    /// Applies `SMOOZIK_API_KEY`, `SMOOZIK_SECRET`, `SMOOZIK_FORMAT`,
    /// `SMOOZIK_BLOCKING`, `SMOOZIK_BASE_URL`, `SMOOZIK_TIMEOUT_SECS`,
    /// `SMOOZIK_USER_AGENT` and `SMOOZIK_ARRAY_DETECTION` from `vars`.
    /// Other variables are ignored.
    pub fn apply_env_overrides<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value: String = value.into();

            match name {
                "API_KEY" => self.api_key = value,
                "SECRET" => self.secret = value,
                "FORMAT" => self.format = value.parse()?,
                "BLOCKING" => self.blocking = parse_bool(&value)?,
                "BASE_URL" => self.base_url = value,
                "TIMEOUT_SECS" => {
                    self.timeout_secs = value
                        .trim()
                        .parse()
                        .map_err(|_| Error::config(format!("invalid timeout: {}", value)))?;
                }
                "USER_AGENT" => self.user_agent = value,
                "ARRAY_DETECTION" => {
                    self.array_detection = serde_yaml::from_str(&value).map_err(|_| {
                        Error::config(format!("invalid array detection: {}", value))
                    })?;
                }
                _ => continue,
            }
            debug!("Configuration override from {}{}", ENV_PREFIX, name);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::config("api_key is required"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be positive"));
        }
        Ok(())
    }
}

impl Default for SmoozikConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secret: String::new(),
            format: ResponseFormat::default(),
            blocking: Self::default_blocking(),
            base_url: Self::default_base_url(),
            timeout_secs: Self::default_timeout_secs(),
            user_agent: Self::default_user_agent(),
            array_detection: ArrayDetection::default(),
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::config(format!("invalid boolean: {}", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_yaml() {
        let config = SmoozikConfig::from_yaml_str("api_key: k\nsecret: s\n").unwrap();
        assert_eq!(config, SmoozikConfig::new("k", "s"));
        assert!(config.blocking);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.format, ResponseFormat::Xml);
        assert_eq!(config.array_detection, ArrayDetection::SiblingRepetitionOrPlural);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
api_key: k
secret: s
format: json
blocking: false
base_url: "http://localhost:8080/api/"
timeout_secs: 5
user_agent: test
array_detection: sibling_repetition
"#;
        let config = SmoozikConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.format, ResponseFormat::Json);
        assert!(!config.blocking);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent, "test");
        assert_eq!(config.array_detection, ArrayDetection::SiblingRepetition);
    }

    #[test]
    fn test_module_doc_example() {
        let yaml = r#"
api_key: "..."
secret: "..."
format: xml              # or json
blocking: true
base_url: "https://www.smoozik.com/index.php/api/"
timeout_secs: 30
user_agent: "PMOMusic/0.1.0 (pmosmoozik)"
array_detection: sibling_repetition_or_plural
"#;
        let config = SmoozikConfig::from_yaml_str(yaml).unwrap();
        let defaults = SmoozikConfig::new("...", "...");
        assert_eq!(config.user_agent, defaults.user_agent);
        assert_eq!(config.base_url, defaults.base_url);
        assert_eq!(config.timeout_secs, defaults.timeout_secs);
        assert_eq!(config.format, defaults.format);
        assert_eq!(config.array_detection, defaults.array_detection);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = SmoozikConfig::from_yaml_str("format: csv").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SmoozikConfig::new("k", "s");
        config
            .apply_env_overrides([
                ("SMOOZIK_API_KEY", "env-key"),
                ("SMOOZIK_FORMAT", "JSON"),
                ("SMOOZIK_BLOCKING", "no"),
                ("SMOOZIK_TIMEOUT_SECS", "12"),
                ("SMOOZIK_ARRAY_DETECTION", "sibling_repetition"),
                ("SMOOZIK_UNKNOWN", "ignored"),
                ("HOME", "/root"),
            ])
            .unwrap();

        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.secret, "s");
        assert_eq!(config.format, ResponseFormat::Json);
        assert!(!config.blocking);
        assert_eq!(config.timeout_secs, 12);
        assert_eq!(config.array_detection, ArrayDetection::SiblingRepetition);
    }

    #[test]
    fn test_invalid_env_values() {
        let mut config = SmoozikConfig::default();
        assert!(config.apply_env_overrides([("SMOOZIK_BLOCKING", "maybe")]).is_err());
        assert!(config.apply_env_overrides([("SMOOZIK_TIMEOUT_SECS", "-1")]).is_err());
        assert!(matches!(
            config.apply_env_overrides([("SMOOZIK_FORMAT", "csv")]),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_validate() {
        assert!(SmoozikConfig::default().validate().is_err());
        assert!(SmoozikConfig::new("k", "s").validate().is_ok());

        let mut config = SmoozikConfig::new("k", "s");
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = SmoozikConfig::load("/nonexistent/smoozik.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
