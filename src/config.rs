//! Configuration module

use std::env;
use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set. Export it (or add it to a .env file) and restart EcoVision.")]
    MissingApiKey,

    #[error("invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface to bind
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// JSON file holding the analysis log
    pub stats_file: PathBuf,

    /// Directory for uploaded images
    pub upload_dir: PathBuf,

    /// Largest accepted request body
    pub max_upload_bytes: usize,

    /// Classification service settings
    pub gemini: GeminiConfig,
}

/// Classification service settings
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout_seconds: u64,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            host: parse_or(&lookup, "ECOVISION_HOST", IpAddr::from([127, 0, 0, 1]))?,

            port: parse_or(&lookup, "PORT", 8501)?,

            stats_file: lookup("ECOVISION_STATS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("ecovision_stats.json")),

            upload_dir: lookup("ECOVISION_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),

            max_upload_bytes: parse_or(&lookup, "ECOVISION_MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,

            gemini: GeminiConfig {
                api_key,
                model: lookup("GEMINI_MODEL")
                    .unwrap_or_else(|| "gemini-2.5-flash".to_string()),
                api_base: lookup("GEMINI_API_BASE")
                    .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string()),
                timeout_seconds: parse_or(&lookup, "GEMINI_TIMEOUT_SECONDS", 30)?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
        assert!(err.to_string().contains("GEMINI_API_KEY"));

        let err = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "secret")])).unwrap();
        assert_eq!(config.port, 8501);
        assert_eq!(config.host, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(config.stats_file, PathBuf::from("ecovision_stats.json"));
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.timeout_seconds, 30);
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "secret"),
            ("PORT", "9000"),
            ("GEMINI_TIMEOUT_SECONDS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.gemini.timeout_seconds, 5);

        let err = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "secret"), ("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "top-secret")])).unwrap();
        assert!(!format!("{:?}", config).contains("top-secret"));
    }
}
