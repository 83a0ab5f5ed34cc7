use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_MAX_INPUT_CHARS: usize = 20_000;

/// Pipeline configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub extraction_url: String,
    pub extraction_api_key: Option<String>,
    pub extraction_timeout: Duration,
    pub extraction_max_retries: u32,
    /// Upper bound on narrative text accepted by `extract`, in characters.
    pub max_input_chars: usize,
    pub export_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            extraction_url: require_env("EXTRACTION_SERVICE_URL")?,
            extraction_api_key: std::env::var("EXTRACTION_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            extraction_timeout: Duration::from_secs(parse_env(
                "EXTRACTION_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            extraction_max_retries: parse_env("EXTRACTION_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            max_input_chars: parse_env("MAX_INPUT_CHARS", DEFAULT_MAX_INPUT_CHARS)?,
            export_dir: std::env::var("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("exports")),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// All defaults, pointed at the given extraction endpoint.
    pub fn for_endpoint(url: impl Into<String>) -> Self {
        Config {
            extraction_url: url.into(),
            extraction_api_key: None,
            extraction_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            extraction_max_retries: DEFAULT_MAX_RETRIES,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            export_dir: PathBuf::from("exports"),
            rust_log: "info".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_endpoint_uses_defaults() {
        let config = Config::for_endpoint("http://localhost:9000/extract");
        assert_eq!(config.extraction_url, "http://localhost:9000/extract");
        assert_eq!(config.extraction_max_retries, 3);
        assert_eq!(config.max_input_chars, 20_000);
        assert_eq!(config.extraction_timeout, Duration::from_secs(60));
        assert!(config.extraction_api_key.is_none());
    }

    #[test]
    fn test_parse_env_falls_back_when_unset() {
        let value: u32 = parse_env("RESUME_CORE_TEST_SURELY_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }
}
