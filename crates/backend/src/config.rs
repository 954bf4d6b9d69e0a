use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not a valid port: {value}")]
    InvalidPort { name: &'static str, value: String },
}

/// Server settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub openweather_api_key: String,
    pub openweather_base_url: String,
    pub dist_dir: PathBuf,
    pub assets_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let openweather_api_key =
            get("OPENWEATHER_API_KEY").ok_or(ConfigError::Missing("OPENWEATHER_API_KEY"))?;

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { name: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let openweather_base_url = get("OPENWEATHER_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENWEATHER_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Config {
            port,
            openweather_api_key,
            openweather_base_url,
            dist_dir: PathBuf::from(get("DIST_DIR").unwrap_or_else(|| "dist".to_string())),
            assets_dir: PathBuf::from(get("ASSETS_DIR").unwrap_or_else(|| "assets".to_string())),
        })
    }
}
