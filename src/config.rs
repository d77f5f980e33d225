use crate::types::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Environment variable that takes precedence over `weather.api_key`.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path))?;
        Ok(config)
    }

    /// Load `path` if it exists. `None` means the caller runs on defaults.
    pub fn load_optional(path: &str) -> Result<Option<Self>> {
        if Path::new(path).exists() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Resolve the provider API key: environment first, then config file.
    pub fn api_key(&self) -> Option<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        resolve_api_key(from_env, &self.weather.api_key)
    }
}

fn resolve_api_key(from_env: Option<String>, from_file: &str) -> Option<String> {
    from_env
        .filter(|k| !k.trim().is_empty())
        .or_else(|| Some(from_file.to_string()).filter(|k| !k.trim().is_empty()))
}
