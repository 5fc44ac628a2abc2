use crate::console::VerbosityLevel;
use crate::greeting::{DayBoundaries, Languages};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{collections::HashMap, fs};

mod error;

pub use error::{ConfigError, ConfigResult};

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct BackendConfig {
    pub api_key: Option<String>,
    /// Environment variable holding the API key; defaults to `<NAME>_API_KEY`.
    pub api_key_env: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub chat_api: Option<String>,
    pub temperature: Option<f32>,
    /// Set to `false` for local endpoints that take no credential.
    pub require_api_key: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    pub default_backend: String,
    #[serde(default)]
    pub verbosity: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub languages: Languages,
    #[serde(default)]
    pub day_boundaries: DayBoundaries,
    #[serde(default)]
    pub backends: HashMap<String, BackendConfig>,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_backend: "gemini".to_string(),
            verbosity: None,
            request_timeout_secs: default_request_timeout_secs(),
            languages: Languages::default(),
            day_boundaries: DayBoundaries::default(),
            backends: HashMap::new(),
        }
    }
}

// Longer suffixes first: `require_api_key` and `api_key_env` both contain `api_key`.
const BACKEND_SETTINGS: [&str; 7] = [
    "require_api_key",
    "api_key_env",
    "temperature",
    "base_url",
    "chat_api",
    "api_key",
    "model",
];

impl AppConfig {
    /// Load `~/.config/salam/config.toml`, writing the defaults there on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = toml::from_str(&content).map_err(ConfigError::InvalidToml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")
    }

    pub fn config_path() -> ConfigResult<PathBuf> {
        let mut path = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        path.push(".config");
        path.push("salam");
        path.push("config.toml");
        Ok(path)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.day_boundaries.is_valid() {
            let b = self.day_boundaries;
            return Err(ConfigError::InvalidValue {
                field: "day_boundaries".to_string(),
                value: format!(
                    "{}/{}/{} (need 0 < afternoon < evening < night <= 24)",
                    b.afternoon_start, b.evening_start, b.night_start
                ),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        if let Some(ref verbosity) = self.verbosity {
            verbosity
                .parse::<VerbosityLevel>()
                .map_err(|_| ConfigError::InvalidValue {
                    field: "verbosity".to_string(),
                    value: verbosity.clone(),
                })?;
        }
        Ok(())
    }

    pub fn get_backend_config(&self, backend_name: &str) -> Option<&BackendConfig> {
        self.backends.get(backend_name)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the configured verbosity level, falling back to Normal if not set
    pub fn get_verbosity(&self) -> VerbosityLevel {
        self.verbosity
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    /// Name of the environment variable that carries `backend_name`'s key.
    pub fn api_key_env(&self, backend_name: &str) -> String {
        self.get_backend_config(backend_name)
            .and_then(|c| c.api_key_env.clone())
            .unwrap_or_else(|| format!("{}_API_KEY", backend_name.to_uppercase()))
    }

    /// Find the credential for `backend_name`: the environment first, then the
    /// config file. `lookup_env` is `std::env::var` in production.
    pub fn resolve_api_key<F>(&self, backend_name: &str, lookup_env: F) -> ConfigResult<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: String| {
            let key = key.trim();
            (!key.is_empty()).then(|| key.to_string())
        };

        let env_var = self.api_key_env(backend_name);
        lookup_env(&env_var)
            .and_then(non_blank)
            .or_else(|| {
                self.get_backend_config(backend_name)
                    .and_then(|c| c.api_key.clone())
                    .and_then(non_blank)
            })
            .ok_or(ConfigError::MissingCredential { env_var })
    }

    /// Whether startup must find a credential for `backend_name`. Every backend
    /// except `mock` needs one unless its `require_api_key` is `false`.
    pub fn requires_api_key(&self, backend_name: &str) -> bool {
        if backend_name == "mock" {
            return false;
        }
        self.get_backend_config(backend_name)
            .and_then(|c| c.require_api_key)
            .unwrap_or(true)
    }

    pub fn update_backend_setting(
        &mut self,
        backend_name: &str,
        key: &str,
        value: String,
    ) -> ConfigResult<()> {
        let config = self.backends.entry(backend_name.to_string()).or_default();

        match key {
            "api_key" => config.api_key = Some(value),
            "api_key_env" => config.api_key_env = Some(value),
            "model" => config.model = Some(value),
            "base_url" => config.base_url = Some(value.trim_end_matches('/').to_string()),
            "chat_api" => config.chat_api = Some(value),
            "temperature" => {
                let temp: f32 = value.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "temperature".to_string(),
                    value: value.clone(),
                })?;
                config.temperature = Some(temp);
            }
            "require_api_key" => {
                let required: bool = value.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "require_api_key".to_string(),
                    value: value.clone(),
                })?;
                config.require_api_key = Some(required);
            }
            _ => {
                return Err(ConfigError::UnknownConfigKey {
                    key: key.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Apply a `salam config set <key> <value>` assignment.
    pub fn set(&mut self, key: &str, value: String) -> ConfigResult<()> {
        let invalid = |field: &str, value: &str| ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        };

        match key {
            "default_backend" => self.default_backend = value,
            "verbosity" => {
                let level: VerbosityLevel = value.parse().map_err(|_| invalid(key, &value))?;
                self.verbosity = Some(level.to_string());
            }
            "request_timeout_secs" => {
                self.request_timeout_secs = value
                    .parse()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| invalid(key, &value))?;
            }
            "languages" => {
                let (primary, secondary) = value
                    .split_once(',')
                    .map(|(a, b)| (a.trim(), b.trim()))
                    .filter(|(a, b)| !a.is_empty() && !b.is_empty())
                    .ok_or_else(|| invalid(key, &value))?;
                self.languages = Languages::new(primary, secondary);
            }
            "afternoon_start" | "evening_start" | "night_start" => {
                let hour: u32 = value.parse().map_err(|_| invalid(key, &value))?;
                let mut boundaries = self.day_boundaries;
                match key {
                    "afternoon_start" => boundaries.afternoon_start = hour,
                    "evening_start" => boundaries.evening_start = hour,
                    _ => boundaries.night_start = hour,
                }
                if !boundaries.is_valid() {
                    return Err(invalid(key, &value));
                }
                self.day_boundaries = boundaries;
            }
            _ => {
                let (backend_name, setting) = split_backend_key(key).ok_or_else(|| {
                    ConfigError::UnknownConfigKey {
                        key: key.to_string(),
                    }
                })?;
                self.update_backend_setting(backend_name, setting, value)?;
            }
        }

        Ok(())
    }
}

/// Split `<backend>_<setting>` keys such as `gemini_api_key`.
fn split_backend_key(key: &str) -> Option<(&str, &'static str)> {
    BACKEND_SETTINGS.iter().find_map(|setting| {
        key.strip_suffix(setting)
            .and_then(|rest| rest.strip_suffix('_'))
            .filter(|backend| !backend.is_empty())
            .map(|backend| (backend, *setting))
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
