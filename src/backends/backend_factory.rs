use crate::backends::{LlmBackend, MockBackend};
#[cfg(feature = "openai-compatible")]
use crate::backends::{OpenAICompatibleBackend, OpenAICompatibleConfig};
use crate::config::{AppConfig, BackendConfig, ConfigError};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Settings resolved at startup and handed to a backend constructor.
pub struct BackendSettings<'a> {
    pub name: &'a str,
    pub config: &'a BackendConfig,
    pub api_key: String,
    pub require_api_key: bool,
    pub request_timeout: Duration,
}

pub trait BackendFactory {
    fn create(settings: BackendSettings<'_>) -> Result<Arc<dyn LlmBackend>>;
}

impl BackendFactory for MockBackend {
    fn create(_settings: BackendSettings<'_>) -> Result<Arc<dyn LlmBackend>> {
        Ok(Arc::new(MockBackend::new()))
    }
}

#[cfg(feature = "openai-compatible")]
impl BackendFactory for OpenAICompatibleBackend {
    fn create(settings: BackendSettings<'_>) -> Result<Arc<dyn LlmBackend>> {
        let (default_model, default_base_url) = match settings.name {
            "gemini" => {
                let defaults = OpenAICompatibleConfig::default();
                (defaults.model, defaults.base_url)
            }
            "openai" => (
                "gpt-4o-mini".to_string(),
                "https://api.openai.com/v1".to_string(),
            ),
            _ => (String::new(), String::new()),
        };

        let config = settings.config;
        let model = config.model.clone().unwrap_or(default_model);
        let base_url = config.base_url.clone().unwrap_or(default_base_url);
        if model.is_empty() || base_url.is_empty() {
            return Err(ConfigError::UnknownBackend {
                backend: settings.name.to_string(),
            }
            .into());
        }

        let openai_config = OpenAICompatibleConfig {
            name: settings.name.to_string(),
            api_key: settings.api_key,
            model,
            base_url,
            chat_api: config
                .chat_api
                .clone()
                .unwrap_or_else(|| "/chat/completions".to_string()),
            temperature: config.temperature,
            request_timeout: settings.request_timeout,
            require_api_key: settings.require_api_key,
        };

        Ok(Arc::new(OpenAICompatibleBackend::new(openai_config)?))
    }
}

/// Build the backend once at startup. `api_key` is ignored by the mock.
pub fn create_backend(
    backend_name: &str,
    config: &AppConfig,
    api_key: Option<String>,
    request_timeout: Duration,
) -> Result<Arc<dyn LlmBackend>> {
    let backend_config = config
        .get_backend_config(backend_name)
        .cloned()
        .unwrap_or_default();
    let settings = BackendSettings {
        name: backend_name,
        config: &backend_config,
        api_key: api_key.unwrap_or_default(),
        require_api_key: config.requires_api_key(backend_name),
        request_timeout,
    };

    match backend_name {
        "mock" => MockBackend::create(settings),
        #[cfg(feature = "openai-compatible")]
        _ => OpenAICompatibleBackend::create(settings),
        #[cfg(not(feature = "openai-compatible"))]
        _ => anyhow::bail!(
            "Unknown backend: {}. Available backends: mock (enable the openai-compatible feature for remote backends)",
            backend_name
        ),
    }
}
