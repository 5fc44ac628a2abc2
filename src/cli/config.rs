use crate::cli::ConfigAction;
use crate::{AppConfig, console};

pub fn handle_config(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let config = AppConfig::load()?;
            for line in describe(&config) {
                console().plain(&line);
            }
        }
        ConfigAction::Path => {
            console().plain(&AppConfig::config_path()?.display().to_string());
        }
        ConfigAction::Set { key, value } => {
            let mut config = AppConfig::load()?;
            match config.set(&key, value) {
                Ok(()) => {
                    config.save()?;
                    console().success("Configuration updated successfully");
                }
                Err(e) => console().error(&format!(
                    "{}. Keys: default_backend, verbosity, request_timeout_secs, languages, \
                     afternoon_start, evening_start, night_start, or <backend>_<setting> with \
                     setting one of [api_key, api_key_env, model, base_url, chat_api, temperature, require_api_key]",
                    e
                )),
            }
        }
    }
    Ok(())
}

fn mask_api_key(api_key: &str) -> String {
    // Char-based slicing keeps multi-byte keys from panicking
    if api_key.chars().count() > 8 {
        let chars: Vec<char> = api_key.chars().collect();
        let prefix: String = chars.iter().take(4).collect();
        let suffix: String = chars.iter().rev().take(4).rev().collect();
        format!("{}...{}", prefix, suffix)
    } else {
        "***".to_string()
    }
}

fn describe(config: &AppConfig) -> Vec<String> {
    let mut lines = vec![format!("default_backend = \"{}\"", config.default_backend)];
    if let Some(ref verbosity) = config.verbosity {
        lines.push(format!("verbosity = \"{}\"", verbosity));
    }
    lines.push(format!(
        "request_timeout_secs = {}",
        config.request_timeout_secs
    ));

    lines.push(String::new());
    lines.push("[languages]".to_string());
    lines.push(format!("primary = \"{}\"", config.languages.primary));
    lines.push(format!("secondary = \"{}\"", config.languages.secondary));

    let b = config.day_boundaries;
    lines.push(String::new());
    lines.push("[day_boundaries]".to_string());
    lines.push(format!("afternoon_start = {}", b.afternoon_start));
    lines.push(format!("evening_start = {}", b.evening_start));
    lines.push(format!("night_start = {}", b.night_start));

    let mut names: Vec<&String> = config.backends.keys().collect();
    names.sort();
    for name in names {
        let backend = &config.backends[name];
        lines.push(String::new());
        lines.push(format!("[backends.{}]", name));
        if let Some(ref api_key) = backend.api_key {
            lines.push(format!("api_key = \"{}\"", mask_api_key(api_key)));
        }
        if let Some(ref api_key_env) = backend.api_key_env {
            lines.push(format!("api_key_env = \"{}\"", api_key_env));
        }
        if let Some(ref model) = backend.model {
            lines.push(format!("model = \"{}\"", model));
        }
        if let Some(ref base_url) = backend.base_url {
            lines.push(format!("base_url = \"{}\"", base_url));
        }
        if let Some(ref chat_api) = backend.chat_api {
            lines.push(format!("chat_api = \"{}\"", chat_api));
        }
        if let Some(temperature) = backend.temperature {
            lines.push(format!("temperature = {}", temperature));
        }
        if let Some(required) = backend.require_api_key {
            lines.push(format!("require_api_key = {}", required));
        }
    }

    lines
}
