// Unit tests for the config module: defaults, file round trips, `config set`
// keys and credential lookup.

use super::*;
use tempfile::TempDir;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn default_config_targets_gemini() {
    let config = AppConfig::default();

    assert_eq!(config.default_backend, "gemini");
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.day_boundaries, DayBoundaries::default());
    assert_eq!(config.languages, Languages::new("Urdu", "English"));
    assert!(config.backends.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn minimal_toml_fills_in_defaults() {
    let config: AppConfig = toml::from_str("default_backend = \"openai\"").unwrap();

    assert_eq!(config.default_backend, "openai");
    assert_eq!(config.request_timeout_secs, 30);
    assert_eq!(config.day_boundaries, DayBoundaries::default());
    assert_eq!(config.get_verbosity(), VerbosityLevel::Normal);
}

#[test]
fn config_round_trips_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = AppConfig::default();
    config.set("gemini_model", "gemini-1.5-pro".to_string()).unwrap();
    config.set("languages", "Punjabi, English".to_string()).unwrap();
    config.set("verbosity", "verbose".to_string()).unwrap();
    config.save_to(&path).unwrap();

    let loaded = AppConfig::load_from(&path).unwrap();

    assert_eq!(loaded, config);
    assert_eq!(loaded.get_verbosity(), VerbosityLevel::Verbose);
    assert_eq!(
        loaded
            .get_backend_config("gemini")
            .and_then(|c| c.model.as_deref()),
        Some("gemini-1.5-pro")
    );
}

#[test]
fn load_rejects_invalid_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "default_backend = ").unwrap();

    let error = AppConfig::load_from(&path).unwrap_err();

    assert!(error.to_string().contains("Invalid TOML syntax"));
}

#[test]
fn load_rejects_overlapping_boundaries() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
default_backend = "gemini"

[day_boundaries]
afternoon_start = 18
evening_start = 12
night_start = 20
"#,
    )
    .unwrap();

    let error = AppConfig::load_from(&path).unwrap_err();

    assert!(error.to_string().contains("day_boundaries"));
}

#[test]
fn set_updates_boundaries_only_when_still_valid() {
    let mut config = AppConfig::default();

    config.set("night_start", "21".to_string()).unwrap();
    assert_eq!(config.day_boundaries.night_start, 21);

    let error = config.set("evening_start", "22".to_string()).unwrap_err();
    assert!(matches!(error, ConfigError::InvalidValue { .. }));
    assert_eq!(config.day_boundaries.evening_start, 18);
}

#[test]
fn set_rejects_bad_values() {
    let mut config = AppConfig::default();

    assert!(config.set("verbosity", "loud".to_string()).is_err());
    assert!(config.set("request_timeout_secs", "0".to_string()).is_err());
    assert!(config.set("languages", "Urdu".to_string()).is_err());
    assert!(config.set("gemini_temperature", "warm".to_string()).is_err());
    assert!(matches!(
        config.set("colour", "purple".to_string()),
        Err(ConfigError::UnknownConfigKey { .. })
    ));
}

#[test]
fn set_splits_backend_keys() {
    let mut config = AppConfig::default();

    config.set("gemini_api_key", "k".to_string()).unwrap();
    config.set("gemini_api_key_env", "GOOGLE_KEY".to_string()).unwrap();
    config.set("local_llm_base_url", "http://localhost:8080/v1/".to_string()).unwrap();
    config.set("local_llm_chat_api", "/chat".to_string()).unwrap();
    config.set("local_llm_temperature", "0.4".to_string()).unwrap();

    let gemini = config.get_backend_config("gemini").unwrap();
    assert_eq!(gemini.api_key.as_deref(), Some("k"));
    assert_eq!(gemini.api_key_env.as_deref(), Some("GOOGLE_KEY"));

    let local = config.get_backend_config("local_llm").unwrap();
    assert_eq!(local.base_url.as_deref(), Some("http://localhost:8080/v1"));
    assert_eq!(local.chat_api.as_deref(), Some("/chat"));
    assert_eq!(local.temperature, Some(0.4));
}

#[test]
fn api_key_env_defaults_to_backend_name() {
    let config = AppConfig::default();

    assert_eq!(config.api_key_env("gemini"), "GEMINI_API_KEY");
    assert_eq!(config.api_key_env("openai"), "OPENAI_API_KEY");
}

#[test]
fn resolve_api_key_prefers_environment() {
    let mut config = AppConfig::default();
    config.set("gemini_api_key", "from-file".to_string()).unwrap();

    let key = config
        .resolve_api_key("gemini", |var| {
            (var == "GEMINI_API_KEY").then(|| "from-env".to_string())
        })
        .unwrap();

    assert_eq!(key, "from-env");
}

#[test]
fn resolve_api_key_falls_back_to_config_file() {
    let mut config = AppConfig::default();
    config.set("gemini_api_key", "from-file".to_string()).unwrap();

    assert_eq!(config.resolve_api_key("gemini", no_env).unwrap(), "from-file");
}

#[test]
fn blank_environment_value_falls_through_to_config_file() {
    let mut config = AppConfig::default();
    config.set("gemini_api_key", "from-file".to_string()).unwrap();

    let empty = config
        .resolve_api_key("gemini", |_| Some(String::new()))
        .unwrap();
    let spaces = config
        .resolve_api_key("gemini", |_| Some("  ".to_string()))
        .unwrap();

    assert_eq!(empty, "from-file");
    assert_eq!(spaces, "from-file");
}

#[test]
fn resolve_api_key_honours_custom_env_var() {
    let mut config = AppConfig::default();
    config.set("gemini_api_key_env", "GOOGLE_KEY".to_string()).unwrap();

    let key = config
        .resolve_api_key("gemini", |var| (var == "GOOGLE_KEY").then(|| "g".to_string()))
        .unwrap();

    assert_eq!(key, "g");
}

#[test]
fn missing_credential_names_the_variable() {
    let config = AppConfig::default();

    let error = config
        .resolve_api_key("gemini", |_| Some("   ".to_string()))
        .unwrap_err();

    assert!(matches!(error, ConfigError::MissingCredential { .. }));
    assert_eq!(
        error.to_string(),
        "Please set the GEMINI_API_KEY in the .env file."
    );
}

#[test]
fn requires_api_key_unless_backend_opts_out() {
    let mut config = AppConfig::default();

    assert!(!config.requires_api_key("mock"));
    assert!(config.requires_api_key("gemini"));
    assert!(config.requires_api_key("local"));

    config
        .set("local_require_api_key", "false".to_string())
        .unwrap();

    assert!(!config.requires_api_key("local"));
    assert_eq!(
        config.get_backend_config("local").unwrap().require_api_key,
        Some(false)
    );
    assert!(config.get_backend_config("local_require").is_none());
    assert!(config.requires_api_key("gemini"));
}

#[test]
fn require_api_key_must_be_a_bool() {
    let mut config = AppConfig::default();

    let error = config
        .set("local_require_api_key", "sometimes".to_string())
        .unwrap_err();

    assert!(matches!(error, ConfigError::InvalidValue { .. }));
}
