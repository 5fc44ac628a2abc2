use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please set the {env_var} in the .env file.")]
    MissingCredential { env_var: String },

    #[error("Invalid TOML syntax: {0}")]
    InvalidToml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Unknown backend '{backend}': set {backend}_base_url and {backend}_model first")]
    UnknownBackend { backend: String },

    #[error("Unknown config key: {key}")]
    UnknownConfigKey { key: String },

    #[error("Failed to get home directory")]
    NoHomeDirectory,
}

pub type ConfigResult<T> = Result<T, ConfigError>;
