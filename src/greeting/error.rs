use crate::backends::LlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GreetingError {
    #[error("Please enter your name.")]
    EmptyName,

    #[error("{0}")]
    Service(#[from] LlmError),
}

impl GreetingError {
    pub fn is_validation(&self) -> bool {
        matches!(self, GreetingError::EmptyName)
    }
}
