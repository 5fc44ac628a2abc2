use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    RateLimit {
        retry_after: Option<u64>,
        message: String,
    },
    ServerError {
        status: u16,
        message: String,
    },
    AuthenticationError {
        message: String,
    },
    NetworkError {
        message: String,
    },
    Timeout {
        after: Duration,
    },
    InvalidResponse {
        message: String,
    },
    Other {
        message: String,
    },
}

impl LlmError {
    pub fn user_message(&self) -> String {
        match self {
            LlmError::RateLimit {
                retry_after: Some(seconds),
                message,
            } => format!("Rate limit (retry after {}s): {}", seconds, message),
            LlmError::RateLimit { message, .. } => format!("Rate limit: {}", message),
            LlmError::ServerError { status, message } => {
                format!("Server error ({}): {}", status, message)
            }
            LlmError::AuthenticationError { message } => {
                format!("Authentication error: {}", message)
            }
            LlmError::NetworkError { message } => format!("Network error: {}", message),
            LlmError::Timeout { after } => format!("Request timed out after {:?}", after),
            LlmError::InvalidResponse { message } => format!("Invalid response: {}", message),
            LlmError::Other { message } => format!("Error: {}", message),
        }
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for LlmError {}
