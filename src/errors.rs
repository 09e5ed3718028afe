use thiserror::Error;

#[derive(Error, Debug)]
pub enum DebtError {
    #[error("invalid input: {message}")]
    InvalidInput {
        message: String,
    },

    #[error("authentication required: no session token present")]
    AuthenticationRequired,

    #[error("remote operation failed: {message}")]
    RemoteOperationFailed {
        message: String,
    },

    #[error("malformed response: {message}")]
    MalformedResponse {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("token storage error: {message}")]
    Storage {
        message: String,
    },
}

impl DebtError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        DebtError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        DebtError::RemoteOperationFailed {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        DebtError::MalformedResponse {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DebtError>;
