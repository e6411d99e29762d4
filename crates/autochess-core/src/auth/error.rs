use thiserror::Error;

use crate::api::ApiError;

/// Why a login attempt failed.
///
/// `Clone` so every caller joined to the same in-flight login receives it.
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    /// The backend answered, but not with a token. Carries the response value.
    #[error("Login rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Another login is already in progress")]
    LoginInProgress,

    #[error("Login task failed: {0}")]
    Interrupted(String),
}

impl AuthError {
    /// The backend's rejection value, if this was an application-level rejection
    pub fn rejection(&self) -> Option<&str> {
        match self {
            AuthError::Rejected(value) => Some(value),
            _ => None,
        }
    }

    /// User-facing message for front ends
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Rejected(value) if value.is_empty() => "Login failed".to_string(),
            AuthError::Rejected(value) => value.clone(),
            AuthError::Api(ApiError::Unauthorized(_)) => "Invalid email or password".to_string(),
            AuthError::Api(e) if e.is_network() => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            other => format!("Login failed: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_value() {
        let err = AuthError::Rejected("invalid credentials".to_string());
        assert_eq!(err.rejection(), Some("invalid credentials"));
        assert_eq!(err.user_message(), "invalid credentials");
        assert_eq!(AuthError::LoginInProgress.rejection(), None);
    }

    #[test]
    fn test_user_message_for_unauthorized() {
        let err = AuthError::from(ApiError::Unauthorized(String::new()));
        assert_eq!(err.user_message(), "Invalid email or password");
    }

    #[test]
    fn test_user_message_for_empty_rejection() {
        assert_eq!(AuthError::Rejected(String::new()).user_message(), "Login failed");
    }
}
