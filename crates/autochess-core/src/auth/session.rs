use serde::{Deserialize, Serialize};

use super::AuthError;

/// Signed-in user profile.
///
/// Nothing populates this yet; the login endpoint only returns a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct User {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
}

/// In-memory authentication state owned by the auth store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum AuthStatus {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

impl AuthStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            AuthStatus::Unauthenticated => "logged out",
            AuthStatus::Authenticating => "logging in",
            AuthStatus::Authenticated => "logged in",
        }
    }
}

/// Synchronous state transitions. The only way `Session` changes.
#[derive(Debug, Clone)]
pub enum Mutation {
    LoginSuccess(String),
    /// Carries the failure for logging; it is not kept in state.
    LoginFailure(AuthError),
    Logout,
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::LoginSuccess(_) => "LOGIN_SUCCESS",
            Mutation::LoginFailure(_) => "LOGIN_FAILURE",
            Mutation::Logout => "LOGOUT",
        }
    }
}

impl Session {
    /// Session restored from a persisted token
    pub fn with_token(token: Option<String>) -> Self {
        Self { token, user: None }
    }

    pub fn apply(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::LoginSuccess(token) => self.token = Some(token.clone()),
            Mutation::LoginFailure(_) | Mutation::Logout => self.token = None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().map(|t| !t.is_empty()).unwrap_or(false)
    }

    pub fn status(&self) -> AuthStatus {
        if self.is_authenticated() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }
}
