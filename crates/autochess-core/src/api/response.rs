//! Login response contract.
//!
//! The backend answers `POST /login` either with a tagged JSON document
//! (`{"status":"ok","token":"..."}` / `{"status":"error","message":"..."}`)
//! or, on older deployments, with a bare body where a trailing `=` marks a
//! base64-padded token. The bare form cannot tell a token from an error
//! message that happens to end in `=`, so it is only used when the body is
//! not a tagged document (or when explicitly configured).

use serde::{Deserialize, Serialize};

/// How a login response body is turned into a token or a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum ResponseContract {
    /// Tagged JSON first, bare-suffix fallback.
    #[default]
    Auto,
    /// Tagged JSON only.
    Structured,
    /// Bare body, token iff non-empty and ending in `=`.
    Legacy,
}

impl std::str::FromStr for ResponseContract {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "structured" => Ok(Self::Structured),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("unknown response contract: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LoginResponse {
    Ok { token: String },
    Error { message: String },
}

impl ResponseContract {
    /// Classify a 2xx response body.
    ///
    /// Returns the token on success, or the rejection value to surface to
    /// the caller.
    pub fn classify(self, body: &str) -> Result<String, String> {
        match self {
            ResponseContract::Structured => match serde_json::from_str::<LoginResponse>(body) {
                Ok(response) => Self::from_structured(response, body),
                Err(_) => Err(body.to_string()),
            },
            ResponseContract::Legacy => Self::from_legacy(body),
            ResponseContract::Auto => match serde_json::from_str::<LoginResponse>(body) {
                Ok(response) => Self::from_structured(response, body),
                Err(_) => Self::from_legacy(body),
            },
        }
    }

    fn from_structured(response: LoginResponse, body: &str) -> Result<String, String> {
        match response {
            LoginResponse::Ok { token } if !token.is_empty() => Ok(token),
            LoginResponse::Ok { .. } => Err(body.to_string()),
            LoginResponse::Error { message } => Err(message),
        }
    }

    fn from_legacy(body: &str) -> Result<String, String> {
        if !body.is_empty() && body.ends_with('=') {
            Ok(body.to_string())
        } else {
            Err(body.to_string())
        }
    }
}
