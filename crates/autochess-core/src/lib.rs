//! Core library for the autochess client.
//!
//! - `api`: HTTP client for the backend login endpoint
//! - `auth`: auth state store, credentials, token storage
//! - `config`: persisted settings with environment overrides
//! - `app`: the application context built at startup

pub mod api;
pub mod app;
pub mod auth;
pub mod config;

pub use api::{ApiClient, ApiError, LoginBackend, ResponseContract};
pub use app::App;
pub use auth::{AuthError, AuthStatus, AuthStore, Credentials, Session, TokenStorage, User};
pub use config::Config;
