//! Authentication module: login state and token persistence.
//!
//! This module provides:
//! - `AuthStore`: owns the `Session`, runs the login/logout actions
//! - `TokenStorage`: durable home of the token (file, keychain, or memory)
//! - `Credentials`: the email/password pair sent to the backend
//!
//! The token is restored from storage when the store is created.

pub mod credentials;
pub mod error;
pub mod session;
pub mod storage;
pub mod store;

pub use credentials::Credentials;
pub use error::AuthError;
pub use session::{AuthStatus, Mutation, Session, User};
pub use storage::{
    FileTokenStorage, KeyringTokenStorage, MemoryTokenStorage, StorageBackend, TokenStorage,
    TOKEN_KEY,
};
pub use store::AuthStore;
