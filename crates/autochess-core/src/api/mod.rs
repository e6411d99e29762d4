//! REST API client module for the autochess backend.
//!
//! This module provides the `ApiClient` for the login endpoint, the
//! `LoginBackend` seam the auth store talks through, and the response
//! contract that turns a login body into a token or a rejection.

pub mod client;
pub mod error;
pub mod response;

pub use client::{ApiClient, LoginBackend, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use error::ApiError;
pub use response::{LoginResponse, ResponseContract};
