//! # account-auth
//!
//! Exchanges the stored account identity for an authenticated session and
//! extracts the web device id from browser redirect text.

mod client;
mod error;
mod types;
mod web_identity;

pub use client::{hash_credential, AccountAuthenticator, HttpAccountAuthenticator};
pub use error::{AuthError, AuthResult};
pub use types::{AuthSession, LoginRequest};
pub use web_identity::{extract_web_device_id, web_login_url};
