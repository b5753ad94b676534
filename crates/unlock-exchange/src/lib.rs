//! # unlock-exchange
//!
//! Talks to the unlock service: the advisory clear-policy lookup and the
//! exchange of device facts plus an authenticated session for an unlock
//! credential. Responses are classified into closed variants by
//! [`classify_unlock_response`], which performs no I/O.

mod classify;
mod client;
mod error;
mod types;

pub use classify::{classify_unlock_response, RATE_LIMITED_CODE};
pub use client::{HttpUnlockService, UnlockService};
pub use error::{ExchangeError, ExchangeResult};
pub use types::{retry_at, ClearPolicy, UnlockRequestResult};
