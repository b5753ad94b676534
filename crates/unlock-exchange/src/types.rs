use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Whether unlocking wipes user data on this product. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearPolicy {
    WipesData,
    PreservesData,
    Unknown,
}

impl ClearPolicy {
    /// Interpret the service's `cleanOrNot` flag.
    pub fn from_flag(flag: i64) -> Self {
        match flag {
            1 => Self::WipesData,
            -1 => Self::PreservesData,
            _ => Self::Unknown,
        }
    }
}

/// Classified answer to a credential-exchange request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockRequestResult {
    Granted { credential_hex: String },
    Denied { code: i64, message: String },
    RateLimited { code: i64, wait_hours: u32 },
    /// Matched no known shape. Holds the raw body.
    Malformed { raw: String },
}

/// When a rate-limited request may be retried.
pub fn retry_at(now: DateTime<Utc>, wait_hours: u32) -> DateTime<Utc> {
    now + Duration::hours(i64::from(wait_hours))
}
