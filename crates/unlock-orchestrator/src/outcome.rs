use account_auth::AuthError;
use chrono::{DateTime, Utc};
use fastboot_ops::FastbootError;
use thiserror::Error;
use unlock_exchange::ExchangeError;

/// Terminal result of one unlock attempt.
#[derive(Debug)]
pub enum UnlockOutcome {
    Success {
        serial: Option<String>,
        output: String,
    },
    AlreadyUnlocked,
    Cancelled,
    DeniedWithMessage {
        code: i64,
        message: String,
    },
    RateLimited {
        code: i64,
        retry_after: DateTime<Utc>,
    },
    /// The device or the control executable failed. Holds captured output.
    TransportFailure {
        cause: String,
    },
    Failure(UnlockError),
}

impl UnlockOutcome {
    /// Outcomes that leave nothing for the user to fix.
    pub fn is_ok(&self) -> bool {
        matches!(
            self,
            Self::Success { .. } | Self::AlreadyUnlocked | Self::Cancelled
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::AlreadyUnlocked => "already_unlocked",
            Self::Cancelled => "cancelled",
            Self::DeniedWithMessage { .. } => "denied",
            Self::RateLimited { .. } => "rate_limited",
            Self::TransportFailure { .. } => "transport_failure",
            Self::Failure(_) => "failure",
        }
    }
}

/// Failures that end the workflow without a more specific outcome.
#[derive(Debug, Error)]
pub enum UnlockError {
    #[error("no {field} entered after {attempts} attempts")]
    Input { field: &'static str, attempts: u32 },

    #[error("could not read console input: {0}")]
    Prompt(#[from] std::io::Error),

    #[error("no web device id could be extracted from the browser redirect")]
    WebIdentityUnavailable,

    #[error("no device answered; connect the phone in bootloader mode")]
    DeviceUnreachable,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    ExchangeTransport(#[from] ExchangeError),

    #[error("unexpected response from the unlock service: {raw}")]
    ExchangeMalformed { raw: String },

    #[error(transparent)]
    Execution(FastbootError),

    #[error("invalid workflow transition: {0}")]
    InvalidTransition(String),
}

impl UnlockError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Input { .. } => "input_missing",
            Self::Prompt(_) => "input_unreadable",
            Self::WebIdentityUnavailable => "web_identity_unavailable",
            Self::DeviceUnreachable => "device_unreachable",
            Self::Auth(err) => err.code(),
            Self::ExchangeTransport(err) => err.code(),
            Self::ExchangeMalformed { .. } => "exchange_malformed",
            Self::Execution(err) => err.code(),
            Self::InvalidTransition(_) => "invalid_transition",
        }
    }
}
