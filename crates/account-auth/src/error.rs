use thiserror::Error;

/// Errors from the account service.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("account service rejected the login (code {code}): {description}")]
    Rejected { code: i64, description: String },

    #[error("account requires additional verification at {url}")]
    VerificationRequired { status: i64, url: String },

    #[error("account service response is missing {0}")]
    Incomplete(&'static str),

    #[error("account service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("account service returned an unreadable body: {0}")]
    Json(#[from] serde_json::Error),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "auth_rejected",
            Self::VerificationRequired { .. } => "auth_verification_required",
            Self::Incomplete(_) => "auth_incomplete",
            Self::Transport(_) => "auth_transport",
            Self::Json(_) => "auth_json",
        }
    }

    /// Whether the service itself said no, as opposed to being unreachable.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Rejected { .. } | Self::VerificationRequired { .. }
        )
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
