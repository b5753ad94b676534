use thiserror::Error;

/// Failures while locating, reading or validating local configuration.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No usable base directory on this platform.
    #[error("cannot resolve tool directory: {0}")]
    Path(String),
}

impl CoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_invalid",
            Self::Io(_) => "config_io",
            Self::InvalidUrl(_) => "config_url",
            Self::Json(_) => "config_json",
            Self::Path(_) => "config_path",
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
