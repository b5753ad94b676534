use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("unlock service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ExchangeError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "exchange_transport",
        }
    }
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;
