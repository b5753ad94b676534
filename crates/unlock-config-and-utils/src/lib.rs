//! Configuration, filesystem paths, and logging for the unlock tool.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{Config, DEFAULT_ACCOUNT_URL, DEFAULT_LOG_LEVEL, DEFAULT_UNLOCK_API_URL};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
