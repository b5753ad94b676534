use fastboot_ops::DeviceFacts;
use std::io;
use unlock_exchange::ClearPolicy;

/// Empty answers are re-asked this many times in total.
pub const MAX_PROMPT_ATTEMPTS: u32 = 3;

/// Presentation seam for the values only the user can supply.
///
/// Implementations return raw answers. Validation and retries are the
/// workflow's job.
pub trait Prompter: Send + Sync {
    fn account(&self) -> io::Result<String>;

    fn credential(&self) -> io::Result<String>;

    /// Show `login_url` and return whatever the user pasted back.
    fn web_device_id(&self, login_url: &str) -> io::Result<String>;

    /// Present the device and the data-wipe warning, return the answer.
    fn confirm_unlock(&self, facts: &DeviceFacts, policy: ClearPolicy) -> io::Result<String>;
}

/// Only `y` or `yes`, in any case, confirms.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_answers() {
        for answer in ["y", "Y", "yes", " YES \n"] {
            assert!(is_affirmative(answer), "{answer:?}");
        }
    }

    #[test]
    fn everything_else_declines() {
        for answer in ["", "n", "no", "q", "yep", "ok", "\n"] {
            assert!(!is_affirmative(answer), "{answer:?}");
        }
    }
}
