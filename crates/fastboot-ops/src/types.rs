use serde::Serialize;

/// Bootloader lock status as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    Locked,
    Unlocked,
    Unknown,
}

impl LockState {
    /// Interpret the raw `unlocked` variable.
    pub fn from_status(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => Self::Unlocked,
            "no" | "false" => Self::Locked,
            _ => Self::Unknown,
        }
    }

    pub fn is_unlocked(self) -> bool {
        self == Self::Unlocked
    }
}

/// Chipset vendor family, decided by which token query answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SocFamily {
    Mediatek,
    Qualcomm,
    Unknown,
}

/// What the probe learned about the connected device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceFacts {
    pub lock_state: LockState,
    pub product: Option<String>,
    pub soc_family: SocFamily,
    pub hardware_token: Option<String>,
}

impl DeviceFacts {
    /// First 20 characters of the token, for display.
    pub fn masked_token(&self) -> Option<String> {
        self.hardware_token.as_deref().map(|token| {
            let head: String = token.chars().take(20).collect();
            format!("{head}...")
        })
    }
}

/// Result of a completed unlock run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    /// Serial number read before staging, when the device reported one.
    pub serial: Option<String>,
    /// Combined output of the final unlock command.
    pub output: String,
}
