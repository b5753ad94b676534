use crate::UnlockRequestResult;
use serde::Deserialize;

/// Response code the service uses for "come back later".
pub const RATE_LIMITED_CODE: i64 = 20036;

#[derive(Debug, Deserialize)]
struct UnlockResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(rename = "descEN", default)]
    desc_en: Option<String>,
    #[serde(rename = "encryptData", default)]
    encrypt_data: Option<String>,
    #[serde(default)]
    data: serde_json::Value,
}

/// `data.waitHour` as whole hours; absent, fractional or non-numeric reads as 0.
fn wait_hour(data: &serde_json::Value) -> i64 {
    let Some(value) = data.get("waitHour") else {
        return 0;
    };
    if let Some(hours) = value.as_i64() {
        return hours;
    }
    match value.as_f64() {
        Some(hours) if hours.fract() == 0.0 && hours.is_finite() => hours as i64,
        _ => 0,
    }
}

/// Classify a raw credential-exchange body.
///
/// Rules, first match wins:
/// - code 0 with a non-empty `encryptData` is `Granted`
/// - code [`RATE_LIMITED_CODE`] with a positive `waitHour` is `RateLimited`
/// - a non-empty `descEN` is `Denied`
/// - anything else, including bodies that are not JSON objects, is `Malformed`
pub fn classify_unlock_response(raw: &str) -> UnlockRequestResult {
    let malformed = || UnlockRequestResult::Malformed {
        raw: raw.to_string(),
    };

    let Ok(response) = serde_json::from_str::<UnlockResponse>(raw) else {
        return malformed();
    };
    let Some(code) = response.code else {
        return malformed();
    };

    let encrypt_data = response.encrypt_data.unwrap_or_default();
    if code == 0 && !encrypt_data.is_empty() {
        return UnlockRequestResult::Granted {
            credential_hex: encrypt_data,
        };
    }

    let wait_hours = wait_hour(&response.data);
    if code == RATE_LIMITED_CODE && wait_hours > 0 {
        return UnlockRequestResult::RateLimited {
            code,
            wait_hours: u32::try_from(wait_hours).unwrap_or(u32::MAX),
        };
    }

    let desc_en = response.desc_en.unwrap_or_default();
    if !desc_en.is_empty() {
        return UnlockRequestResult::Denied {
            code,
            message: desc_en,
        };
    }

    malformed()
}
