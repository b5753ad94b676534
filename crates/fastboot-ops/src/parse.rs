//! Line-oriented extraction of values from device-control output.

/// Value reported when the tool answered but no variable could be read.
pub const DETECTED_SENTINEL: &str = "detected";

const MIN_TOKEN_LINE_LEN: usize = 10;

/// Extract the value of `key` from raw command output.
///
/// Lines are scanned in order. A line carrying `<key>:` ends the scan with
/// the trimmed text after the marker, or `None` when that text is empty.
/// Failing that, a line mentioning `token` that is
/// longer than ten characters is returned whole as raw token data. When
/// nothing matches but the output shows the tool was reached, the
/// [`DETECTED_SENTINEL`] stands in for a value.
pub fn parse_variable(key: &str, output: &str) -> Option<String> {
    let marker = format!("{key}:");

    for line in output.lines() {
        if let Some(idx) = line.find(&marker) {
            let value = line[idx + marker.len()..].trim();
            if value.is_empty() {
                return None;
            }
            return Some(value.to_string());
        }

        if line.contains("token") && line.len() > MIN_TOKEN_LINE_LEN {
            return Some(line.trim().to_string());
        }
    }

    if output.contains("fastboot") || output.contains("waiting") {
        return Some(DETECTED_SENTINEL.to_string());
    }

    None
}
