//! Browser identity flow: the login page a user visits and the id pasted
//! back from its redirect.

use url::Url;

/// Raw input shorter than this is not accepted as a bare id.
const MIN_RAW_ID_LEN: usize = 10;

/// Page the user logs in on to obtain a web device id.
pub fn web_login_url(account_url: &Url) -> String {
    format!(
        "{}/pass/serviceLogin?sid=unlockApi&checkSafeAddress=true&passive=false&hidden=false",
        account_url.as_str().trim_end_matches('/')
    )
}

/// Pull the web device id out of a pasted redirect URL or bare value.
pub fn extract_web_device_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.contains("d=") {
        let from_query = Url::parse(input).ok().and_then(|url| {
            url.query_pairs()
                .find(|(key, value)| key == "d" && !value.is_empty())
                .map(|(_, value)| value.into_owned())
        });
        if from_query.is_some() {
            return from_query;
        }

        if let Some(value) = raw_d_value(input) {
            return Some(value);
        }
    }

    if input.len() > MIN_RAW_ID_LEN && !input.contains(' ') {
        return Some(input.to_string());
    }

    None
}

/// First `d=` value, read up to `&` or whitespace.
fn raw_d_value(input: &str) -> Option<String> {
    input.match_indices("d=").find_map(|(idx, marker)| {
        let rest = &input[idx + marker.len()..];
        let end = rest
            .find(|c: char| c == '&' || c.is_whitespace())
            .unwrap_or(rest.len());
        (end > 0).then(|| rest[..end].to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_url_uses_account_host() {
        let base = Url::parse("https://account.xiaomi.com").unwrap();
        assert_eq!(
            web_login_url(&base),
            "https://account.xiaomi.com/pass/serviceLogin?sid=unlockApi&checkSafeAddress=true&passive=false&hidden=false"
        );
    }

    #[test]
    fn takes_d_query_parameter() {
        let pasted = "https://account.xiaomi.com/sts?sign=abc&d=wb_1a2b3c4d5e&followup=x";
        assert_eq!(
            extract_web_device_id(pasted).as_deref(),
            Some("wb_1a2b3c4d5e")
        );
    }

    #[test]
    fn decodes_percent_encoded_value() {
        let pasted = "https://example.com/cb?d=wb%3Aabc123";
        assert_eq!(extract_web_device_id(pasted).as_deref(), Some("wb:abc123"));
    }

    #[test]
    fn falls_back_to_raw_d_value() {
        assert_eq!(
            extract_web_device_id("sts d=wb_0011223344&next=1").as_deref(),
            Some("wb_0011223344")
        );
    }

    #[test]
    fn accepts_long_bare_value() {
        assert_eq!(
            extract_web_device_id("  wb_abcdef123456  ").as_deref(),
            Some("wb_abcdef123456")
        );
    }

    #[test]
    fn rejects_short_or_spaced_values() {
        assert_eq!(extract_web_device_id(""), None);
        assert_eq!(extract_web_device_id("short"), None);
        assert_eq!(extract_web_device_id("has a space in it"), None);
    }
}
