//! Output formatting for the CLI.

use clap::ValueEnum;
use fastboot_ops::DeviceFacts;
use serde_json::{json, Value};

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a JSON document on stdout.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(_) => println!("{}", value),
    }
}

/// Print a success message.
pub fn print_success(message: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", message),
        OutputFormat::Json => print_json(&json!({"status": "success", "message": message})),
    }
}

/// Print an error message.
pub fn print_error(message: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("Error: {}", message),
        OutputFormat::Json => {
            eprintln!("{}", json!({"status": "error", "message": message}));
        }
    }
}

/// Print a table row.
pub fn print_row(label: &str, value: &str) {
    println!("  {:<16} {}", format!("{}:", label), value);
}

/// Print a divider line.
pub fn print_divider() {
    println!("{}", "-".repeat(50));
}

/// Print a heading.
pub fn print_heading(text: &str) {
    println!("\n{}", text);
    print_divider();
}

/// Display rows for a probed device. The token is always masked.
pub fn device_rows(facts: &DeviceFacts) -> Vec<(&'static str, String)> {
    vec![
        ("Lock state", format!("{:?}", facts.lock_state).to_lowercase()),
        (
            "Product",
            facts.product.clone().unwrap_or_else(|| "unknown".to_string()),
        ),
        ("SoC", format!("{:?}", facts.soc_family).to_lowercase()),
        (
            "Token",
            facts.masked_token().unwrap_or_else(|| "none".to_string()),
        ),
    ]
}

/// JSON view of a probed device, with the token masked.
pub fn device_json(facts: &DeviceFacts) -> Value {
    json!({
        "lock_state": facts.lock_state,
        "product": facts.product,
        "soc_family": facts.soc_family,
        "token": facts.masked_token(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastboot_ops::{LockState, SocFamily};

    fn facts() -> DeviceFacts {
        DeviceFacts {
            lock_state: LockState::Locked,
            product: Some("raphael".to_string()),
            soc_family: SocFamily::Mediatek,
            hardware_token: Some("0123456789ABCDEFGHIJKLMNOP".to_string()),
        }
    }

    #[test]
    fn device_rows_mask_token() {
        let rows = device_rows(&facts());
        assert_eq!(rows[0], ("Lock state", "locked".to_string()));
        assert_eq!(rows[2], ("SoC", "mediatek".to_string()));
        assert_eq!(rows[3].1, "0123456789ABCDEFGHIJ...");
    }

    #[test]
    fn device_json_never_contains_full_token() {
        let value = device_json(&facts());
        assert_eq!(value["lock_state"], "locked");
        assert_eq!(value["soc_family"], "mediatek");
        assert!(!value.to_string().contains("KLMNOP"));
    }
}
