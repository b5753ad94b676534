//! Probe-only command.

use super::AppContext;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use fastboot_ops::query_device;
use serde_json::json;
use std::process::ExitCode;

/// Query the connected device and print what it reports.
pub async fn device(ctx: &AppContext, format: &OutputFormat) -> Result<ExitCode> {
    let runner = ctx.fastboot_runner();

    let Some(facts) = query_device(&runner).await else {
        output::print_error(
            &format!(
                "No device detected via {}. Boot the phone into bootloader mode and connect it.",
                runner.executable()
            ),
            format,
        );
        return Ok(ExitCode::FAILURE);
    };

    match format {
        OutputFormat::Text => {
            output::print_heading("Device");
            for (label, value) in output::device_rows(&facts) {
                output::print_row(label, &value);
            }
        }
        OutputFormat::Json => {
            output::print_json(&json!({"status": "success", "device": output::device_json(&facts)}))
        }
    }
    Ok(ExitCode::SUCCESS)
}
