//! Stored session inspection and removal.

use super::AppContext;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use serde_json::json;
use std::process::ExitCode;
use unlock_session_store::SessionStore;

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

/// Print the stored session record with the credential masked.
pub fn status(ctx: &AppContext, format: &OutputFormat) -> Result<ExitCode> {
    let store = ctx.session_store();
    let record = store.load();

    match format {
        OutputFormat::Text => {
            output::print_heading("Session");
            output::print_row("File", &store.path().display().to_string());
            output::print_row("Account", or_unset(&record.account));
            output::print_row("Password", or_unset(&record.masked_credential()));
            output::print_row("Web device id", or_unset(&record.web_device_id));
            output::print_row(
                "Logged in",
                if record.login_confirmed { "yes" } else { "no" },
            );
            output::print_row("User id", or_unset(&record.remote_user_id));
        }
        OutputFormat::Json => output::print_json(&json!({
            "file": store.path().display().to_string(),
            "account": record.account,
            "credential_stored": !record.credential.is_empty(),
            "web_device_id": record.web_device_id,
            "login_confirmed": record.login_confirmed,
            "remote_user_id": record.remote_user_id,
        })),
    }
    Ok(ExitCode::SUCCESS)
}

/// Delete the stored session record.
pub fn forget(ctx: &AppContext, format: &OutputFormat) -> Result<ExitCode> {
    let store = ctx.session_store();
    if store.clear()? {
        output::print_success("Stored session removed", format);
    } else {
        output::print_success("No stored session", format);
    }
    Ok(ExitCode::SUCCESS)
}
