//! The full unlock workflow.

use super::AppContext;
use crate::console::ConsolePrompter;
use crate::output::{self, OutputFormat};
use account_auth::{web_login_url, HttpAccountAuthenticator};
use anyhow::Result;
use chrono::Local;
use serde_json::{json, Value};
use std::process::ExitCode;
use tracing::info;
use unlock_exchange::HttpUnlockService;
use unlock_orchestrator::{UnlockOutcome, UnlockSession, WorkflowDeps, WorkflowState};

const ERROR_CODES_URL: &str = "https://offici5l.github.io/articles/mi-error-codes";

/// Run the workflow from the first missing session field to an outcome.
pub async fn unlock(ctx: &AppContext, format: &OutputFormat) -> Result<ExitCode> {
    ctx.ensure_dirs()?;

    let account_url = ctx.config.account_url()?;
    let store = ctx.session_store();
    let authenticator = HttpAccountAuthenticator::new(account_url.clone());
    let unlock_service = HttpUnlockService::new(ctx.config.unlock_api_url()?);
    let runner = ctx.fastboot_runner();
    let prompter = ConsolePrompter;

    info!(fastboot = %runner.executable(), "Starting unlock workflow");

    let deps = WorkflowDeps {
        store: &store,
        authenticator: &authenticator,
        unlock_service: &unlock_service,
        runner: &runner,
        prompter: &prompter,
    };
    let mut session = UnlockSession::new(deps, ctx.paths.staging_dir(), web_login_url(&account_url));
    if *format == OutputFormat::Text {
        session = session.with_state_callback(Box::new(announce));
    }

    let outcome = session.run().await;
    report(&outcome, format);

    Ok(if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn announce(state: WorkflowState) {
    let message = match state {
        WorkflowState::NeedAuthentication => "Logging in...",
        WorkflowState::AuthenticatedWaitingDeviceQuery => "Looking for a device in bootloader mode...",
        WorkflowState::Exchanging => "Requesting unlock permission...",
        WorkflowState::Executing => "Unlocking...",
        _ => return,
    };
    eprintln!("{}", message);
}

fn report(outcome: &UnlockOutcome, format: &OutputFormat) {
    match format {
        OutputFormat::Json => {
            let value = outcome_json(outcome);
            if outcome.is_ok() {
                output::print_json(&value);
            } else {
                eprintln!("{}", value);
            }
        }
        OutputFormat::Text => match outcome {
            UnlockOutcome::Success { serial, output } => {
                output::print_success("Bootloader unlocked.", format);
                if let Some(serial) = serial {
                    output::print_row("Serial", serial);
                }
                output::print_row("Output", output.trim());
            }
            UnlockOutcome::AlreadyUnlocked => {
                output::print_success("Bootloader is already unlocked.", format)
            }
            UnlockOutcome::Cancelled => output::print_success("Unlock cancelled.", format),
            UnlockOutcome::DeniedWithMessage { code, message } => {
                output::print_error(&format!("Unlock denied (code {}): {}", code, message), format);
                eprintln!("Error code reference: {}", ERROR_CODES_URL);
            }
            UnlockOutcome::RateLimited { code, retry_after } => output::print_error(
                &format!(
                    "Unlock not allowed yet (code {}). Try again after {}.",
                    code,
                    retry_after.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                ),
                format,
            ),
            UnlockOutcome::TransportFailure { cause } => {
                output::print_error(&format!("Device command failed: {}", cause.trim()), format)
            }
            UnlockOutcome::Failure(err) => output::print_error(&err.to_string(), format),
        },
    }
}

fn outcome_json(outcome: &UnlockOutcome) -> Value {
    let status = outcome.kind();
    match outcome {
        UnlockOutcome::Success { serial, output } => {
            json!({"status": status, "serial": serial, "output": output})
        }
        UnlockOutcome::AlreadyUnlocked | UnlockOutcome::Cancelled => json!({"status": status}),
        UnlockOutcome::DeniedWithMessage { code, message } => {
            json!({"status": status, "code": code, "message": message})
        }
        UnlockOutcome::RateLimited { code, retry_after } => {
            json!({"status": status, "code": code, "retry_after": retry_after.to_rfc3339()})
        }
        UnlockOutcome::TransportFailure { cause } => json!({"status": status, "cause": cause}),
        UnlockOutcome::Failure(err) => {
            json!({"status": status, "code": err.code(), "message": err.to_string()})
        }
    }
}
