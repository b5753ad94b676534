//! One unlock attempt, driven through the workflow state machine.
//!
//! The session record is loaded once, filled in place and saved after each
//! newly supplied field and after every successful login. Save failures are
//! logged and never end the run.

use crate::machine::{WorkflowMachine, WorkflowMachineInput, WorkflowState};
use crate::prompt::{is_affirmative, Prompter, MAX_PROMPT_ATTEMPTS};
use crate::{UnlockError, UnlockOutcome};
use account_auth::{extract_web_device_id, AccountAuthenticator, LoginRequest};
use chrono::{DateTime, Utc};
use fastboot_ops::{query_device, CommandRunner, FastbootError, UnlockExecutor};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use unlock_exchange::{retry_at, ClearPolicy, UnlockRequestResult, UnlockService};
use unlock_session_store::{SessionRecord, SessionStore};

/// Source of "now" for retry timestamps.
pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Callback invoked on every state change.
pub type StateCallback = Box<dyn Fn(WorkflowState) + Send + Sync>;

/// External collaborators of the workflow.
#[derive(Clone, Copy)]
pub struct WorkflowDeps<'a> {
    pub store: &'a dyn SessionStore,
    pub authenticator: &'a dyn AccountAuthenticator,
    pub unlock_service: &'a dyn UnlockService,
    pub runner: &'a dyn CommandRunner,
    pub prompter: &'a dyn Prompter,
}

pub struct UnlockSession<'a> {
    deps: WorkflowDeps<'a>,
    staging_dir: PathBuf,
    login_url: String,
    fsm: WorkflowMachine,
    clock: Clock,
    state_callback: Option<StateCallback>,
}

impl<'a> UnlockSession<'a> {
    pub fn new(
        deps: WorkflowDeps<'a>,
        staging_dir: impl Into<PathBuf>,
        login_url: impl Into<String>,
    ) -> Self {
        Self {
            deps,
            staging_dir: staging_dir.into(),
            login_url: login_url.into(),
            fsm: WorkflowMachine::new(),
            clock: Box::new(Utc::now),
            state_callback: None,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_state_callback(mut self, callback: StateCallback) -> Self {
        self.state_callback = Some(callback);
        self
    }

    pub fn state(&self) -> WorkflowState {
        WorkflowState::from(self.fsm.state())
    }

    /// Run the workflow to a terminal outcome.
    pub async fn run(mut self) -> UnlockOutcome {
        let outcome = match self.drive().await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(code = err.code(), error = %err, "Unlock workflow failed");
                if !self.state().is_terminal() {
                    if let Err(fail_err) = self.transition(&WorkflowMachineInput::Fail) {
                        warn!(error = %fail_err, "Could not move workflow to terminal state");
                    }
                }
                UnlockOutcome::Failure(err)
            }
        };
        info!(outcome = outcome.kind(), "Unlock workflow finished");
        outcome
    }

    async fn drive(&mut self) -> Result<UnlockOutcome, UnlockError> {
        let deps = self.deps;
        let mut record = deps.store.load();

        if record.account.trim().is_empty() {
            record.account = ask("account", || deps.prompter.account())?.trim().to_string();
            self.persist(&record);
        }
        self.transition(&WorkflowMachineInput::AccountReady)?;

        if record.credential.is_empty() {
            record.credential = ask("credential", || deps.prompter.credential())?;
            self.persist(&record);
        }
        self.transition(&WorkflowMachineInput::CredentialReady)?;

        if record.web_device_id.is_empty() {
            let pasted = deps.prompter.web_device_id(&self.login_url)?;
            let web_device_id =
                extract_web_device_id(&pasted).ok_or(UnlockError::WebIdentityUnavailable)?;
            record.web_device_id = web_device_id;
            self.persist(&record);
        }
        self.transition(&WorkflowMachineInput::WebDeviceIdReady)?;

        let session = deps
            .authenticator
            .authenticate(LoginRequest {
                account: &record.account,
                credential: &record.credential,
                web_device_id: &record.web_device_id,
            })
            .await?;
        record.confirm_login(session.remote_user_id.clone());
        self.persist(&record);
        self.transition(&WorkflowMachineInput::LoginSucceeded)?;

        let facts = query_device(deps.runner)
            .await
            .ok_or(UnlockError::DeviceUnreachable)?;
        self.transition(&WorkflowMachineInput::DeviceFound)?;

        if facts.lock_state.is_unlocked() {
            info!("Device bootloader is already unlocked");
            self.transition(&WorkflowMachineInput::AlreadyUnlocked)?;
            return Ok(UnlockOutcome::AlreadyUnlocked);
        }

        let policy = match facts.product.as_deref() {
            Some(product) => deps.unlock_service.check_clear_policy(product).await,
            None => ClearPolicy::Unknown,
        };
        let answer = deps.prompter.confirm_unlock(&facts, policy)?;
        if !is_affirmative(&answer) {
            info!("Unlock declined at confirmation");
            self.transition(&WorkflowMachineInput::Declined)?;
            return Ok(UnlockOutcome::Cancelled);
        }
        self.transition(&WorkflowMachineInput::Confirmed)?;

        let credential_hex = match deps
            .unlock_service
            .request_unlock_credential(&facts, &session)
            .await?
        {
            UnlockRequestResult::Granted { credential_hex } => credential_hex,
            UnlockRequestResult::Denied { code, message } => {
                self.transition(&WorkflowMachineInput::Fail)?;
                return Ok(UnlockOutcome::DeniedWithMessage { code, message });
            }
            UnlockRequestResult::RateLimited { code, wait_hours } => {
                let retry_after = retry_at((self.clock)(), wait_hours);
                self.transition(&WorkflowMachineInput::Fail)?;
                return Ok(UnlockOutcome::RateLimited { code, retry_after });
            }
            UnlockRequestResult::Malformed { raw } => {
                return Err(UnlockError::ExchangeMalformed { raw });
            }
        };
        self.transition(&WorkflowMachineInput::CredentialGranted)?;

        let executor = UnlockExecutor::new(deps.runner, self.staging_dir.clone());
        match executor.execute(&credential_hex).await {
            Ok(report) => {
                self.transition(&WorkflowMachineInput::Finished)?;
                Ok(UnlockOutcome::Success {
                    serial: report.serial,
                    output: report.output,
                })
            }
            Err(err) if err.is_transport() => {
                self.transition(&WorkflowMachineInput::Fail)?;
                Ok(UnlockOutcome::TransportFailure {
                    cause: transport_cause(err),
                })
            }
            Err(err) => Err(UnlockError::Execution(err)),
        }
    }

    /// Transition the FSM and notify the callback if the state changed.
    fn transition(&mut self, input: &WorkflowMachineInput) -> Result<WorkflowState, UnlockError> {
        let old_state = self.state();

        self.fsm.consume(input).map_err(|_| {
            UnlockError::InvalidTransition(format!("cannot apply {input:?} in state {old_state:?}"))
        })?;

        let new_state = self.state();
        if old_state != new_state {
            debug!(old_state = ?old_state, new_state = ?new_state, "Workflow state transition");
            if let Some(callback) = &self.state_callback {
                callback(new_state);
            }
        }

        Ok(new_state)
    }

    fn persist(&self, record: &SessionRecord) {
        if let Err(err) = self.deps.store.save(record) {
            warn!(code = err.code(), error = %err, "Failed to save session record");
        }
    }
}

/// Ask until a non-blank answer arrives or the attempts run out.
fn ask(field: &'static str, prompt: impl Fn() -> io::Result<String>) -> Result<String, UnlockError> {
    for attempt in 1..=MAX_PROMPT_ATTEMPTS {
        let answer = prompt()?;
        if !answer.trim().is_empty() {
            return Ok(answer);
        }
        debug!(field, attempt, "Empty answer");
    }
    Err(UnlockError::Input {
        field,
        attempts: MAX_PROMPT_ATTEMPTS,
    })
}

fn transport_cause(err: FastbootError) -> String {
    match err {
        FastbootError::StageRejected { output } | FastbootError::UnlockRejected { output, .. } => {
            output
        }
        other => other.to_string(),
    }
}
