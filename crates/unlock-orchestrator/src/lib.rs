//! # unlock-orchestrator
//!
//! Drives one unlock attempt from the first missing session field to a
//! terminal [`UnlockOutcome`]. Collaborators are injected as trait objects
//! so the same workflow runs behind a console, a script or a test harness.

mod machine;
mod outcome;
mod prompt;
mod session;

pub use machine::{WorkflowMachine, WorkflowMachineInput, WorkflowMachineState, WorkflowState};
pub use outcome::{UnlockError, UnlockOutcome};
pub use prompt::{is_affirmative, Prompter, MAX_PROMPT_ATTEMPTS};
pub use session::{Clock, StateCallback, UnlockSession, WorkflowDeps};
