//! Unlock workflow state machine using rust-fsm.
//!
//! ```text
//! NeedAccount ──AccountReady──► NeedCredential ──CredentialReady──► NeedWebDeviceId
//!                                                                        │
//!                                                               WebDeviceIdReady
//!                                                                        ▼
//! AuthenticatedWaitingDeviceQuery ◄──LoginSucceeded── NeedAuthentication
//!          │
//!          │ DeviceFound
//!          ▼
//! DeviceKnownAwaitingConfirmation ──AlreadyUnlocked / Declined──► Terminal
//!          │
//!          │ Confirmed
//!          ▼
//!     Exchanging ──CredentialGranted──► Executing ──Finished──► Terminal
//! ```
//!
//! `Fail` moves any non-terminal state to `Terminal`.

use rust_fsm::*;
use serde::Serialize;

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub workflow_machine(NeedAccount)

    NeedAccount => {
        AccountReady => NeedCredential,
        Fail => Terminal
    },
    NeedCredential => {
        CredentialReady => NeedWebDeviceId,
        Fail => Terminal
    },
    NeedWebDeviceId => {
        WebDeviceIdReady => NeedAuthentication,
        Fail => Terminal
    },
    NeedAuthentication => {
        LoginSucceeded => AuthenticatedWaitingDeviceQuery,
        Fail => Terminal
    },
    AuthenticatedWaitingDeviceQuery => {
        DeviceFound => DeviceKnownAwaitingConfirmation,
        Fail => Terminal
    },
    DeviceKnownAwaitingConfirmation => {
        AlreadyUnlocked => Terminal,
        Declined => Terminal,
        Confirmed => Exchanging,
        Fail => Terminal
    },
    Exchanging => {
        CredentialGranted => Executing,
        Fail => Terminal
    },
    Executing => {
        Finished => Terminal,
        Fail => Terminal
    }
}

pub use workflow_machine::Input as WorkflowMachineInput;
pub use workflow_machine::State as WorkflowMachineState;
pub use workflow_machine::StateMachine as WorkflowMachine;

/// Workflow state as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    NeedAccount,
    NeedCredential,
    NeedWebDeviceId,
    NeedAuthentication,
    AuthenticatedWaitingDeviceQuery,
    DeviceKnownAwaitingConfirmation,
    Exchanging,
    Executing,
    Terminal,
}

impl WorkflowState {
    pub fn is_terminal(self) -> bool {
        self == Self::Terminal
    }
}

impl From<&WorkflowMachineState> for WorkflowState {
    fn from(state: &WorkflowMachineState) -> Self {
        match state {
            WorkflowMachineState::NeedAccount => Self::NeedAccount,
            WorkflowMachineState::NeedCredential => Self::NeedCredential,
            WorkflowMachineState::NeedWebDeviceId => Self::NeedWebDeviceId,
            WorkflowMachineState::NeedAuthentication => Self::NeedAuthentication,
            WorkflowMachineState::AuthenticatedWaitingDeviceQuery => {
                Self::AuthenticatedWaitingDeviceQuery
            }
            WorkflowMachineState::DeviceKnownAwaitingConfirmation => {
                Self::DeviceKnownAwaitingConfirmation
            }
            WorkflowMachineState::Exchanging => Self::Exchanging,
            WorkflowMachineState::Executing => Self::Executing,
            WorkflowMachineState::Terminal => Self::Terminal,
        }
    }
}
