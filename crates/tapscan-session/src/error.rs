use thiserror::Error;

use crate::state_machine::SessionState;

/// Errors internal to the session layer.
///
/// These never reach the presentation layer; scan outcomes are always
/// reported as [`ScanError`](tapscan_core::ScanError).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: SessionState, to: SessionState },
}

pub type Result<T> = std::result::Result<T, SessionError>;
