//! Scan session state machine.
//!
//! Each scan attempt owns one [`SessionStateMachine`]. It replaces an
//! ambient "is scanning" flag with explicit phases, so release logic can be
//! attached to every way out of a non-idle state.
//!
//! # States
//!
//! - `Idle`: session created, hardware untouched
//! - `Claiming`: claiming the hardware and declaring technologies
//! - `Negotiating`: awaiting tag presentation and technology handshake
//! - `Reading`: reading the negotiated tag surface
//! - `Releasing`: releasing the hardware claim
//! - `Settled`: outcome decided, hardware released
//!
//! # Valid Transitions
//!
//! - Idle → Claiming → Negotiating → Reading → Releasing → Settled
//! - Claiming → Releasing
//! - Negotiating → Releasing
//!
//! Every path out of `Claiming`, `Negotiating` or `Reading` goes through
//! `Releasing`.
//!
//! # Examples
//!
//! ```
//! use tapscan_session::{SessionState, SessionStateMachine};
//!
//! let mut machine = SessionStateMachine::new();
//! machine.transition_to(SessionState::Claiming).unwrap();
//! machine.transition_to(SessionState::Releasing).unwrap();
//! machine.transition_to(SessionState::Settled).unwrap();
//!
//! assert!(machine.current_state().is_terminal());
//! assert!(machine.transition_to(SessionState::Claiming).is_err());
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};

/// Maximum number of state transitions to keep in history.
///
/// A full session has five transitions, so this comfortably covers one
/// session with room for future phases.
const MAX_HISTORY_SIZE: usize = 16;

/// Phases of one scan attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Session created, hardware untouched.
    #[default]
    Idle,

    /// Claiming the hardware and declaring acceptable technologies.
    Claiming,

    /// Awaiting tag presentation; the prompt is showing.
    Negotiating,

    /// Reading the negotiated tag surface.
    Reading,

    /// Releasing the hardware claim.
    Releasing,

    /// Outcome decided and hardware released.
    Settled,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            SessionState::Idle => "Idle",
            SessionState::Claiming => "Claiming",
            SessionState::Negotiating => "Negotiating",
            SessionState::Reading => "Reading",
            SessionState::Releasing => "Releasing",
            SessionState::Settled => "Settled",
        };
        write!(f, "{}", state_str)
    }
}

impl SessionState {
    /// Check if transition to target state is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use tapscan_session::SessionState;
    ///
    /// assert!(SessionState::Negotiating.can_transition_to(&SessionState::Releasing));
    /// assert!(!SessionState::Negotiating.can_transition_to(&SessionState::Settled));
    /// ```
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        matches!(
            (self, target),
            // From Idle
            (SessionState::Idle, SessionState::Claiming)
            // From Claiming
            | (SessionState::Claiming, SessionState::Negotiating | SessionState::Releasing)
            // From Negotiating
            | (SessionState::Negotiating, SessionState::Reading | SessionState::Releasing)
            // From Reading
            | (SessionState::Reading, SessionState::Releasing)
            // From Releasing
            | (SessionState::Releasing, SessionState::Settled)
        )
    }

    /// True once the session has settled.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Settled)
    }
}

/// Represents a single state transition with timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: SessionState,

    /// The state transitioned to.
    pub to: SessionState,

    /// When the transition occurred.
    ///
    /// Not serialized; set to the deserialization time on the way back in.
    #[serde(skip, default = "Instant::now")]
    pub timestamp: Instant,
}

impl StateTransition {
    pub fn new(from: SessionState, to: SessionState) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }
}

/// State machine for one scan session.
///
/// Not shared: it is owned by exactly one session.
#[derive(Debug)]
pub struct SessionStateMachine {
    current_state: SessionState,
    state_entered_at: Instant,
    history: VecDeque<StateTransition>,
}

impl SessionStateMachine {
    /// Create a new state machine in the Idle state.
    pub fn new() -> Self {
        Self {
            current_state: SessionState::Idle,
            state_entered_at: Instant::now(),
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn current_state(&self) -> &SessionState {
        &self.current_state
    }

    pub fn time_in_current_state(&self) -> Duration {
        self.state_entered_at.elapsed()
    }

    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// States visited so far, starting from `Idle`.
    pub fn visited(&self) -> Vec<SessionState> {
        std::iter::once(SessionState::Idle)
            .chain(self.history.iter().map(|t| t.to))
            .collect()
    }

    /// Attempt to transition to a new state.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidStateTransition`] if the transition is
    /// not allowed; the current state is left unchanged.
    pub fn transition_to(&mut self, new_state: SessionState) -> Result<StateTransition> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(SessionError::InvalidStateTransition {
                from: self.current_state,
                to: new_state,
            });
        }

        let transition = StateTransition::new(self.current_state, new_state);

        self.current_state = new_state;
        self.state_entered_at = Instant::now();
        self.history.push_back(transition.clone());
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }

        Ok(transition)
    }
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
