//! Failure classification.
//!
//! [`classify`] turns any [`FailureSignal`] into a [`ScanError`]. It is pure
//! and total: every input, including an empty signal, yields a value.
//!
//! Rules are evaluated in order and the first match wins. Each rule accepts
//! either a structured [`FailureCode`] from the hardware layer or, as a
//! fallback for drivers that only report text, a case-insensitive substring
//! of the message.
//!
//! | Order | Kind | Code | Message fragments |
//! |-------|------|------|-------------------|
//! | 1 | `user-cancelled` | `Cancelled` | cancelled, canceled, user cancel, usercancel |
//! | 2 | `unsupported` | `Unsupported` | unsupported, not supported, not available, not present |
//! | 3 | `hardware-busy` | `Busy` | busy, already active, already in progress, duplicate registration |
//! | 4 | `read-failed` | `NoPayload`, `Timeout` | no tag, tag lost, tag was lost, could not be read, read failed, timed out, timeout |
//! | 5 | `unknown` | - | - |

use crate::error::{ScanError, ScanErrorKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Placeholder message for unclassified signals that carry no text.
pub const UNKNOWN_ERROR_MESSAGE: &str = "unknown error";

const CANCEL_FRAGMENTS: &[&str] = &["cancelled", "canceled", "user cancel", "usercancel"];

const UNSUPPORTED_FRAGMENTS: &[&str] = &[
    "unsupported",
    "not supported",
    "not available",
    "not present",
];

const BUSY_FRAGMENTS: &[&str] = &[
    "busy",
    "already active",
    "already in progress",
    "duplicate registration",
];

const READ_FAILED_FRAGMENTS: &[&str] = &[
    "no tag",
    "tag lost",
    "tag was lost",
    "could not be read",
    "read failed",
    "timed out",
    "timeout",
];

/// Structured failure code reported by the hardware layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FailureCode {
    /// The wait for a tag was cancelled by the user or the host.
    Cancelled,

    /// Driver or hardware absent, or the platform cannot use it.
    Unsupported,

    /// The hardware is already claimed by another session.
    Busy,

    /// A technology negotiated but no payload could be read.
    NoPayload,

    /// No tag was presented within the allowed window.
    Timeout,
}

/// Raw failure as it arrives from below the session boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureSignal {
    /// Structured code, when the driver provides one.
    pub code: Option<FailureCode>,

    /// Diagnostic text, when the driver provides one.
    pub message: Option<String>,
}

impl FailureSignal {
    /// Signal with a structured code and no message.
    pub fn from_code(code: FailureCode) -> Self {
        Self {
            code: Some(code),
            message: None,
        }
    }

    /// Signal carrying only a message.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: Some(message.into()),
        }
    }

    /// Attach a message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn message_contains_any(&self, fragments: &[&str]) -> bool {
        let Some(message) = self.message.as_deref() else {
            return false;
        };
        let lowered = message.to_lowercase();
        fragments.iter().any(|fragment| lowered.contains(fragment))
    }

    fn has_code(&self, codes: &[FailureCode]) -> bool {
        self.code.is_some_and(|code| codes.contains(&code))
    }

    fn usable_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|message| !message.trim().is_empty())
    }
}

impl From<&str> for FailureSignal {
    fn from(message: &str) -> Self {
        Self::from_message(message)
    }
}

impl From<FailureCode> for FailureSignal {
    fn from(code: FailureCode) -> Self {
        Self::from_code(code)
    }
}

/// Map a failure signal into the scan error taxonomy.
///
/// # Examples
///
/// ```
/// use tapscan_core::{FailureSignal, ScanErrorKind, classify};
///
/// let err = classify(&FailureSignal::from_message("UserCancel requested"));
/// assert_eq!(err.kind(), ScanErrorKind::UserCancelled);
///
/// let err = classify(&FailureSignal::from_message("no tag technology matched"));
/// assert_eq!(err.kind(), ScanErrorKind::ReadFailed);
///
/// let err = classify(&FailureSignal::default());
/// assert_eq!(err.kind(), ScanErrorKind::Unknown);
/// assert_eq!(err.message(), "unknown error");
/// ```
pub fn classify(signal: &FailureSignal) -> ScanError {
    let kind = classify_kind(signal);

    let error = match signal.usable_message() {
        Some(message) => ScanError::new(kind, message),
        None => ScanError::of_kind(kind),
    };

    debug!(
        code = ?signal.code,
        kind = %error.kind(),
        "Classified scan failure"
    );

    error
}

fn classify_kind(signal: &FailureSignal) -> ScanErrorKind {
    if signal.has_code(&[FailureCode::Cancelled]) || signal.message_contains_any(CANCEL_FRAGMENTS)
    {
        ScanErrorKind::UserCancelled
    } else if signal.has_code(&[FailureCode::Unsupported])
        || signal.message_contains_any(UNSUPPORTED_FRAGMENTS)
    {
        ScanErrorKind::Unsupported
    } else if signal.has_code(&[FailureCode::Busy]) || signal.message_contains_any(BUSY_FRAGMENTS)
    {
        ScanErrorKind::HardwareBusy
    } else if signal.has_code(&[FailureCode::NoPayload, FailureCode::Timeout])
        || signal.message_contains_any(READ_FAILED_FRAGMENTS)
    {
        ScanErrorKind::ReadFailed
    } else {
        ScanErrorKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("UserCancel requested", ScanErrorKind::UserCancelled)]
    #[case("Session cancelled by user", ScanErrorKind::UserCancelled)]
    #[case("Request CANCELED", ScanErrorKind::UserCancelled)]
    #[case("user cancel", ScanErrorKind::UserCancelled)]
    #[case("NFC is not supported on this device", ScanErrorKind::Unsupported)]
    #[case("NfcManager not available", ScanErrorKind::Unsupported)]
    #[case("reader busy", ScanErrorKind::HardwareBusy)]
    #[case("a session is already active", ScanErrorKind::HardwareBusy)]
    #[case("no tag technology matched", ScanErrorKind::ReadFailed)]
    #[case("Tag was lost", ScanErrorKind::ReadFailed)]
    #[case("Session timeout", ScanErrorKind::ReadFailed)]
    #[case("something exploded", ScanErrorKind::Unknown)]
    fn test_message_fallback(#[case] message: &str, #[case] expected: ScanErrorKind) {
        let err = classify(&FailureSignal::from_message(message));
        assert_eq!(err.kind(), expected);
        assert_eq!(err.message(), message);
    }

    #[rstest]
    #[case(FailureCode::Cancelled, ScanErrorKind::UserCancelled)]
    #[case(FailureCode::Unsupported, ScanErrorKind::Unsupported)]
    #[case(FailureCode::Busy, ScanErrorKind::HardwareBusy)]
    #[case(FailureCode::NoPayload, ScanErrorKind::ReadFailed)]
    #[case(FailureCode::Timeout, ScanErrorKind::ReadFailed)]
    fn test_structured_codes(#[case] code: FailureCode, #[case] expected: ScanErrorKind) {
        let err = classify(&FailureSignal::from_code(code));
        assert_eq!(err.kind(), expected);
        assert!(!err.message().is_empty());
    }

    #[test]
    fn test_cancellation_wins_over_later_rules() {
        let signal = FailureSignal::from_code(FailureCode::Busy).with_message("user cancelled");
        assert_eq!(classify(&signal).kind(), ScanErrorKind::UserCancelled);
    }

    #[test]
    fn test_empty_signal_uses_placeholder() {
        let err = classify(&FailureSignal::default());
        assert_eq!(err.kind(), ScanErrorKind::Unknown);
        assert_eq!(err.message(), UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn test_blank_message_uses_placeholder() {
        let err = classify(&FailureSignal::from_message("   "));
        assert_eq!(err.kind(), ScanErrorKind::Unknown);
        assert_eq!(err.message(), UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn test_unknown_message_preserved_verbatim() {
        let err = classify(&FailureSignal::from_message("  Bridge exploded: 0x6A82 "));
        assert_eq!(err.kind(), ScanErrorKind::Unknown);
        assert_eq!(err.message(), "  Bridge exploded: 0x6A82 ");
    }

    proptest! {
        #[test]
        fn prop_classify_is_total(message in proptest::option::of(".{0,64}")) {
            let signal = FailureSignal { code: None, message };
            let err = classify(&signal);
            prop_assert!(!err.message().is_empty());
        }

        #[test]
        fn prop_cancel_fragment_always_cancels(prefix in "[a-z ]{0,16}", suffix in "[a-z ]{0,16}") {
            let signal = FailureSignal::from_message(format!("{prefix}Cancelled{suffix}"));
            prop_assert_eq!(classify(&signal).kind(), ScanErrorKind::UserCancelled);
        }
    }
}
