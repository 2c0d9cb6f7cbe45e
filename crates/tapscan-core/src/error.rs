//! Scan failure taxonomy surfaced to the presentation layer.
//!
//! Every failure a scan can run into is converted into a [`ScanError`] before
//! it leaves the session. The kinds are a closed set; raw driver errors never
//! cross this boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of scan failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanErrorKind {
    /// User dismissed the prompt or the screen went away.
    ///
    /// Not a reportable error: presentation surfaces must not show a banner.
    UserCancelled,

    /// Hardware or driver missing, or the platform cannot probe it.
    Unsupported,

    /// Another scan session already holds the hardware.
    HardwareBusy,

    /// A technology negotiated but the tag yielded no usable payload.
    ReadFailed,

    /// Anything the classifier did not recognize.
    Unknown,
}

impl ScanErrorKind {
    /// Stable kebab-case name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanErrorKind::UserCancelled => "user-cancelled",
            ScanErrorKind::Unsupported => "unsupported",
            ScanErrorKind::HardwareBusy => "hardware-busy",
            ScanErrorKind::ReadFailed => "read-failed",
            ScanErrorKind::Unknown => "unknown",
        }
    }

    /// Whether errors of this kind are shown as an error banner.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, ScanErrorKind::UserCancelled)
    }

    /// Message used when the underlying signal carried none.
    pub(crate) fn default_message(&self) -> &'static str {
        match self {
            ScanErrorKind::UserCancelled => "scan cancelled",
            ScanErrorKind::Unsupported => "contactless reading is not supported on this device",
            ScanErrorKind::HardwareBusy => "a scan session is already active",
            ScanErrorKind::ReadFailed => "card could not be read",
            ScanErrorKind::Unknown => crate::classify::UNKNOWN_ERROR_MESSAGE,
        }
    }
}

impl fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified scan failure.
///
/// Transient: the presentation state clears it at the start of every scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ScanError {
    kind: ScanErrorKind,
    message: String,
}

impl ScanError {
    /// Create an error with an explicit message.
    pub fn new(kind: ScanErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create an error carrying the kind's default message.
    ///
    /// # Examples
    ///
    /// ```
    /// use tapscan_core::{ScanError, ScanErrorKind};
    ///
    /// let err = ScanError::of_kind(ScanErrorKind::HardwareBusy);
    /// assert_eq!(err.message(), "a scan session is already active");
    /// ```
    pub fn of_kind(kind: ScanErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }

    pub fn cancelled() -> Self {
        Self::of_kind(ScanErrorKind::UserCancelled)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ScanErrorKind::Unsupported, message)
    }

    pub fn busy() -> Self {
        Self::of_kind(ScanErrorKind::HardwareBusy)
    }

    pub fn read_failed(message: impl Into<String>) -> Self {
        Self::new(ScanErrorKind::ReadFailed, message)
    }

    pub fn kind(&self) -> ScanErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this error should reach an error banner.
    pub fn is_reportable(&self) -> bool {
        self.kind.is_reportable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(ScanErrorKind::UserCancelled.as_str(), "user-cancelled");
        assert_eq!(ScanErrorKind::HardwareBusy.as_str(), "hardware-busy");
        assert_eq!(ScanErrorKind::ReadFailed.to_string(), "read-failed");
    }

    #[test]
    fn test_only_cancellation_is_suppressed() {
        assert!(!ScanError::cancelled().is_reportable());
        assert!(ScanError::busy().is_reportable());
        assert!(ScanError::unsupported("no driver").is_reportable());
        assert!(ScanError::read_failed("empty").is_reportable());
        assert!(ScanError::of_kind(ScanErrorKind::Unknown).is_reportable());
    }

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = ScanError::read_failed("tag left the field");
        assert_eq!(err.to_string(), "read-failed: tag left the field");
    }

    #[test]
    fn test_serialization_uses_kebab_case() {
        let err = ScanError::busy();
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"hardware-busy\""));

        let back: ScanError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
