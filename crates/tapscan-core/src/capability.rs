//! Contactless readiness as seen by the presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether this device/build can run a scan.
///
/// `Unknown` is the only valid initial value. Once the probe resolves, the
/// capability moves to `Unsupported` or `Ready` and stays there for the
/// lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanCapability {
    /// Probe has not resolved yet.
    #[default]
    Unknown,

    /// Driver absent, hardware missing, or initialization failed.
    Unsupported,

    /// Hardware manager is initialized and scans may start.
    Ready,
}

impl ScanCapability {
    /// Check if moving to `target` is allowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use tapscan_core::ScanCapability;
    ///
    /// assert!(ScanCapability::Unknown.can_transition_to(ScanCapability::Ready));
    /// assert!(!ScanCapability::Ready.can_transition_to(ScanCapability::Unsupported));
    /// assert!(!ScanCapability::Ready.can_transition_to(ScanCapability::Unknown));
    /// ```
    pub fn can_transition_to(self, target: ScanCapability) -> bool {
        matches!(
            (self, target),
            (
                ScanCapability::Unknown,
                ScanCapability::Unsupported | ScanCapability::Ready
            )
        )
    }

    pub fn is_ready(self) -> bool {
        matches!(self, ScanCapability::Ready)
    }
}

impl fmt::Display for ScanCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanCapability::Unknown => "unknown",
            ScanCapability::Unsupported => "unsupported",
            ScanCapability::Ready => "ready",
        };
        write!(f, "{}", name)
    }
}
