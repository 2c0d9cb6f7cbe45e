//! Error types for contactless driver operations.
//!
//! This module defines errors a driver can report while probing, claiming,
//! negotiating, reading, or releasing the contactless hardware. They never
//! leave the session boundary as-is: [`HardwareError::failure_signal`] turns
//! them into the structured input of the scan error classifier.

use tapscan_core::{FailureCode, FailureSignal};

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during contactless driver operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The native driver module is not part of this build.
    #[error("Contactless driver not available")]
    DriverMissing,

    /// Operation or hardware is not supported by this device.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    /// Hardware is already claimed by another session.
    #[error("Reader busy: {message}")]
    Busy { message: String },

    /// Tag request was cancelled by the user or the host.
    #[error("Request cancelled: {reason}")]
    Cancelled { reason: String },

    /// No tag was presented within the wait window.
    #[error("Operation timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// A tag was presented but none of the requested technologies matched.
    #[error("No tag technology matched: {message}")]
    TechnologyMismatch { message: String },

    /// Negotiation succeeded but the tag exposed no readable data.
    #[error("Card read error: {message}")]
    CardReadError { message: String },

    /// Driver initialization failed.
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// Driver communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Driver went away mid-operation.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl HardwareError {
    /// Create a new unsupported operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create a new busy error.
    pub fn busy(message: impl Into<String>) -> Self {
        Self::Busy {
            message: message.into(),
        }
    }

    /// Create a new cancelled error.
    pub fn cancelled(reason: impl Into<String>) -> Self {
        Self::Cancelled {
            reason: reason.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a new technology mismatch error.
    pub fn technology_mismatch(message: impl Into<String>) -> Self {
        Self::TechnologyMismatch {
            message: message.into(),
        }
    }

    /// Create a new card read error.
    pub fn card_read(message: impl Into<String>) -> Self {
        Self::CardReadError {
            message: message.into(),
        }
    }

    /// Create a new initialization failed error.
    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a generic error with custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Structured failure code for this error, if it has one.
    ///
    /// Variants without a code are classified from their message.
    pub fn failure_code(&self) -> Option<FailureCode> {
        match self {
            Self::DriverMissing | Self::Unsupported { .. } => Some(FailureCode::Unsupported),
            Self::Busy { .. } => Some(FailureCode::Busy),
            Self::Cancelled { .. } => Some(FailureCode::Cancelled),
            Self::Timeout { .. } => Some(FailureCode::Timeout),
            Self::TechnologyMismatch { .. } | Self::CardReadError { .. } => {
                Some(FailureCode::NoPayload)
            }
            Self::InitializationFailed { .. }
            | Self::CommunicationError { .. }
            | Self::Disconnected { .. }
            | Self::Other(_) => None,
        }
    }

    /// Convert into the classifier's input.
    ///
    /// # Examples
    ///
    /// ```
    /// use tapscan_core::{ScanErrorKind, classify};
    /// use tapscan_hardware::HardwareError;
    ///
    /// let err = HardwareError::cancelled("sheet dismissed");
    /// assert_eq!(classify(&err.failure_signal()).kind(), ScanErrorKind::UserCancelled);
    /// ```
    pub fn failure_signal(&self) -> FailureSignal {
        FailureSignal {
            code: self.failure_code(),
            message: Some(self.to_string()),
        }
    }
}
