//! Core types for the contactless card scanning session.
//!
//! This crate holds everything about a scan that does not touch hardware:
//!
//! - [`ScanCapability`] - tri-state readiness flag produced by the probe
//! - [`ScanError`] / [`ScanErrorKind`] - the closed failure taxonomy shown to
//!   the presentation layer
//! - [`classify`] - total mapping from any [`FailureSignal`] into a [`ScanError`]
//! - [`decode`] - total mapping from a [`RawTag`] into a [`CardReading`]
//! - [`SystemCodeTable`] - static system code labels
//!
//! # Examples
//!
//! ```
//! use tapscan_core::{RawTag, TagTechnology, decode};
//!
//! let tag = RawTag::new().with_idm("0123456789AB").with_system_code("0003");
//! let reading = decode(&tag, TagTechnology::Felica);
//!
//! assert_eq!(reading.manufacturer_id(), "0123456789AB");
//! assert_eq!(reading.label(), "transit IC");
//! ```

pub mod capability;
pub mod card;
pub mod classify;
pub mod decoder;
pub mod error;
pub mod system_code;

pub use capability::ScanCapability;
pub use card::{CardReading, RawTag, TagTechnology};
pub use classify::{FailureCode, FailureSignal, UNKNOWN_ERROR_MESSAGE, classify};
pub use decoder::decode;
pub use error::{ScanError, ScanErrorKind};
pub use system_code::{SystemCodeTable, UNKNOWN_LABEL};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
