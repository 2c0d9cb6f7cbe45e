//! Contactless driver abstraction layer.
//!
//! This crate provides the trait-based seam between the scan session and the
//! platform contactless driver, plus the drivers that ship with the
//! workspace:
//!
//! - [`MockNfc`](mock::MockNfc) - scripted driver for development and tests
//! - [`UnavailableNfc`] - stand-in for builds without a native module
//! - [`AnyNfcDriver`] - enum dispatch selected once at process start
//!
//! # Design Philosophy
//!
//! - **Async-first**: every hardware round-trip is an async call.
//! - **Single owner**: the hardware is an exclusive resource; the session
//!   layer serializes access and guarantees release.
//! - **Classifiable errors**: every [`HardwareError`] carries an optional
//!   structured [`FailureCode`](tapscan_core::FailureCode) so the session
//!   rarely has to fall back to message matching.
//!
//! # Examples
//!
//! ```no_run
//! use tapscan_core::TagTechnology;
//! use tapscan_hardware::{NfcDriver, Result};
//!
//! async fn wait_for_technology<D: NfcDriver>(driver: &mut D) -> Result<TagTechnology> {
//!     driver.claim(&TagTechnology::DEFAULT_SET, "Hold your card").await?;
//!     let negotiated = driver.negotiate().await;
//!     driver.release().await?;
//!     negotiated
//! }
//! ```

pub mod devices;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;
pub mod unavailable;

// Re-export commonly used types for convenience
pub use devices::AnyNfcDriver;
pub use error::{HardwareError, Result};
pub use traits::NfcDriver;
pub use types::DriverInfo;
pub use unavailable::UnavailableNfc;
