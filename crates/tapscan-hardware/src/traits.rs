//! Contactless driver trait definition.
//!
//! This module defines the contract between the scan session and the
//! platform contactless driver. A scan walks the driver through
//! claim → negotiate → read → release; the probe uses `is_present`,
//! `is_supported`, and `start` once at startup.
//!
//! Methods return `impl Future + Send` rather than plain `async fn` so the
//! session can move a claimed driver into a spawned release task while
//! staying generic over the driver type. Implementations still write
//! `async fn`.

use std::future::Future;

use tapscan_core::{RawTag, TagTechnology};

use crate::error::Result;
use crate::types::DriverInfo;

/// Contactless reader driver abstraction.
///
/// The hardware is a single-owner exclusive resource: at most one claim is
/// outstanding at a time, and every successful `claim` must be followed by
/// `release`.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because its methods return
/// `impl Future`. You cannot use `Box<dyn NfcDriver>`. For dynamic dispatch,
/// use [`AnyNfcDriver`](crate::devices::AnyNfcDriver).
///
/// # Examples
///
/// ```no_run
/// use tapscan_core::{TagTechnology, decode};
/// use tapscan_hardware::traits::NfcDriver;
/// use tapscan_hardware::error::Result;
///
/// async fn read_once<D: NfcDriver>(driver: &mut D) -> Result<Option<String>> {
///     driver.claim(&TagTechnology::DEFAULT_SET, "Hold your card").await?;
///     let outcome = async {
///         let technology = driver.negotiate().await?;
///         Ok(driver
///             .read_tag()
///             .await?
///             .map(|tag| decode(&tag, technology).manufacturer_id().to_string()))
///     }
///     .await;
///     driver.release().await?;
///     outcome
/// }
/// ```
pub trait NfcDriver: Send + Sync {
    /// Whether the native driver module is part of this build.
    ///
    /// This is a static property and never touches hardware.
    fn is_present(&self) -> bool;

    /// Ask the device whether it has contactless hardware.
    ///
    /// # Errors
    ///
    /// Returns an error if the hardware query itself fails.
    fn is_supported(&self) -> impl Future<Output = Result<bool>> + Send;

    /// Initialize the underlying hardware manager.
    ///
    /// Called at most once per process by the capability probe.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::InitializationFailed`](crate::HardwareError::InitializationFailed)
    /// when the manager cannot be started.
    fn start(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Claim the hardware and declare the acceptable technologies.
    ///
    /// `prompt` is the user-facing text shown while awaiting presentation,
    /// on platforms that render a system sheet.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The driver was never started
    /// - A claim is already outstanding
    fn claim(
        &mut self,
        technologies: &[TagTechnology],
        prompt: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Wait for a tag and negotiate the first matching technology.
    ///
    /// Blocks asynchronously until a tag is presented. The returned future
    /// must be cancel-safe: dropping it leaves the claim in place for
    /// `release`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No claim is outstanding
    /// - The presented tag matches none of the declared technologies
    /// - The user dismissed the platform prompt
    fn negotiate(&mut self) -> impl Future<Output = Result<TagTechnology>> + Send;

    /// Read whatever the negotiated technology surface exposes.
    ///
    /// Returns `Ok(None)` when the handshake succeeded but no data is
    /// readable.
    fn read_tag(&mut self) -> impl Future<Output = Result<Option<RawTag>>> + Send;

    /// Release the claim.
    ///
    /// Must be idempotent: releasing without an outstanding claim is a no-op.
    fn release(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Get driver information.
    fn get_driver_info(&self) -> impl Future<Output = Result<DriverInfo>> + Send;
}
