//! Scoped ownership of the contactless hardware.

use tapscan_hardware::{HardwareError, NfcDriver, Result};
use tokio::sync::OwnedMutexGuard;
use tracing::{error, trace, warn};

/// Exclusive hold on the driver for the duration of one scan.
///
/// Owns the driver lock guard, so no other session can reach the hardware
/// until the claim is gone. [`release`](Self::release) frees the hardware
/// and then the lock. A claim dropped without being released (for example
/// because the scan future was dropped) schedules the release on the
/// current tokio runtime; the lock is held until that release completes.
#[derive(Debug)]
pub struct HardwareClaim<D: NfcDriver + 'static> {
    guard: Option<OwnedMutexGuard<D>>,
}

impl<D: NfcDriver + 'static> HardwareClaim<D> {
    pub fn new(guard: OwnedMutexGuard<D>) -> Self {
        Self { guard: Some(guard) }
    }

    /// Borrow the claimed driver.
    ///
    /// # Errors
    ///
    /// Returns an error once the claim has been released.
    pub fn driver(&mut self) -> Result<&mut D> {
        self.guard
            .as_deref_mut()
            .ok_or_else(|| HardwareError::other("hardware claim already released"))
    }

    pub fn is_released(&self) -> bool {
        self.guard.is_none()
    }

    /// Release the hardware and give up the lock.
    ///
    /// The lock is dropped even when the driver reports a release failure.
    /// Releasing twice is a no-op.
    pub async fn release(&mut self) -> Result<()> {
        let Some(mut guard) = self.guard.take() else {
            return Ok(());
        };

        let result = guard.release().await;
        drop(guard);
        trace!(ok = result.is_ok(), "Hardware claim released");
        result
    }
}

impl<D: NfcDriver + 'static> Drop for HardwareClaim<D> {
    fn drop(&mut self) {
        let Some(mut guard) = self.guard.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                warn!("Hardware claim dropped unreleased, scheduling release");
                runtime.spawn(async move {
                    if let Err(e) = guard.release().await {
                        error!(error = %e, "Deferred hardware release failed");
                    }
                });
            }
            Err(_) => {
                error!("Hardware claim dropped outside a tokio runtime, release skipped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tapscan_core::TagTechnology;
    use tapscan_hardware::mock::{MockNfc, MockNfcHandle};
    use tokio::sync::Mutex;

    async fn claimed() -> (Arc<Mutex<MockNfc>>, HardwareClaim<MockNfc>, MockNfcHandle) {
        let (mut driver, handle) = MockNfc::new();
        driver.start().await.unwrap();
        let driver = Arc::new(Mutex::new(driver));

        let mut claim = HardwareClaim::new(Arc::clone(&driver).try_lock_owned().unwrap());
        claim
            .driver()
            .unwrap()
            .claim(&TagTechnology::DEFAULT_SET, "Hold card")
            .await
            .unwrap();

        (driver, claim, handle)
    }

    #[tokio::test]
    async fn test_release_frees_hardware_and_lock() {
        let (driver, mut claim, handle) = claimed().await;
        assert!(driver.try_lock().is_err());

        claim.release().await.unwrap();

        assert!(claim.is_released());
        assert!(claim.driver().is_err());
        assert!(driver.try_lock().is_ok());
        assert_eq!(handle.stats().releases(), 1);
    }

    #[tokio::test]
    async fn test_release_twice_is_noop() {
        let (_driver, mut claim, handle) = claimed().await;

        claim.release().await.unwrap();
        claim.release().await.unwrap();

        assert_eq!(handle.stats().releases(), 1);
    }

    #[tokio::test]
    async fn test_drop_schedules_release() {
        let (driver, claim, handle) = claimed().await;

        drop(claim);

        let relocked = tokio::time::timeout(Duration::from_secs(1), driver.lock()).await;
        assert!(relocked.is_ok());
        assert_eq!(handle.stats().releases(), 1);
        assert!(!handle.stats().is_claimed());
    }
}
