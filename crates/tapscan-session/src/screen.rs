//! Presentation state for the scan screen.
//!
//! [`ScanScreen`] is the bridge between a UI and the [`SessionManager`]: it
//! owns the displayed state, publishes it on a watch channel, and ties
//! in-flight scans to its own lifetime so that tearing the screen down
//! cancels them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tapscan_core::{CardReading, ScanCapability, ScanError};
use tapscan_hardware::NfcDriver;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::manager::SessionManager;

/// Everything a scan screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenState {
    pub capability: ScanCapability,

    /// Last successful reading.
    pub reading: Option<CardReading>,

    /// Error banner; never holds a `user-cancelled` error.
    pub error: Option<ScanError>,

    /// True while a scan started from this screen is in flight.
    pub scanning: bool,
}

/// Scan screen bound to a shared [`SessionManager`].
#[derive(Debug)]
pub struct ScanScreen<D: NfcDriver + 'static> {
    manager: Arc<SessionManager<D>>,
    lifetime: CancellationToken,
    state_tx: watch::Sender<ScreenState>,
}

impl<D: NfcDriver + 'static> ScanScreen<D> {
    pub fn new(manager: Arc<SessionManager<D>>) -> Self {
        let (state_tx, _) = watch::channel(ScreenState {
            capability: manager.capability(),
            ..ScreenState::default()
        });

        Self {
            manager,
            lifetime: CancellationToken::new(),
            state_tx,
        }
    }

    /// Probe the reader (once per manager) and show the result.
    ///
    /// A probe notice replaces the banner; a clean probe leaves whatever
    /// error is already displayed.
    pub async fn mount(&self) -> ScanCapability {
        let report = self.manager.initialize().await;

        self.state_tx.send_modify(|state| {
            state.capability = report.capability;
            if let Some(notice) = &report.notice {
                state.error = Some(notice.clone());
            }
        });

        report.capability
    }

    /// Start a scan from this screen.
    ///
    /// Clears the previous reading and error, then shows whichever the
    /// scan produces. Cancellation leaves the banner empty.
    ///
    /// # Errors
    ///
    /// Returns `hardware-busy` without touching the displayed state while
    /// a scan from this screen is in flight, and `user-cancelled` once the
    /// screen has been unmounted.
    pub async fn start_scan(&self) -> Result<CardReading, ScanError> {
        if self.lifetime.is_cancelled() {
            return Err(ScanError::cancelled());
        }

        let started = self.state_tx.send_if_modified(|state| {
            if state.scanning {
                return false;
            }
            state.scanning = true;
            state.reading = None;
            state.error = None;
            true
        });
        if !started {
            debug!("Scan request ignored, screen already scanning");
            return Err(ScanError::busy());
        }

        let _scanning = ScanningFlag(&self.state_tx);
        let outcome = self.manager.start_scan_with(&self.lifetime).await;

        self.state_tx.send_modify(|state| match &outcome {
            Ok(reading) => state.reading = Some(reading.clone()),
            Err(e) if e.is_reportable() => state.error = Some(e.clone()),
            Err(_) => {}
        });

        outcome
    }

    /// Tear the screen down, cancelling any in-flight scan.
    pub fn unmount(&self) {
        if !self.lifetime.is_cancelled() {
            debug!("Scan screen unmounted");
            self.lifetime.cancel();
        }
    }

    pub fn is_mounted(&self) -> bool {
        !self.lifetime.is_cancelled()
    }

    pub fn state(&self) -> ScreenState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScreenState> {
        self.state_tx.subscribe()
    }
}

impl<D: NfcDriver + 'static> Drop for ScanScreen<D> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

/// Clears `scanning` when the scan call ends or is dropped.
struct ScanningFlag<'a>(&'a watch::Sender<ScreenState>);

impl Drop for ScanningFlag<'_> {
    fn drop(&mut self) {
        self.0
            .send_if_modified(|state| std::mem::replace(&mut state.scanning, false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapscan_core::{RawTag, ScanErrorKind, TagTechnology};
    use tapscan_hardware::AnyNfcDriver;
    use tapscan_hardware::mock::MockNfc;

    use crate::SessionConfig;

    #[tokio::test]
    async fn test_mount_ready() {
        let (driver, _handle) = MockNfc::new();
        let manager = Arc::new(SessionManager::new(driver, SessionConfig::default()));
        let screen = ScanScreen::new(manager);

        assert_eq!(screen.state().capability, ScanCapability::Unknown);
        assert_eq!(screen.mount().await, ScanCapability::Ready);
        assert_eq!(screen.state().capability, ScanCapability::Ready);
        assert!(screen.state().error.is_none());
    }

    #[tokio::test]
    async fn test_mount_without_driver_shows_notice() {
        let manager = Arc::new(SessionManager::new(
            AnyNfcDriver::unavailable(),
            SessionConfig::default(),
        ));
        let screen = ScanScreen::new(manager);

        assert_eq!(screen.mount().await, ScanCapability::Unsupported);

        let state = screen.state();
        assert_eq!(state.error.unwrap().kind(), ScanErrorKind::Unsupported);
        assert!(!state.scanning);
    }

    #[tokio::test]
    async fn test_scan_replaces_previous_error() {
        let (driver, handle) = MockNfc::new();
        let manager = Arc::new(SessionManager::new(driver, SessionConfig::default()));
        let screen = ScanScreen::new(manager);
        screen.mount().await;

        handle
            .present_unreadable(TagTechnology::Felica)
            .await
            .unwrap();
        assert!(screen.start_scan().await.is_err());
        assert_eq!(
            screen.state().error.as_ref().map(ScanError::kind),
            Some(ScanErrorKind::ReadFailed)
        );

        handle
            .present_tag(
                TagTechnology::Felica,
                RawTag::new().with_idm("0123456789AB").with_system_code("0003"),
            )
            .await
            .unwrap();
        screen.start_scan().await.unwrap();

        let state = screen.state();
        assert!(state.error.is_none());
        assert!(!state.scanning);
        assert_eq!(state.reading.unwrap().label(), "transit IC");
    }

    #[tokio::test]
    async fn test_remount_keeps_displayed_error() {
        let (driver, handle) = MockNfc::new();
        let manager = Arc::new(SessionManager::new(driver, SessionConfig::default()));
        let screen = ScanScreen::new(manager);
        screen.mount().await;

        handle
            .present_unreadable(TagTechnology::Mifare)
            .await
            .unwrap();
        screen.start_scan().await.unwrap_err();

        assert_eq!(screen.mount().await, ScanCapability::Ready);
        assert_eq!(
            screen.state().error.as_ref().map(ScanError::kind),
            Some(ScanErrorKind::ReadFailed)
        );
    }

    #[tokio::test]
    async fn test_start_after_unmount_is_cancelled() {
        let (driver, handle) = MockNfc::new();
        let manager = Arc::new(SessionManager::new(driver, SessionConfig::default()));
        let screen = ScanScreen::new(manager);
        screen.mount().await;

        screen.unmount();

        let err = screen.start_scan().await.unwrap_err();
        assert_eq!(err.kind(), ScanErrorKind::UserCancelled);
        assert!(!screen.is_mounted());
        assert_eq!(handle.stats().claims(), 0);
    }
}
