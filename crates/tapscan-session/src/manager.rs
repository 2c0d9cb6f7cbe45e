//! Scan session manager.
//!
//! Owns the driver, the memoized capability probe, and the single active
//! scan slot. Every scan walks the [`SessionStateMachine`] from `Idle` to
//! `Settled`, and every exit path out of a claimed state releases the
//! hardware.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use tapscan_core::{CardReading, ScanCapability, ScanError, classify, decode};
use tapscan_hardware::{DriverInfo, HardwareError, NfcDriver};
use tokio::sync::{Mutex, OnceCell, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::claim::HardwareClaim;
use crate::config::SessionConfig;
use crate::probe::{ProbeReport, probe};
use crate::state_machine::{SessionState, SessionStateMachine};

/// Message of the `unsupported` error returned when scanning is not ready.
pub const NOT_READY_MESSAGE: &str = "contactless reader is not ready";

/// Coordinates scans against one contactless driver.
///
/// At most one scan is active at a time. A second request while one is in
/// flight fails immediately with `hardware-busy` and leaves the first
/// untouched.
///
/// # Examples
///
/// ```
/// use tapscan_core::{RawTag, TagTechnology};
/// use tapscan_hardware::mock::MockNfc;
/// use tapscan_session::{SessionConfig, SessionManager};
///
/// #[tokio::main]
/// async fn main() {
///     let (driver, handle) = MockNfc::new();
///     let manager = SessionManager::new(driver, SessionConfig::default());
///     manager.initialize().await;
///
///     handle
///         .present_tag(TagTechnology::Felica, RawTag::new().with_idm("0123456789AB").with_system_code("0003"))
///         .await
///         .unwrap();
///
///     let reading = manager.start_scan().await.unwrap();
///     assert_eq!(reading.label(), "transit IC");
///     assert_eq!(handle.stats().releases(), 1);
/// }
/// ```
#[derive(Debug)]
pub struct SessionManager<D: NfcDriver + 'static> {
    driver: Arc<Mutex<D>>,
    config: SessionConfig,
    probe: OnceCell<ProbeReport>,
    active: StdMutex<Option<ActiveScan>>,
    next_id: AtomicU64,
    state_tx: watch::Sender<SessionState>,
}

#[derive(Debug)]
struct ActiveScan {
    id: u64,
    token: CancellationToken,
}

impl<D: NfcDriver + 'static> SessionManager<D> {
    pub fn new(driver: D, config: SessionConfig) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);

        Self {
            driver: Arc::new(Mutex::new(driver)),
            config,
            probe: OnceCell::new(),
            active: StdMutex::new(None),
            next_id: AtomicU64::new(1),
            state_tx,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run the capability probe once.
    ///
    /// Concurrent and repeated calls share the first probe's report.
    pub async fn initialize(&self) -> &ProbeReport {
        self.probe
            .get_or_init(|| async {
                let mut driver = self.driver.lock().await;
                let report = probe(&mut *driver).await;
                debug_assert!(
                    ScanCapability::Unknown.can_transition_to(report.capability),
                    "initialization must resolve the capability"
                );
                report
            })
            .await
    }

    /// Current capability; `Unknown` until [`initialize`](Self::initialize)
    /// completes.
    pub fn capability(&self) -> ScanCapability {
        self.probe
            .get()
            .map(|report| report.capability)
            .unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        self.active_slot().is_some()
    }

    /// Watch the state of the current (or most recent) scan.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Cancel the active scan, if any.
    ///
    /// The scan still releases the hardware and settles as
    /// `user-cancelled`. Returns `false` when nothing was active.
    pub fn cancel(&self) -> bool {
        match self.active_slot().as_ref() {
            Some(active) => {
                info!(scan_id = active.id, "Cancelling active scan");
                active.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Driver description, unless a scan currently holds the hardware.
    pub async fn driver_info(&self) -> tapscan_hardware::Result<DriverInfo> {
        let driver = self
            .driver
            .try_lock()
            .map_err(|_| HardwareError::busy("hardware is claimed by an active scan"))?;
        driver.get_driver_info().await
    }

    /// Scan one card.
    ///
    /// # Errors
    ///
    /// Every failure is classified into a [`ScanError`]; no hardware error
    /// escapes this boundary.
    pub async fn start_scan(&self) -> Result<CardReading, ScanError> {
        self.start_scan_with(&CancellationToken::new()).await
    }

    /// Scan one card, cancelling when `parent` is cancelled.
    pub async fn start_scan_with(
        &self,
        parent: &CancellationToken,
    ) -> Result<CardReading, ScanError> {
        if !self.capability().is_ready() {
            debug!(capability = %self.capability(), "Scan rejected, reader not ready");
            return Err(ScanError::unsupported(NOT_READY_MESSAGE));
        }

        let guard = match Arc::clone(&self.driver).try_lock_owned() {
            Ok(guard) => guard,
            Err(_) => {
                debug!("Scan rejected, another session holds the hardware");
                return Err(ScanError::busy());
            }
        };

        let token = parent.child_token();
        let registration = self.register(token.clone());
        info!(scan_id = registration.id, "Scan started");

        let session = ScanSession {
            id: registration.id,
            config: &self.config,
            state_tx: &self.state_tx,
            token,
            machine: SessionStateMachine::new(),
        };

        session.run(HardwareClaim::new(guard)).await
    }

    fn register(&self, token: CancellationToken) -> Registration<'_> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        *self.active_slot() = Some(ActiveScan { id, token });
        Registration {
            slot: &self.active,
            id,
        }
    }

    fn active_slot(&self) -> std::sync::MutexGuard<'_, Option<ActiveScan>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the active slot when its scan ends, however it ends.
struct Registration<'a> {
    slot: &'a StdMutex<Option<ActiveScan>>,
    id: u64,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|active| active.id == self.id) {
            *slot = None;
        }
    }
}

/// One scan attempt, from claim to settlement.
struct ScanSession<'a> {
    id: u64,
    config: &'a SessionConfig,
    state_tx: &'a watch::Sender<SessionState>,
    token: CancellationToken,
    machine: SessionStateMachine,
}

impl ScanSession<'_> {
    async fn run<D: NfcDriver + 'static>(
        mut self,
        mut claim: HardwareClaim<D>,
    ) -> Result<CardReading, ScanError> {
        let outcome = self.claim_and_read(&mut claim).await;

        self.advance(SessionState::Releasing);
        if let Err(e) = claim.release().await {
            warn!(scan_id = self.id, error = %e, "Hardware release failed");
        }
        self.advance(SessionState::Settled);

        match outcome {
            Ok(reading) => {
                info!(
                    scan_id = self.id,
                    technology = %reading.detected_technology(),
                    label = reading.label(),
                    "Scan succeeded"
                );
                Ok(reading)
            }
            Err(e) => {
                let scan_error = classify(&e.failure_signal());
                info!(
                    scan_id = self.id,
                    kind = %scan_error.kind(),
                    error = %e,
                    "Scan failed"
                );
                Err(scan_error)
            }
        }
    }

    async fn claim_and_read<D: NfcDriver + 'static>(
        &mut self,
        claim: &mut HardwareClaim<D>,
    ) -> tapscan_hardware::Result<CardReading> {
        self.advance(SessionState::Claiming);
        let driver = claim.driver()?;
        until_cancelled(
            &self.token,
            driver.claim(&self.config.technologies, &self.config.prompt),
        )
        .await?;

        self.advance(SessionState::Negotiating);
        let timeout = self.config.presentation_timeout;
        let technology = until_cancelled(&self.token, negotiate(driver, timeout)).await?;
        debug!(scan_id = self.id, %technology, "Technology negotiated");

        self.advance(SessionState::Reading);
        let tag = until_cancelled(&self.token, driver.read_tag())
            .await?
            .ok_or_else(|| HardwareError::card_read("card could not be read"))?;

        Ok(decode(&tag, technology))
    }

    fn advance(&mut self, state: SessionState) {
        let elapsed = self.machine.time_in_current_state();
        match self.machine.transition_to(state) {
            Ok(transition) => {
                debug!(
                    scan_id = self.id,
                    from = %transition.from,
                    to = %transition.to,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Scan state changed"
                );
                self.state_tx.send_replace(state);
            }
            Err(e) => {
                error!(scan_id = self.id, error = %e, "Scan state machine rejected transition");
            }
        }
    }
}

async fn negotiate<D: NfcDriver>(
    driver: &mut D,
    timeout: Option<Duration>,
) -> tapscan_hardware::Result<tapscan_core::TagTechnology> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, driver.negotiate())
            .await
            .unwrap_or_else(|_| {
                let duration_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                Err(HardwareError::timeout(duration_ms))
            }),
        None => driver.negotiate().await,
    }
}

async fn until_cancelled<T>(
    token: &CancellationToken,
    operation: impl Future<Output = tapscan_hardware::Result<T>>,
) -> tapscan_hardware::Result<T> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(HardwareError::cancelled("scan cancelled")),
        result = operation => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapscan_core::{RawTag, ScanErrorKind, TagTechnology};
    use tapscan_hardware::mock::{MockNfc, MockNfcHandle};

    async fn ready_manager() -> (SessionManager<MockNfc>, MockNfcHandle) {
        let (driver, handle) = MockNfc::new();
        let manager = SessionManager::new(driver, SessionConfig::default());
        assert_eq!(manager.initialize().await.capability, ScanCapability::Ready);
        (manager, handle)
    }

    #[tokio::test]
    async fn test_capability_unknown_before_initialize() {
        let (driver, handle) = MockNfc::new();
        let manager = SessionManager::new(driver, SessionConfig::default());

        assert_eq!(manager.capability(), ScanCapability::Unknown);
        let err = manager.start_scan().await.unwrap_err();
        assert_eq!(err.kind(), ScanErrorKind::Unsupported);
        assert_eq!(err.message(), NOT_READY_MESSAGE);
        assert_eq!(handle.stats().claims(), 0);
    }

    #[tokio::test]
    async fn test_initialize_runs_probe_once() {
        let (manager, handle) = ready_manager().await;

        manager.initialize().await;
        manager.initialize().await;

        assert_eq!(handle.stats().starts(), 1);
    }

    #[tokio::test]
    async fn test_scan_publishes_full_state_path() {
        let (manager, handle) = ready_manager().await;
        let rx = manager.subscribe();
        handle
            .present_tag(TagTechnology::Mifare, RawTag::new().with_id("04A1B2C3"))
            .await
            .unwrap();

        let reading = manager.start_scan().await.unwrap();

        assert_eq!(reading.manufacturer_id(), "04A1B2C3");
        assert_eq!(reading.detected_technology(), TagTechnology::Mifare);
        assert_eq!(*rx.borrow(), SessionState::Settled);
        assert!(!manager.is_active());
    }

    #[tokio::test]
    async fn test_unreadable_tag_is_read_failed() {
        let (manager, handle) = ready_manager().await;
        handle
            .present_unreadable(TagTechnology::Felica)
            .await
            .unwrap();

        let err = manager.start_scan().await.unwrap_err();

        assert_eq!(err.kind(), ScanErrorKind::ReadFailed);
        assert_eq!(handle.stats().releases(), 1);
    }

    #[tokio::test]
    async fn test_cancel_without_active_scan() {
        let (manager, _handle) = ready_manager().await;
        assert!(!manager.cancel());
    }

    #[tokio::test]
    async fn test_driver_info_when_idle() {
        let (manager, _handle) = ready_manager().await;

        let info = manager.driver_info().await.unwrap();

        assert_eq!(info.name, "Mock NFC Reader");
    }

    #[tokio::test(start_paused = true)]
    async fn test_presentation_timeout_is_read_failed() {
        let (driver, handle) = MockNfc::new();
        let config = SessionConfig::default().presentation_timeout(Some(Duration::from_secs(5)));
        let manager = SessionManager::new(driver, config);
        manager.initialize().await;

        let err = manager.start_scan().await.unwrap_err();

        assert_eq!(err.kind(), ScanErrorKind::ReadFailed);
        assert!(err.message().contains("5000ms"));
        assert_eq!(handle.stats().claims(), 1);
        assert_eq!(handle.stats().releases(), 1);
    }
}
