//! One-shot capability probe.

use tapscan_core::{ScanCapability, ScanError};
use tapscan_hardware::NfcDriver;
use tracing::{info, warn};

/// Notice when the build ships without a contactless module.
pub const DRIVER_MISSING_NOTICE: &str = "contactless driver is not available in this build";

/// Notice when the device has no contactless hardware.
pub const NOT_SUPPORTED_NOTICE: &str = "this device does not support contactless cards";

/// Outcome of the capability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub capability: ScanCapability,

    /// Why the capability resolved to `Unsupported`, if it did.
    pub notice: Option<ScanError>,
}

impl ProbeReport {
    pub fn ready() -> Self {
        Self {
            capability: ScanCapability::Ready,
            notice: None,
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self {
            capability: ScanCapability::Unsupported,
            notice: Some(ScanError::unsupported(message)),
        }
    }
}

/// Resolve the scan capability of `driver`.
///
/// Never fails: every failure folds into [`ScanCapability::Unsupported`]
/// with a notice. The hardware manager is started only when the driver is
/// present and the device reports support.
pub async fn probe<D: NfcDriver>(driver: &mut D) -> ProbeReport {
    if !driver.is_present() {
        info!("Contactless driver missing, scanning disabled");
        return ProbeReport::unsupported(DRIVER_MISSING_NOTICE);
    }

    match driver.is_supported().await {
        Ok(true) => {}
        Ok(false) => {
            info!("Device reports no contactless hardware");
            return ProbeReport::unsupported(NOT_SUPPORTED_NOTICE);
        }
        Err(e) => {
            warn!(error = %e, "Contactless hardware query failed");
            return ProbeReport::unsupported(format!("contactless hardware query failed: {}", e));
        }
    }

    if let Err(e) = driver.start().await {
        warn!(error = %e, "Contactless initialization failed");
        return ProbeReport::unsupported(format!("contactless initialization failed: {}", e));
    }

    info!("Contactless reader ready");
    ProbeReport::ready()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapscan_core::ScanErrorKind;
    use tapscan_hardware::UnavailableNfc;
    use tapscan_hardware::mock::{MockNfc, MockNfcConfig};

    #[tokio::test]
    async fn test_probe_ready_starts_once() {
        let (mut driver, handle) = MockNfc::new();

        let report = probe(&mut driver).await;

        assert_eq!(report, ProbeReport::ready());
        assert_eq!(handle.stats().starts(), 1);
    }

    #[tokio::test]
    async fn test_probe_missing_driver() {
        let mut driver = UnavailableNfc::new();

        let report = probe(&mut driver).await;

        assert_eq!(report.capability, ScanCapability::Unsupported);
        let notice = report.notice.unwrap();
        assert_eq!(notice.kind(), ScanErrorKind::Unsupported);
        assert_eq!(notice.message(), DRIVER_MISSING_NOTICE);
    }

    #[tokio::test]
    async fn test_probe_unsupported_device_skips_start() {
        let (mut driver, handle) = MockNfc::with_config(MockNfcConfig::default().supported(false));

        let report = probe(&mut driver).await;

        assert_eq!(report.capability, ScanCapability::Unsupported);
        assert_eq!(report.notice.unwrap().message(), NOT_SUPPORTED_NOTICE);
        assert_eq!(handle.stats().starts(), 0);
    }

    #[tokio::test]
    async fn test_probe_query_failure_is_unsupported() {
        let (mut driver, handle) =
            MockNfc::with_config(MockNfcConfig::default().query_error("adapter gone"));

        let report = probe(&mut driver).await;

        assert_eq!(report.capability, ScanCapability::Unsupported);
        assert!(report.notice.unwrap().message().contains("adapter gone"));
        assert_eq!(handle.stats().starts(), 0);
    }

    #[tokio::test]
    async fn test_probe_init_failure_is_unsupported() {
        let (mut driver, _handle) =
            MockNfc::with_config(MockNfcConfig::default().start_error("manager refused"));

        let report = probe(&mut driver).await;

        assert_eq!(report.capability, ScanCapability::Unsupported);
        let notice = report.notice.unwrap();
        assert_eq!(notice.kind(), ScanErrorKind::Unsupported);
        assert!(notice.message().starts_with("contactless initialization failed: "));
        assert!(notice.message().contains("manager refused"));
    }
}
