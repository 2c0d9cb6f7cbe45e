//! Driver stand-in for builds that ship without a contactless module.

use tapscan_core::{RawTag, TagTechnology};

use crate::{HardwareError, NfcDriver, Result, types::DriverInfo};

/// Driver selected when the native contactless module is absent.
///
/// Every hardware call fails with [`HardwareError::DriverMissing`]; the
/// capability probe checks [`NfcDriver::is_present`] first and never gets
/// that far.
#[derive(Debug, Clone, Default)]
pub struct UnavailableNfc {
    reason: Option<String>,
}

impl UnavailableNfc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record why the driver is missing, for diagnostics.
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

impl NfcDriver for UnavailableNfc {
    fn is_present(&self) -> bool {
        false
    }

    async fn is_supported(&self) -> Result<bool> {
        Err(HardwareError::DriverMissing)
    }

    async fn start(&mut self) -> Result<()> {
        Err(HardwareError::DriverMissing)
    }

    async fn claim(&mut self, _technologies: &[TagTechnology], _prompt: &str) -> Result<()> {
        Err(HardwareError::DriverMissing)
    }

    async fn negotiate(&mut self) -> Result<TagTechnology> {
        Err(HardwareError::DriverMissing)
    }

    async fn read_tag(&mut self) -> Result<Option<RawTag>> {
        Err(HardwareError::DriverMissing)
    }

    async fn release(&mut self) -> Result<()> {
        Ok(())
    }

    async fn get_driver_info(&self) -> Result<DriverInfo> {
        Ok(DriverInfo::new("Unavailable", Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_driver_reports_missing() {
        let mut driver = UnavailableNfc::with_reason("built without native module");

        assert!(!driver.is_present());
        assert_eq!(driver.reason(), Some("built without native module"));
        assert!(matches!(
            driver.is_supported().await,
            Err(HardwareError::DriverMissing)
        ));
        assert!(matches!(
            driver.start().await,
            Err(HardwareError::DriverMissing)
        ));
        assert!(driver.release().await.is_ok());
    }
}
