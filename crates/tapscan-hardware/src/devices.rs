//! Enum wrapper for contactless driver dispatch.
//!
//! Native `async fn` in traits is not object-safe, so drivers are selected
//! through [`AnyNfcDriver`] instead of `Box<dyn NfcDriver>`. The variant is
//! chosen once at process start; call sites never check for driver
//! presence themselves.
//!
//! # Examples
//!
//! ```
//! use tapscan_hardware::devices::AnyNfcDriver;
//! use tapscan_hardware::mock::MockNfc;
//! use tapscan_hardware::traits::NfcDriver;
//!
//! let (mock, _handle) = MockNfc::new();
//! assert!(AnyNfcDriver::Mock(mock).is_present());
//! assert!(!AnyNfcDriver::unavailable().is_present());
//! ```

use tapscan_core::{RawTag, TagTechnology};

use crate::mock::MockNfc;
use crate::traits::NfcDriver;
use crate::unavailable::UnavailableNfc;
use crate::{DriverInfo, Result};

/// Enum wrapper for contactless driver dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyNfcDriver {
    /// Scripted driver for development and testing.
    Mock(MockNfc),

    /// No contactless module in this build.
    Unavailable(UnavailableNfc),
}

impl AnyNfcDriver {
    /// Driver for builds without a contactless module.
    pub fn unavailable() -> Self {
        Self::Unavailable(UnavailableNfc::new())
    }
}

impl From<MockNfc> for AnyNfcDriver {
    fn from(driver: MockNfc) -> Self {
        Self::Mock(driver)
    }
}

impl From<UnavailableNfc> for AnyNfcDriver {
    fn from(driver: UnavailableNfc) -> Self {
        Self::Unavailable(driver)
    }
}

impl NfcDriver for AnyNfcDriver {
    fn is_present(&self) -> bool {
        match self {
            Self::Mock(driver) => driver.is_present(),
            Self::Unavailable(driver) => driver.is_present(),
        }
    }

    async fn is_supported(&self) -> Result<bool> {
        match self {
            Self::Mock(driver) => driver.is_supported().await,
            Self::Unavailable(driver) => driver.is_supported().await,
        }
    }

    async fn start(&mut self) -> Result<()> {
        match self {
            Self::Mock(driver) => driver.start().await,
            Self::Unavailable(driver) => driver.start().await,
        }
    }

    async fn claim(&mut self, technologies: &[TagTechnology], prompt: &str) -> Result<()> {
        match self {
            Self::Mock(driver) => driver.claim(technologies, prompt).await,
            Self::Unavailable(driver) => driver.claim(technologies, prompt).await,
        }
    }

    async fn negotiate(&mut self) -> Result<TagTechnology> {
        match self {
            Self::Mock(driver) => driver.negotiate().await,
            Self::Unavailable(driver) => driver.negotiate().await,
        }
    }

    async fn read_tag(&mut self) -> Result<Option<RawTag>> {
        match self {
            Self::Mock(driver) => driver.read_tag().await,
            Self::Unavailable(driver) => driver.read_tag().await,
        }
    }

    async fn release(&mut self) -> Result<()> {
        match self {
            Self::Mock(driver) => driver.release().await,
            Self::Unavailable(driver) => driver.release().await,
        }
    }

    async fn get_driver_info(&self) -> Result<DriverInfo> {
        match self {
            Self::Mock(driver) => driver.get_driver_info().await,
            Self::Unavailable(driver) => driver.get_driver_info().await,
        }
    }
}
