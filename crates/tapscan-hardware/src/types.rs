//! Common types shared across driver implementations.

use serde::{Deserialize, Serialize};
use tapscan_core::TagTechnology;

/// Contactless driver information.
///
/// Contains driver-specific metadata such as the platform bridge in use
/// and the technologies it can negotiate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverInfo {
    /// Driver name (e.g., "Mock NFC Reader").
    pub name: String,

    /// Technologies the driver can negotiate.
    pub technologies: Vec<TagTechnology>,

    /// Optional platform or bridge version string.
    pub platform: Option<String>,
}

impl DriverInfo {
    /// Create a new DriverInfo.
    pub fn new(name: impl Into<String>, technologies: Vec<TagTechnology>) -> Self {
        Self {
            name: name.into(),
            technologies,
            platform: None,
        }
    }

    /// Set the platform string.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Check if the driver can negotiate `technology`.
    pub fn supports(&self, technology: TagTechnology) -> bool {
        self.technologies.contains(&technology)
    }
}
