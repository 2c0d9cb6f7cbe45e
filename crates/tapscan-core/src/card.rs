//! Tag payloads and decoded card readings.

use crate::system_code::SystemCodeTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Low-level contactless technology a tag negotiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TagTechnology {
    /// Sony FeliCa (ISO 18092).
    #[serde(rename = "FeliCa")]
    Felica,

    /// NXP MIFARE family.
    #[serde(rename = "MIFARE")]
    Mifare,

    /// Vicinity cards (ISO 15693).
    #[serde(rename = "ISO15693")]
    Iso15693,

    /// ISO 14443-4 smart cards.
    IsoDep,
}

impl TagTechnology {
    /// Default set requested from the driver, in request order.
    pub const DEFAULT_SET: [TagTechnology; 4] = [
        TagTechnology::Felica,
        TagTechnology::Mifare,
        TagTechnology::Iso15693,
        TagTechnology::IsoDep,
    ];

    /// Get a human-readable name for the technology.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Felica => "FeliCa",
            Self::Mifare => "MIFARE",
            Self::Iso15693 => "ISO15693",
            Self::IsoDep => "IsoDep",
        }
    }
}

impl fmt::Display for TagTechnology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tag payload as exposed by the negotiated technology surface.
///
/// Drivers differ in which fields they fill: FeliCa surfaces expose an
/// `idm` and a `systemCode`, generic surfaces only an `id`. Every field is
/// optional so any driver payload deserializes.
///
/// # Examples
///
/// ```
/// use tapscan_core::RawTag;
///
/// let tag: RawTag = serde_json::from_str(r#"{"idm":"0123456789AB","systemCode":"0003"}"#).unwrap();
/// assert_eq!(tag.idm.as_deref(), Some("0123456789AB"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTag {
    /// Manufacturer identifier (FeliCa IDm), hex encoded.
    pub idm: Option<String>,

    /// Generic tag identifier, hex encoded.
    pub id: Option<String>,

    /// System/service code, hex encoded.
    pub system_code: Option<String>,
}

impl RawTag {
    /// Create an empty tag payload.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idm(mut self, idm: impl Into<String>) -> Self {
        self.idm = Some(idm.into());
        self
    }

    /// Set the manufacturer identifier from raw bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use tapscan_core::RawTag;
    ///
    /// let tag = RawTag::new().with_idm_bytes(&[0x01, 0x23, 0xAB]);
    /// assert_eq!(tag.idm.as_deref(), Some("0123AB"));
    /// ```
    pub fn with_idm_bytes(self, idm: &[u8]) -> Self {
        self.with_idm(hex_upper(idm))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_system_code(mut self, code: impl Into<String>) -> Self {
        self.system_code = Some(code.into());
        self
    }

    /// True when the payload carries nothing a reading could be built from.
    pub fn is_empty(&self) -> bool {
        self.idm.is_none() && self.id.is_none() && self.system_code.is_none()
    }
}

/// Decoded result of a successful scan.
///
/// Immutable once constructed; each successful scan replaces the previous
/// reading wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardReading {
    manufacturer_id: String,
    service_code: String,
    detected_technology: TagTechnology,
}

impl CardReading {
    /// Create a reading. A service code that is not 2-4 hex characters is
    /// stored as empty.
    pub fn new(
        manufacturer_id: impl Into<String>,
        service_code: impl Into<String>,
        detected_technology: TagTechnology,
    ) -> Self {
        let service_code = service_code.into();
        let service_code = if SystemCodeTable::is_well_formed(service_code.trim()) {
            service_code.trim().to_string()
        } else {
            String::new()
        };

        Self {
            manufacturer_id: manufacturer_id.into(),
            service_code,
            detected_technology,
        }
    }

    pub fn manufacturer_id(&self) -> &str {
        &self.manufacturer_id
    }

    pub fn service_code(&self) -> &str {
        &self.service_code
    }

    pub fn detected_technology(&self) -> TagTechnology {
        self.detected_technology
    }

    /// Display label for the service code.
    pub fn label(&self) -> &'static str {
        SystemCodeTable::lookup(&self.service_code)
    }
}

fn hex_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technology_names() {
        assert_eq!(TagTechnology::Felica.to_string(), "FeliCa");
        assert_eq!(TagTechnology::IsoDep.name(), "IsoDep");
        assert_eq!(TagTechnology::DEFAULT_SET.len(), 4);
        assert_eq!(TagTechnology::DEFAULT_SET[0], TagTechnology::Felica);
    }

    #[test]
    fn test_technology_serializes_as_display_name() {
        for technology in TagTechnology::DEFAULT_SET {
            let json = serde_json::to_string(&technology).unwrap();
            assert_eq!(json, format!("\"{}\"", technology));

            let back: TagTechnology = serde_json::from_str(&json).unwrap();
            assert_eq!(back, technology);
        }
    }

    #[test]
    fn test_raw_tag_deserializes_partial_payloads() {
        let tag: RawTag = serde_json::from_str(r#"{"id":"04ABCDEF"}"#).unwrap();
        assert_eq!(tag.id.as_deref(), Some("04ABCDEF"));
        assert_eq!(tag.idm, None);
        assert_eq!(tag.system_code, None);

        let empty: RawTag = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_raw_tag_ignores_unknown_fields() {
        let tag: RawTag =
            serde_json::from_str(r#"{"idm":"01","techTypes":["felica"],"pmm":"00"}"#).unwrap();
        assert_eq!(tag.idm.as_deref(), Some("01"));
    }

    #[test]
    fn test_reading_drops_malformed_service_code() {
        let reading = CardReading::new("01", "not-hex", TagTechnology::Mifare);
        assert_eq!(reading.service_code(), "");
        assert_eq!(reading.label(), "unknown");
    }

    #[test]
    fn test_reading_keeps_well_formed_service_code() {
        let reading = CardReading::new("01", "88b4", TagTechnology::Felica);
        assert_eq!(reading.service_code(), "88b4");
        assert_eq!(reading.label(), "transit IC (private area)");
    }

    #[test]
    fn test_reading_serialization() {
        let reading = CardReading::new("0123456789AB", "0003", TagTechnology::Felica);
        let json = serde_json::to_string(&reading).unwrap();
        assert!(json.contains("\"manufacturerId\":\"0123456789AB\""));
        assert!(json.contains("\"serviceCode\":\"0003\""));
        assert!(json.contains("\"detectedTechnology\":\"FeliCa\""));
    }
}
