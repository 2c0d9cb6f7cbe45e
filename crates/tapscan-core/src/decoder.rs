//! Card decoding.

use crate::card::{CardReading, RawTag, TagTechnology};

/// Decode a raw tag payload into a [`CardReading`].
///
/// Total over any tag shape. The manufacturer identifier comes from `idm`,
/// falling back to the generic `id`, and finally to an empty string. An
/// absent or malformed system code yields an empty service code, which
/// labels as "unknown".
///
/// # Examples
///
/// ```
/// use tapscan_core::{RawTag, TagTechnology, decode};
///
/// let reading = decode(&RawTag::new().with_id("04ABCDEF"), TagTechnology::Mifare);
/// assert_eq!(reading.manufacturer_id(), "04ABCDEF");
/// assert_eq!(reading.service_code(), "");
/// assert_eq!(reading.label(), "unknown");
/// ```
pub fn decode(tag: &RawTag, technology: TagTechnology) -> CardReading {
    let manufacturer_id = tag
        .idm
        .as_deref()
        .or(tag.id.as_deref())
        .unwrap_or_default();

    let service_code = tag.system_code.as_deref().unwrap_or_default();

    CardReading::new(manufacturer_id, service_code, technology)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_felica_transit_card() {
        let tag = RawTag::new()
            .with_idm("0123456789AB")
            .with_system_code("0003");

        let reading = decode(&tag, TagTechnology::Felica);

        assert_eq!(reading.manufacturer_id(), "0123456789AB");
        assert_eq!(reading.service_code(), "0003");
        assert_eq!(reading.label(), "transit IC");
        assert_eq!(reading.detected_technology(), TagTechnology::Felica);
    }

    #[test]
    fn test_decode_unmapped_code() {
        let tag = RawTag::new()
            .with_idm("0123456789AB")
            .with_system_code("ZZZZ");

        let reading = decode(&tag, TagTechnology::Felica);
        assert_eq!(reading.label(), "unknown");
    }

    #[test]
    fn test_decode_prefers_idm_over_id() {
        let tag = RawTag::new().with_idm("AAAA").with_id("BBBB");
        assert_eq!(decode(&tag, TagTechnology::Felica).manufacturer_id(), "AAAA");
    }

    #[test]
    fn test_decode_empty_tag() {
        let reading = decode(&RawTag::new(), TagTechnology::IsoDep);
        assert_eq!(reading.manufacturer_id(), "");
        assert_eq!(reading.service_code(), "");
        assert_eq!(reading.label(), "unknown");
    }

    #[test]
    fn test_decode_lowercase_code() {
        let tag = RawTag::new().with_idm("01").with_system_code("fe00");
        assert_eq!(
            decode(&tag, TagTechnology::Felica).label(),
            "FeliCa Lite-S / NDEF"
        );
    }
}
