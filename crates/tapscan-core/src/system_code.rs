//! Static system code labels.
//!
//! A system code addresses one logical application area of a multi-application
//! contactless card. The table is a fixed, versionless, process-lifetime
//! constant.

/// Label returned for codes missing from the table.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Minimum length of a system/service code in hex characters.
pub const MIN_CODE_LENGTH: usize = 2;

/// Maximum length of a system/service code in hex characters.
pub const MAX_CODE_LENGTH: usize = 4;

const ENTRIES: &[(&str, &str)] = &[
    ("0003", "transit IC"),
    ("88B4", "transit IC (private area)"),
    ("8005", "FeliCa Standard"),
    ("8008", "FeliCa Lite"),
    ("FE00", "FeliCa Lite-S / NDEF"),
    ("12FC", "PASPY and compatibles"),
];

/// Read-only mapping from system code to display label.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCodeTable;

impl SystemCodeTable {
    /// Look up a code, ignoring ASCII case.
    ///
    /// # Examples
    ///
    /// ```
    /// use tapscan_core::SystemCodeTable;
    ///
    /// assert_eq!(SystemCodeTable::lookup("fe00"), "FeliCa Lite-S / NDEF");
    /// assert_eq!(SystemCodeTable::lookup("ZZZZ"), "unknown");
    /// assert_eq!(SystemCodeTable::lookup(""), "unknown");
    /// ```
    pub fn lookup(code: &str) -> &'static str {
        let code = code.trim();
        ENTRIES
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(code))
            .map(|(_, label)| *label)
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// Check if `code` is a well-formed 2-4 character hex code.
    pub fn is_well_formed(code: &str) -> bool {
        (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code.len())
            && code.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// All table entries in declaration order.
    pub fn entries() -> impl Iterator<Item = (&'static str, &'static str)> {
        ENTRIES.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0003", "transit IC")]
    #[case("88b4", "transit IC (private area)")]
    #[case("88B4", "transit IC (private area)")]
    #[case("8005", "FeliCa Standard")]
    #[case("8008", "FeliCa Lite")]
    #[case("Fe00", "FeliCa Lite-S / NDEF")]
    #[case("12fc", "PASPY and compatibles")]
    #[case("ZZZZ", UNKNOWN_LABEL)]
    #[case("FFFF", UNKNOWN_LABEL)]
    #[case("", UNKNOWN_LABEL)]
    fn test_lookup(#[case] code: &str, #[case] label: &str) {
        assert_eq!(SystemCodeTable::lookup(code), label);
    }

    #[rstest]
    #[case("03", true)]
    #[case("0003", true)]
    #[case("fe0", true)]
    #[case("0", false)]
    #[case("00003", false)]
    #[case("ZZZZ", false)]
    #[case("", false)]
    fn test_well_formed(#[case] code: &str, #[case] expected: bool) {
        assert_eq!(SystemCodeTable::is_well_formed(code), expected);
    }

    #[test]
    fn test_entries_are_well_formed() {
        for (code, _) in SystemCodeTable::entries() {
            assert!(SystemCodeTable::is_well_formed(code), "{code}");
        }
    }
}
