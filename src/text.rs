//! Text cleanup for scraped readings.

use unicode_normalization::UnicodeNormalization;

/// Normalize a reading to NFC.
///
/// Pages occasionally carry decomposed kana (base character plus a combining
/// voicing mark), which breaks filename generation and later lookups.
#[must_use]
pub fn normalize_reading(reading: &str) -> String {
    reading.nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_reading_composes_voicing_marks() {
        // か + combining dakuten -> が
        assert_eq!(normalize_reading("か\u{3099}"), "が");
    }

    #[test]
    fn test_normalize_reading_idempotent() {
        let reading = "あや'しい'";
        assert_eq!(normalize_reading(reading), reading);
    }
}
