use serde::{Deserialize, Serialize};

use super::roster::CellValue;

/// How `.0` artifacts left by numeric spreadsheet storage are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizeMode {
    /// Remove every `.0` substring, wherever it occurs.
    ///
    /// This can corrupt identifiers that legitimately contain `.0`
    /// (`"12.034"` becomes `"1234"`); kept as the default so lookups match
    /// rosters that were keyed this way.
    #[default]
    Legacy,
    /// Remove a single trailing `.0` only.
    NumericSuffix,
}

/// Canonical identifier string for a raw cell. Never fails; a missing cell
/// normalizes to the empty string.
pub fn normalize_id(value: Option<&CellValue>, mode: NormalizeMode) -> String {
    let raw = match value {
        Some(cell) => cell.to_string(),
        None => return String::new(),
    };

    match mode {
        NormalizeMode::Legacy => raw.replace(".0", "").trim().to_string(),
        NormalizeMode::NumericSuffix => {
            let trimmed = raw.trim();
            trimmed.strip_suffix(".0").unwrap_or(trimmed).trim().to_string()
        }
    }
}

/// Last six characters of a normalized identifier, or the whole identifier
/// when it is shorter.
pub fn last6(normalized: &str) -> &str {
    match normalized.char_indices().rev().nth(5) {
        Some((idx, _)) => &normalized[idx..],
        None => normalized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_normalize_numeric_storage() {
        let float = CellValue::Float(202412345.0);
        assert_eq!(normalize_id(Some(&float), NormalizeMode::Legacy), "202412345");
        assert_eq!(normalize_id(Some(&float), NormalizeMode::NumericSuffix), "202412345");

        let int = CellValue::Integer(202412345);
        assert_eq!(normalize_id(Some(&int), NormalizeMode::Legacy), "202412345");
    }

    #[test]
    fn test_normalize_text_with_float_suffix_and_whitespace() {
        assert_eq!(
            normalize_id(Some(&text(" 2024-123456.0 ")), NormalizeMode::Legacy),
            "2024-123456"
        );
        assert_eq!(normalize_id(Some(&text("  123456\t")), NormalizeMode::Legacy), "123456");
    }

    #[test]
    fn test_legacy_mode_strips_inner_substring() {
        assert_eq!(normalize_id(Some(&text("12.034")), NormalizeMode::Legacy), "1234");
        assert_eq!(normalize_id(Some(&text("12.034")), NormalizeMode::NumericSuffix), "12.034");
    }

    #[test]
    fn test_missing_and_empty_cells() {
        assert_eq!(normalize_id(None, NormalizeMode::Legacy), "");
        assert_eq!(normalize_id(Some(&CellValue::Empty), NormalizeMode::Legacy), "");
    }

    #[test]
    fn test_last6() {
        assert_eq!(last6("202412345"), "412345");
        assert_eq!(last6("123456"), "123456");
        assert_eq!(last6("12345"), "12345");
        assert_eq!(last6(""), "");
    }

    proptest! {
        #[test]
        fn normalized_ids_have_no_surrounding_whitespace(raw in "\\PC*") {
            for mode in [NormalizeMode::Legacy, NormalizeMode::NumericSuffix] {
                let normalized = normalize_id(Some(&CellValue::from_raw(&raw)), mode);
                prop_assert_eq!(normalized.trim(), normalized.as_str());
            }
        }

        #[test]
        fn last6_is_a_suffix_of_at_most_six_chars(raw in "\\PC{0,20}") {
            let tail = last6(&raw);
            prop_assert!(raw.ends_with(tail));
            prop_assert!(tail.chars().count() <= 6);
        }
    }
}
