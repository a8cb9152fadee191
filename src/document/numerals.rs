//! Arabic-Indic numeral localization.

use std::fmt::Display;

const ARABIC_INDIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Replace every ASCII digit with its Arabic-Indic glyph.
///
/// All other characters, including Arabic-Indic digits already present, pass
/// through unchanged.
pub fn localize(input: &str) -> String {
    input
        .chars()
        .map(|ch| match ch.to_digit(10) {
            Some(digit) if ch.is_ascii_digit() => ARABIC_INDIC_DIGITS[digit as usize],
            _ => ch,
        })
        .collect()
}

/// Format a value and localize its digits.
pub fn localize_number<T: Display>(value: T) -> String {
    localize(&value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localize_digits() {
        assert_eq!(localize("1445"), "١٤٤٥");
        assert_eq!(localize("0123456789"), "٠١٢٣٤٥٦٧٨٩");
    }

    #[test]
    fn test_localize_leaves_other_characters() {
        assert_eq!(localize("Room 7, الدور 2"), "Room ٧, الدور ٢");
        assert_eq!(localize("الأحد"), "الأحد");
        assert_eq!(localize(""), "");
    }

    #[test]
    fn test_localize_preserves_length_and_is_idempotent() {
        let samples = ["2025-09-01", "abc", "٣ and 3", "x9y8z7", "١٢3"];
        for sample in samples {
            let once = localize(sample);
            assert_eq!(once.chars().count(), sample.chars().count());
            assert_eq!(localize(&once), once);
            assert!(!once.chars().any(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_localize_number() {
        assert_eq!(localize_number(27550), "٢٧٥٥٠");
        assert_eq!(localize_number(9u32), "٩");
    }
}
