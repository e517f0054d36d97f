// * Description Cleaner
// * Removes non-breaking spaces and the "Mon DD, YYYY" date fragment that some
// * search providers glue onto the front of review snippets.

use crate::config::constants::MIN_DESCRIPTION_CHARS;

const NBSP: char = '\u{a0}';

/// Removes every non-breaking space character
pub fn remove_nbsp(text: &str) -> String {
    text.replace(NBSP, "")
}

/// Strips a known leading date prefix, returning the remainder.
///
/// Recognized shapes (character offsets, not bytes):
/// - `"Nov 12, 2023Great..."`: chars 8..12 are digits and char 12 is alphabetic
/// - `"Nov 5, 2023Great..."`: chars 7..11 are digits and char 11 is alphabetic
///
/// This is a fixed-offset heuristic tied to how the provider formats snippets,
/// not a date parser. Text that happens to match the offsets is cut the same
/// way, and dates followed by a separator (`"Nov 12, 2023 · Great"`) are left
/// alone. Strings of 14 characters or fewer are never touched.
pub fn strip_date_prefix(text: &str) -> &str {
    let head: Vec<(usize, char)> = text.char_indices().take(13).collect();
    if head.len() < 13 || text.chars().nth(MIN_DESCRIPTION_CHARS).is_none() {
        return text;
    }

    let all_digits = |from: usize, to: usize| head[from..to].iter().all(|(_, c)| c.is_ascii_digit());

    // * Two-digit day: "Mon DD, YYYY"
    if head[12].1.is_alphabetic() && all_digits(8, 12) {
        return &text[head[12].0..];
    }

    // * One-digit day: "Mon D, YYYY"
    if head[11].1.is_alphabetic() && all_digits(7, 11) {
        return &text[head[11].0..];
    }

    text
}

/// Full cleaning pass: NBSP removal, then date prefix stripping
pub fn clean_description(raw: &str) -> String {
    strip_date_prefix(&remove_nbsp(raw)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_digit_day_prefix() {
        assert_eq!(
            clean_description("Nov 12, 2023Great product overall"),
            "Great product overall"
        );
    }

    #[test]
    fn test_one_digit_day_prefix() {
        assert_eq!(
            clean_description("Nov 5, 2023Works as advertised"),
            "Works as advertised"
        );
    }

    #[test]
    fn test_nbsp_removed_before_offsets() {
        // * NBSP shifts the offsets until it is removed
        assert_eq!(
            clean_description("Nov\u{a0} 12, 2023Solid\u{a0}console"),
            "Solidconsole"
        );
    }

    #[test]
    fn test_separator_after_date_is_not_stripped() {
        let text = "Nov 12, 2023 · Great product";
        assert_eq!(clean_description(text), text);
    }

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(clean_description("Nov 1, 2023Ok"), "Nov 1, 2023Ok");
        assert_eq!(clean_description(""), "");
    }

    #[test]
    fn test_plain_text_untouched() {
        let text = "The controller feels great in the hand";
        assert_eq!(clean_description(text), text);
    }

    #[test]
    fn test_idempotent_on_cleaned_output() {
        for raw in [
            "Nov 12, 2023Great product overall",
            "Nov 5, 2023Works as advertised",
            "Battery life could be better\u{a0}though",
        ] {
            let once = clean_description(raw);
            assert_eq!(clean_description(&once), once);
        }
    }

    #[test]
    fn test_multibyte_characters_use_char_offsets() {
        assert_eq!(
            clean_description("Déc 12, 2023Très bon produit"),
            "Très bon produit"
        );
    }
}
