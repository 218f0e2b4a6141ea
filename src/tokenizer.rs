use crate::categories::normalize_label;
use crate::machine::parse_amount;
use crate::models::{MainCategory, ParsedHints};

/// Filler words that never name a sub-category.
const STOP_WORDS: &[&str] = &["spent", "saved", "on", "for"];

/// Pull amount, main category and sub-category candidates out of a
/// lower-cased message such as "500 needs food" or "spent 40 on coffee wants".
///
/// Later tokens win over earlier ones. Digits are always read as an amount,
/// so main categories are only recognised here by name.
pub fn parse_hints(msg: &str, directory: &[MainCategory]) -> ParsedHints {
    let mut hints = ParsedHints::default();

    for token in msg.split_whitespace() {
        if token.bytes().all(|b| b.is_ascii_digit()) {
            if let Some(amount) = parse_amount(token) {
                hints.amount = Some(amount);
            }
            continue;
        }

        if let Some(cat) = directory.iter().find(|c| c.name.eq_ignore_ascii_case(token)) {
            hints.main_category = Some(cat.id);
            continue;
        }

        if token.chars().all(char::is_alphabetic) && !STOP_WORDS.contains(&token) {
            hints.sub_category = Some(normalize_label(token));
        }
    }

    hints
}
