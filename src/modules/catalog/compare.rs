//! Ordering for loosely typed record fields.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A sortable field value. Absent fields are represented by `None` at the
/// call site.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

/// Total order over optional field values.
///
/// Two texts compare with [`collate`]. An absent value sorts after every
/// present one. Everything else compares numerically, with text coerced to a
/// number when it parses; pairs that cannot be ordered (unparseable text
/// against a number, NaN) compare equal.
pub fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(FieldValue::Text(a)), Some(FieldValue::Text(b))) => collate(a, b),
        (Some(a), Some(b)) => match (a.as_number(), b.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
    }
}

/// Case-insensitive, accent-aware text order.
///
/// Letters are first compared with accents stripped, so `"Éclair"` sorts
/// among the e's rather than after `"z"`. Texts that differ only in accents
/// are then ordered unaccented first. Case never matters.
pub fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
}

fn base_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    folded(text).filter(|c| !is_combining_mark(*c))
}

fn folded(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd().flat_map(char::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> FieldValue {
        FieldValue::from(value)
    }

    #[test]
    fn text_is_case_insensitive() {
        assert_eq!(
            compare_values(Some(&text("Banana")), Some(&text("apple"))),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(Some(&text("DUNE")), Some(&text("dune"))),
            Ordering::Equal
        );
    }

    #[test]
    fn accented_text_sorts_with_its_base_letter() {
        assert_eq!(
            compare_values(Some(&text("Éclair")), Some(&text("zebra"))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&text("Ångström")), Some(&text("Borges"))),
            Ordering::Less
        );
        assert_eq!(collate("ÉCLAIR", "éclair"), Ordering::Equal);
    }

    #[test]
    fn accents_only_break_ties() {
        assert_eq!(collate("resume", "résumé"), Ordering::Less);
        assert_eq!(collate("résumé", "resumes"), Ordering::Less);
        assert_eq!(collate("Gödel", "Godel"), Ordering::Greater);
    }

    #[test]
    fn absent_sorts_last() {
        let five = FieldValue::from(5i64);
        assert_eq!(compare_values(None, Some(&five)), Ordering::Greater);
        assert_eq!(compare_values(Some(&five), None), Ordering::Less);
        assert_eq!(compare_values(None, None), Ordering::Equal);
    }

    #[test]
    fn numbers_and_numeric_text() {
        let two = FieldValue::from(2i64);
        let ten = FieldValue::from(10i64);
        assert_eq!(compare_values(Some(&two), Some(&ten)), Ordering::Less);
        assert_eq!(compare_values(Some(&text("10")), Some(&two)), Ordering::Greater);
        assert_eq!(compare_values(Some(&text("abc")), Some(&two)), Ordering::Equal);

        let nan = FieldValue::from(f64::NAN);
        assert_eq!(compare_values(Some(&nan), Some(&two)), Ordering::Equal);
    }
}
