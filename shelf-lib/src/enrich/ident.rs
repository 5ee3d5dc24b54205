//! Open Library identifier handling.

/// What an external id looks like it refers to.
///
/// Classification is a case-insensitive containment test, so an id may look like both an
/// edition and a work, or like neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdKind {
    /// The id contains an `M`.
    pub edition: bool,
    /// The id contains a `W`.
    pub work: bool,
}

/// Classifies an external id.
///
/// # Examples
///
/// ```
/// use shelf::enrich::{classify, IdKind};
///
/// assert_eq!(IdKind { edition: true, work: false }, classify("ol7353617m"));
/// assert_eq!(IdKind { edition: false, work: true }, classify("OL45883W"));
/// ```
#[must_use]
pub fn classify(id: &str) -> IdKind {
    let id = id.to_uppercase();
    IdKind {
        edition: id.contains('M'),
        work: id.contains('W'),
    }
}

fn digits(id: &str) -> Option<String> {
    let digits: String = id.chars().filter(char::is_ascii_digit).collect();
    Some(digits).filter(|d| !d.is_empty())
}

/// `OL{digits}M`, `None` when the id has no digits.
pub(crate) fn edition_form(id: &str) -> Option<String> {
    digits(id).map(|d| format!("OL{d}M"))
}

/// `OL{digits}W`, `None` when the id has no digits.
pub(crate) fn work_form(id: &str) -> Option<String> {
    digits(id).map(|d| format!("OL{d}W"))
}

/// Last segment of a key such as `/works/OL45883W`.
pub(crate) fn key_id(key: &str) -> &str {
    key.trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}
