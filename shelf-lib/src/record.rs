//! The catalog's book record.
//!
//! Required fields never hold a made-up value: a field is either [`Field::Empty`], a real
//! [`Field::Set`] value, or an explicit [`Field::Placeholder`]. The placeholder texts below are
//! only used when a placeholder has to be shown.

use std::fmt;

use chrono::{DateTime, Utc};

/// Shown for a title placeholder.
pub const DEFAULT_TITLE: &str = "Sin título";
/// Shown for an author placeholder.
pub const DEFAULT_AUTHOR: &str = "Autor desconocido";
/// Shown for a description placeholder.
pub const DEFAULT_DESCRIPTION: &str = "Sin descripción disponible";
/// Shown for a category placeholder.
pub const DEFAULT_CATEGORY: &str = "General";
/// Shown for a publication year placeholder.
pub const DEFAULT_YEAR: u32 = 2000;

/// A required value of a [`BookRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    /// Nothing is known yet.
    Empty,
    /// A real value, never overwritten by enrichment.
    Set(T),
    /// Nothing could be found and the record was saved, the default is in effect.
    Placeholder,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<T> Field<T> {
    /// The real value, `None` for empty fields and placeholders.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Empty | Self::Placeholder => None,
        }
    }

    /// Returns true when the field holds a real value.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// Returns true when the field holds the placeholder.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    /// Sets `value` unless a real value is already present.
    ///
    /// Returns true when the value was taken.
    pub fn fill(&mut self, value: T) -> bool {
        if self.is_set() {
            false
        } else {
            *self = Self::Set(value);
            true
        }
    }

    /// Like [`Field::fill`] but only computes the value when the field needs one.
    pub fn fill_with<F>(&mut self, f: F) -> bool
    where
        F: FnOnce() -> Option<T>,
    {
        if self.is_set() {
            return false;
        }
        f().map_or(false, |value| self.fill(value))
    }

    /// Turns an empty field into a placeholder.
    pub fn finalize(&mut self) {
        if matches!(self, Self::Empty) {
            *self = Self::Placeholder;
        }
    }

    /// The real value or `default` for empty fields and placeholders.
    pub fn or<'a>(&'a self, default: &'a T) -> &'a T {
        self.value().unwrap_or(default)
    }
}

impl Field<String> {
    /// Reads user or stored text.
    ///
    /// Blank text is [`Field::Empty`] and text equal to the `placeholder` text is
    /// [`Field::Placeholder`], so records written with placeholder strings stay recognisable.
    #[must_use]
    pub fn from_text(text: &str, placeholder: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            Self::Empty
        } else if text == placeholder {
            Self::Placeholder
        } else {
            Self::Set(text.to_owned())
        }
    }

    /// The text to show, the placeholder text when no real value is present.
    #[must_use]
    pub fn text_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.value().map_or(placeholder, String::as_str)
    }
}

impl Field<u32> {
    /// Reads a year, `0` is treated as unknown.
    #[must_use]
    pub const fn from_year(year: u32) -> Self {
        if year == 0 {
            Self::Empty
        } else {
            Self::Set(year)
        }
    }
}

/// A book of the catalog, possibly only partially filled in.
///
/// # Examples
///
/// ```
/// use shelf::record::{BookRecord, Field, DEFAULT_AUTHOR};
///
/// let mut record = BookRecord::with_title("Fantastic Mr Fox");
/// assert!(record.needs_enrichment());
///
/// record.finalize();
/// assert_eq!(Field::Placeholder, record.author);
/// assert_eq!(DEFAULT_AUTHOR, record.author_text());
/// assert_eq!("Fantastic Mr Fox (2000)", record.to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookRecord {
    /// Catalog id, `None` until stored.
    pub id: Option<i64>,
    /// Title of the book.
    pub title: Field<String>,
    /// Authors, comma separated.
    pub author: Field<String>,
    /// Short description of the contents.
    pub description: Field<String>,
    /// Category or genre.
    pub category: Field<String>,
    /// Year of publication.
    pub publication_year: Field<u32>,
    /// Open Library work or edition id, e.g. `OL45883W`.
    pub external_id: Option<String>,
    /// Cover image URL.
    pub cover_url: Option<String>,
    /// When the record was first stored.
    pub created_at: Option<DateTime<Utc>>,
    /// When the record was last stored.
    pub updated_at: Option<DateTime<Utc>>,
}

impl BookRecord {
    /// An empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty record with only a title.
    #[must_use]
    pub fn with_title<S: AsRef<str>>(title: S) -> Self {
        Self {
            title: Field::from_text(title.as_ref(), DEFAULT_TITLE),
            ..Self::default()
        }
    }

    /// An empty record with only an external id.
    #[must_use]
    pub fn with_external_id<S: AsRef<str>>(id: S) -> Self {
        let mut record = Self::default();
        record.set_external_id(id.as_ref());
        record
    }

    /// Sets the external id, blank text clears it.
    pub fn set_external_id(&mut self, id: &str) {
        self.external_id = Some(id.trim().to_owned()).filter(|id| !id.is_empty());
    }

    /// Sets the cover URL, blank text clears it.
    pub fn set_cover_url(&mut self, url: &str) {
        self.cover_url = Some(url.trim().to_owned()).filter(|url| !url.is_empty());
    }

    /// The external id when one is present.
    #[must_use]
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    /// Returns true when any required field lacks a real value.
    #[must_use]
    pub const fn needs_enrichment(&self) -> bool {
        !(self.title.is_set()
            && self.author.is_set()
            && self.description.is_set()
            && self.category.is_set()
            && self.publication_year.is_set())
    }

    /// Marks every empty required field as a placeholder.
    ///
    /// Must run right before the record is stored, whatever enrichment did.
    pub fn finalize(&mut self) {
        self.title.finalize();
        self.author.finalize();
        self.description.finalize();
        self.category.finalize();
        self.publication_year.finalize();
    }

    /// Title to show.
    #[must_use]
    pub fn title_text(&self) -> &str {
        self.title.text_or(DEFAULT_TITLE)
    }

    /// Author to show.
    #[must_use]
    pub fn author_text(&self) -> &str {
        self.author.text_or(DEFAULT_AUTHOR)
    }

    /// Description to show.
    #[must_use]
    pub fn description_text(&self) -> &str {
        self.description.text_or(DEFAULT_DESCRIPTION)
    }

    /// Category to show.
    #[must_use]
    pub fn category_text(&self) -> &str {
        self.category.text_or(DEFAULT_CATEGORY)
    }

    /// Publication year to show.
    #[must_use]
    pub fn year(&self) -> u32 {
        *self.publication_year.or(&DEFAULT_YEAR)
    }
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title_text(), self.year())
    }
}
