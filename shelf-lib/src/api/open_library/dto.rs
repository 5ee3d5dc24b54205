//! Response shapes of the Open Library JSON endpoints.
//!
//! Only the members used for enrichment are modelled, everything else in a payload is ignored.
//! Lists default to empty so that a missing member never fails a whole document.

use serde::{de::IgnoredAny, Deserialize};

/// A text member that Open Library sends either as a plain string or as a typed object
/// (`{"type": "/type/text", "value": "..."}`).
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub(crate) enum TextValue {
    Plain(String),
    Typed { value: String },
    Missing,
    Other(IgnoredAny),
}

impl Default for TextValue {
    fn default() -> Self {
        Self::Missing
    }
}

impl TextValue {
    /// The trimmed text, `None` when absent, blank or of an unknown shape.
    pub(crate) fn text(&self) -> Option<&str> {
        match self {
            Self::Plain(s) | Self::Typed { value: s } => {
                Some(s.trim()).filter(|s| !s.is_empty())
            }
            Self::Missing | Self::Other(_) => None,
        }
    }
}

/// A `{"key": "/authors/OL1A"}` style reference to another document.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct KeyRef {
    pub(crate) key: String,
}

/// Entry of a work's `authors` list, the reference itself is nested under `author`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct WorkAuthor {
    #[serde(default)]
    pub(crate) author: Option<KeyRef>,
}

/// `GET /works/{id}.json`
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub(crate) struct WorkData {
    #[serde(default)]
    pub(crate) key: Option<String>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: TextValue,
    #[serde(default)]
    pub(crate) authors: Vec<WorkAuthor>,
    #[serde(default)]
    pub(crate) subjects: Vec<String>,
    #[serde(default)]
    pub(crate) subject_places: Vec<String>,
    #[serde(default)]
    pub(crate) covers: Vec<i64>,
}

/// `GET /books/{id}.json`, also the shape of each entry of an editions listing.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub(crate) struct EditionData {
    #[serde(default)]
    pub(crate) key: Option<String>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: TextValue,
    #[serde(default)]
    pub(crate) notes: TextValue,
    #[serde(default)]
    pub(crate) works: Vec<KeyRef>,
    #[serde(default)]
    pub(crate) subjects: Vec<String>,
    #[serde(default)]
    pub(crate) publish_date: Option<String>,
    #[serde(default)]
    pub(crate) covers: Vec<i64>,
}

impl EditionData {
    /// Key of the first work this edition belongs to.
    pub(crate) fn work_key(&self) -> Option<&str> {
        self.works
            .first()
            .map(|w| w.key.trim())
            .filter(|k| !k.is_empty())
    }
}

/// `GET /authors/{id}.json`
#[derive(Deserialize, Debug, Default)]
pub(crate) struct AuthorData {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) personal_name: Option<String>,
}

/// `GET /works/{id}/editions.json`
#[derive(Deserialize, Debug, Default)]
pub(crate) struct EditionsListing {
    #[serde(default)]
    pub(crate) entries: Vec<EditionData>,
}

/// `GET /search.json`
#[derive(Deserialize, Debug, Default)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub(crate) docs: Vec<SearchDoc>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub(crate) struct SearchDoc {
    #[serde(default)]
    pub(crate) key: Option<String>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) author_name: Vec<String>,
    #[serde(default)]
    pub(crate) first_publish_year: Option<u32>,
    #[serde(default)]
    pub(crate) cover_i: Option<i64>,
    #[serde(default)]
    pub(crate) subject: Vec<String>,
    #[serde(default)]
    pub(crate) isbn: Vec<String>,
}
