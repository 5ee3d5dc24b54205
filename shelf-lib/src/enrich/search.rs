use crate::{
    api::open_library::dto::SearchDoc,
    config::ClientConfig,
    record::{BookRecord, Field, DEFAULT_TITLE},
};

use super::{
    ident::key_id,
    merge::{first_cover, join_first},
};

const UNKNOWN_AUTHOR: &str = "Desconocido";
const GENERAL: &str = "General";

/// A cleaned up free-text search result, ready to be shown or imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Work id, e.g. `OL45883W`.
    pub external_id: String,
    /// Title of the work.
    pub title: String,
    /// Up to three authors, comma separated.
    pub author: String,
    /// Up to two subjects, comma separated.
    pub category: String,
    /// First publication year, `0` when unknown.
    pub publication_year: u32,
    /// Short generated description.
    pub description: String,
    /// Large cover image URL.
    pub cover_url: Option<String>,
}

impl SearchHit {
    pub(super) fn from_doc(doc: SearchDoc, config: &ClientConfig) -> Self {
        let year = doc.first_publish_year.unwrap_or(0);
        let description = if year == 0 {
            "Publicado en año desconocido".to_owned()
        } else {
            format!("Publicado en {year}")
        };

        Self {
            external_id: doc.key.as_deref().map(key_id).unwrap_or_default().to_owned(),
            title: doc.title.unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            author: join_first(&doc.author_name, 3).unwrap_or_else(|| UNKNOWN_AUTHOR.to_owned()),
            category: join_first(&doc.subject, 2).unwrap_or_else(|| GENERAL.to_owned()),
            publication_year: year,
            description,
            cover_url: doc
                .cover_i
                .and_then(|id| first_cover(&[id]))
                .map(|id| config.cover_url(id)),
        }
    }
}

/// Generated filler of a hit (unknown author, general category, a description for an unknown
/// year) is left out, so saving the record can still enrich those fields.
impl From<SearchHit> for BookRecord {
    fn from(hit: SearchHit) -> Self {
        let mut record = Self::with_title(&hit.title);
        record.author = Field::from_text(&hit.author, UNKNOWN_AUTHOR);
        record.category = Field::from_text(&hit.category, GENERAL);
        if hit.publication_year != 0 {
            record.description = Field::Set(hit.description);
        }
        record.publication_year = Field::from_year(hit.publication_year);
        record.set_external_id(&hit.external_id);
        record.cover_url = hit.cover_url;
        record
    }
}
