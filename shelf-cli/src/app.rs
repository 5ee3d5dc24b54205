use std::path::PathBuf;

use eyre::{eyre, WrapErr};
use log::trace;
use serde_json::{json, Value};
use shelf::{catalog::Catalog, config::ClientConfig, enrich::Enricher, record::BookRecord};

/// Where the catalog lives and how Open Library is reached.
pub struct App {
    db: PathBuf,
    config: ClientConfig,
}

impl App {
    pub const fn new(db: PathBuf, config: ClientConfig) -> Self {
        Self { db, config }
    }

    pub fn enricher(&self) -> eyre::Result<Enricher> {
        Enricher::new(self.config.clone()).wrap_err("Cannot set up the Open Library client")
    }

    pub fn catalog(&self) -> eyre::Result<Catalog> {
        trace!("Opening the catalog at {}", self.db.display());
        Catalog::open(&self.db, self.enricher()?)
            .wrap_err_with(|| format!("Cannot open the catalog at '{}'", self.db.display()))
    }
}

pub fn book_or_missing(book: Option<BookRecord>, id: i64) -> eyre::Result<BookRecord> {
    book.ok_or_else(|| eyre!("No book found with the id of {id}"))
}

/// One line summary, e.g. `[3] Fantastic Mr Fox (1970) - Roald Dahl`.
pub fn summary(record: &BookRecord) -> String {
    let id = record
        .id
        .map_or_else(|| "-".to_owned(), |id| id.to_string());
    format!("[{id}] {record} - {}", record.author_text())
}

/// Every detail of a record, one per line.
pub fn details(record: &BookRecord, cover: Option<&str>, favorite: bool) -> String {
    format!(
        "{}{}\nCategory:     {}\nOpen Library: {}\nCover:        {}\n\n{}",
        summary(record),
        if favorite { " *" } else { "" },
        record.category_text(),
        record.external_id().unwrap_or("-"),
        cover.unwrap_or("-"),
        record.description_text(),
    )
}

pub fn to_json(record: &BookRecord) -> Value {
    json!({
        "id": record.id,
        "title": record.title_text(),
        "author": record.author_text(),
        "description": record.description_text(),
        "category": record.category_text(),
        "publication_year": record.year(),
        "external_id": record.external_id(),
        "cover_url": record.cover_url,
        "created_at": record.created_at.map(|d| d.to_rfc3339()),
        "updated_at": record.updated_at.map(|d| d.to_rfc3339()),
    })
}
