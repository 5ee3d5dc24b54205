//! Local book catalog stored in SQLite.
//!
//! Every write goes through [`Catalog::save`], which fills the gaps of a record from Open Library
//! when it carries an external id and then marks whatever is still missing as a placeholder.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use log::{info, trace, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};

mod favorites;

pub use favorites::FavoriteToggle;

use crate::{
    api::Client,
    enrich::Enricher,
    record::{
        BookRecord, Field, DEFAULT_AUTHOR, DEFAULT_CATEGORY, DEFAULT_DESCRIPTION, DEFAULT_TITLE,
    },
    Error, ErrorKind,
};

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT,
        author TEXT,
        description TEXT,
        category TEXT,
        publication_year INTEGER,
        external_id TEXT,
        cover_url TEXT,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS favorites (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user TEXT NOT NULL,
        book_id INTEGER NOT NULL,
        added_at INTEGER NOT NULL,
        UNIQUE (user, book_id),
        FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
    );
";

const BOOK_COLUMNS: &str = "b.id, b.title, b.author, b.description, b.category, \
    b.publication_year, b.external_id, b.cover_url, b.created_at, b.updated_at";

/// A catalog of books, enriched on save.
pub struct Catalog<C = reqwest::blocking::Client> {
    conn: Connection,
    enricher: Enricher<C>,
}

impl<C: Client> Catalog<C> {
    /// Opens (or creates) the catalog database at `path`.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::Storage`] is returned when the database cannot be opened
    /// or its tables cannot be created.
    pub fn open<P: AsRef<Path>>(path: P, enricher: Enricher<C>) -> Result<Self, Error> {
        let path = path.as_ref();
        trace!("Opening catalog at {}", path.display());
        let conn = Connection::open(path).map_err(|e| {
            Error::wrap_with(
                ErrorKind::Storage,
                e,
                format!("Cannot open {}", path.display()),
            )
        })?;
        Self::init(conn, enricher)
    }

    /// Opens an empty catalog that lives only as long as the returned value.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::Storage`] is returned when the tables cannot be created.
    pub fn open_in_memory(enricher: Enricher<C>) -> Result<Self, Error> {
        Self::init(Connection::open_in_memory()?, enricher)
    }

    fn init(conn: Connection, enricher: Enricher<C>) -> Result<Self, Error> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, enricher })
    }

    /// The enricher used when saving.
    pub const fn enricher(&self) -> &Enricher<C> {
        &self.enricher
    }

    /// Stores `record`, inserting it when it has no id and updating it otherwise.
    ///
    /// A record with an external id and a required field without a real value is resolved
    /// against Open Library first. Enrichment never prevents the save: whatever is still missing
    /// afterwards is stored as a placeholder. `record` is updated in place to what was stored and
    /// its id is returned.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::Storage`] is returned when the database write fails and of
    /// kind [`ErrorKind::NoValue`] when the record's id is not in the catalog.
    pub fn save(&self, record: &mut BookRecord) -> Result<i64, Error> {
        if record.external_id().is_some() && record.needs_enrichment() {
            if !self.enricher.resolve(record) {
                info!("Nothing found for '{record}', saving it as it is");
            }
        } else {
            trace!("'{record}' needs no enrichment");
        }

        self.write(record)
    }

    fn write(&self, record: &mut BookRecord) -> Result<i64, Error> {
        record.finalize();
        let now = Utc::now();
        let millis = now.timestamp_millis();

        let id = if let Some(id) = record.id {
            let changed = self.conn.execute(
                "UPDATE books SET title = ?1, author = ?2, description = ?3, category = ?4,
                    publication_year = ?5, external_id = ?6, cover_url = ?7, updated_at = ?8
                 WHERE id = ?9",
                params![
                    record.title.value(),
                    record.author.value(),
                    record.description.value(),
                    record.category.value(),
                    record.publication_year.value(),
                    record.external_id,
                    record.cover_url,
                    millis,
                    id,
                ],
            )?;
            if changed == 0 {
                return Err(Error::new(
                    ErrorKind::NoValue,
                    format!("No book with id {id} to update"),
                ));
            }
            id
        } else {
            self.conn.execute(
                "INSERT INTO books (title, author, description, category, publication_year,
                    external_id, cover_url, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                params![
                    record.title.value(),
                    record.author.value(),
                    record.description.value(),
                    record.category.value(),
                    record.publication_year.value(),
                    record.external_id,
                    record.cover_url,
                    millis,
                ],
            )?;
            record.created_at = Some(now);
            self.conn.last_insert_rowid()
        };

        record.id = Some(id);
        record.updated_at = Some(now);
        info!("Saved book {id}: '{record}'");
        Ok(id)
    }

    /// The book stored under `id`.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::Storage`] is returned when the query fails.
    pub fn get(&self, id: i64) -> Result<Option<BookRecord>, Error> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {BOOK_COLUMNS} FROM books b WHERE b.id = ?1"),
                params![id],
                book_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Every book, newest first.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::Storage`] is returned when the query fails.
    pub fn list(&self) -> Result<Vec<BookRecord>, Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BOOK_COLUMNS} FROM books b ORDER BY b.created_at DESC, b.id DESC"
        ))?;
        let books = stmt
            .query_map([], book_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    /// Deletes the book stored under `id` along with its favorites.
    ///
    /// Returns false when there was no such book.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::Storage`] is returned when the delete fails.
    pub fn delete(&self, id: i64) -> Result<bool, Error> {
        let removed = self.conn.execute("DELETE FROM books WHERE id = ?1", params![id])?;
        if removed > 0 {
            info!("Deleted book {id}");
        }
        Ok(removed > 0)
    }

    /// Resolves the given books again and stores those that found external data.
    ///
    /// Unknown ids are skipped. Returns the number of books updated.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::Storage`] is returned when reading or writing a book
    /// fails.
    pub fn refresh(&self, ids: &[i64]) -> Result<usize, Error> {
        let mut updated = 0;
        for &id in ids {
            let mut record = match self.get(id)? {
                Some(record) => record,
                None => {
                    warn!("Skipping refresh of unknown book {id}");
                    continue;
                }
            };

            if self.enricher.resolve(&mut record) {
                self.write(&mut record)?;
                updated += 1;
            } else {
                info!("No external data for book {id}");
            }
        }

        info!("Refreshed {updated} of {} books", ids.len());
        Ok(updated)
    }

    /// Cover to show for `record`, see [`Enricher::cover_url`].
    pub fn cover_url(&self, record: &BookRecord) -> Option<String> {
        self.enricher.cover_url(record)
    }
}

fn timestamp(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Reads a stored book, columns in the order of [`BOOK_COLUMNS`].
///
/// Stored records are always finalized so a NULL field is a placeholder.
fn book_from_row(row: &Row<'_>) -> rusqlite::Result<BookRecord> {
    let text = |idx: usize, placeholder: &str| -> rusqlite::Result<Field<String>> {
        let value: Option<String> = row.get(idx)?;
        Ok(Field::from_text(value.as_deref().unwrap_or_default(), placeholder))
    };

    let mut record = BookRecord {
        id: row.get(0)?,
        title: text(1, DEFAULT_TITLE)?,
        author: text(2, DEFAULT_AUTHOR)?,
        description: text(3, DEFAULT_DESCRIPTION)?,
        category: text(4, DEFAULT_CATEGORY)?,
        publication_year: Field::from_year(row.get::<_, Option<u32>>(5)?.unwrap_or(0)),
        external_id: row.get(6)?,
        cover_url: row.get(7)?,
        created_at: timestamp(row.get(8)?),
        updated_at: timestamp(row.get(9)?),
    };
    record.finalize();
    Ok(record)
}
