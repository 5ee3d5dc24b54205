#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]
//! A small book catalog that fills in missing book details from
//! [Open Library](https://openlibrary.org).
//!
//! Books are [`BookRecord`](record::BookRecord)s stored in a SQLite backed
//! [`Catalog`](catalog::Catalog). Saving a book that carries an Open Library id (a work id like
//! `OL45883W` or an edition id like `OL7353617M`) first looks up whatever the record is missing,
//! the title, authors, description, subjects, publication year and cover. Anything that cannot be
//! found is stored as a placeholder, so a save never fails because the network did.
//!
//! ```no_run
//! use shelf::record::BookRecord;
//!
//! # fn main() -> Result<(), shelf::Error> {
//! let catalog = shelf::open_catalog("shelf.db")?;
//! let mut book = BookRecord::with_external_id("OL45883W");
//! catalog.save(&mut book)?;
//! println!("{book}");
//! # Ok(())
//! # }
//! ```

mod api;
pub mod catalog;
pub mod config;
pub mod enrich;
mod error;
pub mod record;

use std::path::Path;

use log::trace;

pub use api::Client;
pub use error::{Error, ErrorKind};

use catalog::Catalog;
use config::ClientConfig;
use enrich::{Enricher, SearchHit};

/// Opens the catalog at `path`, enriching through the default Open Library API.
///
/// # Errors
///
/// An `Err` is returned when the HTTP client cannot be built or the database cannot be opened.
#[inline]
pub fn open_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, Error> {
    trace!("Open catalog at '{}'", path.as_ref().display());
    Catalog::open(path, Enricher::new(ClientConfig::default())?)
}

/// Searches Open Library for `query` using the default API.
///
/// # Errors
///
/// An `Err` is returned when the HTTP client cannot be built. A failed search is not an error
/// and gives no hits.
#[inline]
pub fn search(query: &str) -> Result<Vec<SearchHit>, Error> {
    trace!("Search Open Library for '{query}'");
    Ok(Enricher::new(ClientConfig::default())?.search(query))
}
