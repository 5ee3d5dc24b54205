//! Auto-filling book records from Open Library.
//!
//! [`Enricher::resolve`] is the single entry point. A record with an external id is resolved
//! through the work (and edition) it names; a record with only a title is first matched with a
//! title search. Every request is allowed to fail: a failed request only means that the
//! matching rule yields nothing and the next fallback is tried.

use std::panic::{self, AssertUnwindSafe};

use log::{error, info, trace, warn};

mod ident;
mod merge;
mod search;
mod year;

pub use ident::{classify, IdKind};
pub use search::SearchHit;

use merge::{first_cover, join_first, Merge};

use crate::{
    api::{
        open_library::{
            dto::{EditionData, WorkData},
            OpenLibrary,
        },
        Client,
    },
    config::ClientConfig,
    record::BookRecord,
    Error,
};

/// Fills book records with data from Open Library.
///
/// The enricher is generic over the [`Client`] doing the requests, production code uses
/// [`reqwest::blocking::Client`] through [`Enricher::new`].
pub struct Enricher<C = reqwest::blocking::Client> {
    api: OpenLibrary<C>,
}

impl Enricher<reqwest::blocking::Client> {
    /// Creates an enricher doing real HTTP requests.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let client = config.http_client()?;
        Ok(Self::with_client(client, config))
    }
}

impl<C: Client> Enricher<C> {
    /// Creates an enricher using the given client for every request.
    pub const fn with_client(client: C, config: ClientConfig) -> Self {
        Self {
            api: OpenLibrary::new(client, config),
        }
    }

    /// The configuration requests are made with.
    pub const fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    #[cfg(test)]
    pub(crate) const fn client(&self) -> &C {
        self.api.client()
    }

    /// Fills the gaps of `record` from Open Library.
    ///
    /// Returns true when external data was found and applied. Fields holding a real value are
    /// never changed. Nothing escapes this call: failed requests, unexpected payloads and even a
    /// panic while resolving all end in `false`.
    pub fn resolve(&self, record: &mut BookRecord) -> bool {
        match panic::catch_unwind(AssertUnwindSafe(|| self.try_resolve(record))) {
            Ok(found) => found,
            Err(_) => {
                error!("Resolving '{}' panicked - treating it as not found", record);
                false
            }
        }
    }

    fn try_resolve(&self, record: &mut BookRecord) -> bool {
        if let Some(id) = record.external_id().map(ToOwned::to_owned) {
            self.resolve_by_id(&id, record)
        } else if let Some(title) = record.title.value().cloned() {
            self.resolve_by_title(&title, record)
        } else {
            trace!("No external id and no title - nothing to resolve");
            false
        }
    }

    fn resolve_by_id(&self, id: &str, record: &mut BookRecord) -> bool {
        let id = ident::key_id(id);
        let kind = classify(id);
        info!("Resolving external id '{id}' ({kind:?})");

        let mut edition = None;
        let mut work = None;

        if kind.edition {
            let (found_edition, found_work) = self.fetch_edition(id);
            edition = found_edition;
            work = found_work;
        }

        if work.is_none() {
            work = self.fetch_work(id);
        }

        if let Some(work) = work {
            Merge::new(&self.api, &work, edition.as_ref()).apply(record);
            info!("Applied Open Library data to '{record}'");
            true
        } else {
            info!("No work found for '{id}'");
            false
        }
    }

    /// The edition behind `id` and, when it links one, its parent work.
    fn fetch_edition(&self, id: &str) -> (Option<EditionData>, Option<WorkData>) {
        let edition_id = ident::edition_form(id).unwrap_or_else(|| id.to_owned());
        let edition = match self.api.edition(&edition_id) {
            Ok(edition) => edition,
            Err(e) => {
                warn!("Cannot fetch edition {edition_id}: {e}");
                return (None, None);
            }
        };

        let work = edition.work_key().and_then(|key| {
            trace!("Edition {edition_id} belongs to {key}");
            self.api
                .work_by_key(key)
                .map_err(|e| warn!("Cannot fetch work {key}: {e}"))
                .ok()
        });

        (Some(edition), work)
    }

    /// The work behind `id`, trying the `OL{digits}W` form before the id as given.
    fn fetch_work(&self, id: &str) -> Option<WorkData> {
        let formatted = ident::work_form(id);
        if let Some(formatted) = &formatted {
            match self.api.work(formatted) {
                Ok(work) => return Some(work),
                Err(e) => warn!("Cannot fetch work {formatted}: {e}"),
            }
        }

        if formatted.as_deref() == Some(id) {
            return None;
        }

        trace!("Retrying the work lookup with '{id}' as given");
        self.api
            .work(id)
            .map_err(|e| warn!("Cannot fetch work {id}: {e}"))
            .ok()
    }

    fn resolve_by_title(&self, title: &str, record: &mut BookRecord) -> bool {
        let doc = match self.api.search_title(title, None, 1) {
            Ok(docs) => docs.into_iter().next(),
            Err(e) => {
                warn!("Title search for '{title}' failed: {e}");
                None
            }
        };

        let doc = if let Some(doc) = doc {
            doc
        } else {
            info!("No search results for '{title}'");
            return false;
        };

        let id = doc
            .key
            .as_deref()
            .map(ident::key_id)
            .filter(|id| !id.is_empty())
            .map(ToOwned::to_owned);

        record.author.fill_with(|| join_first(&doc.author_name, 3));
        if let Some(year) = doc.first_publish_year.filter(|y| *y > 0) {
            record.publication_year.fill(year);
        }
        record.category.fill_with(|| join_first(&doc.subject, 2));
        if record.cover_url.is_none() {
            record.cover_url = doc
                .cover_i
                .and_then(|c| first_cover(&[c]))
                .map(|c| self.config().cover_url(c));
        }

        if let Some(id) = id {
            info!("'{title}' matched {id}");
            record.external_id = Some(id);
            if !self.try_resolve(record) {
                info!("Keeping the search data only, the matched work could not be fetched");
            }
        }

        true
    }

    /// Cover to show for `record`, without storing anything.
    ///
    /// The record's own cover wins, otherwise the best title (and author) match is looked up.
    pub fn cover_url(&self, record: &BookRecord) -> Option<String> {
        if let Some(url) = record.cover_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Some(url.to_owned());
        }

        let title = record.title.value()?;
        let author = record.author.value().map(String::as_str);
        match self.api.search_title(title, author, 1) {
            Ok(docs) => docs
                .first()
                .and_then(|doc| doc.cover_i)
                .and_then(|c| first_cover(&[c]))
                .map(|c| self.config().cover_url(c)),
            Err(e) => {
                warn!("Cover lookup for '{title}' failed: {e}");
                None
            }
        }
    }

    /// Free-text search of Open Library, the ten best matches.
    ///
    /// An empty query or a failed request gives no hits.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.api.search_query(query) {
            Ok(docs) => docs
                .into_iter()
                .map(|doc| SearchHit::from_doc(doc, self.config()))
                .collect(),
            Err(e) => {
                warn!("Search for '{query}' failed: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests;
