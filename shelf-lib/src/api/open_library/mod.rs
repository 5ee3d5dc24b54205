use log::{info, trace};

pub(crate) mod dto;

use dto::{AuthorData, EditionData, EditionsListing, SearchDoc, SearchResponse, WorkData};

use crate::{config::ClientConfig, Error, ErrorKind};

use super::Client;

const SEARCH_FIELDS: &str = "key,title,author_name,first_publish_year,cover_i,isbn,subject";

/// Typed access to the Open Library endpoints used for enrichment.
pub(crate) struct OpenLibrary<C> {
    client: C,
    config: ClientConfig,
}

impl<C: Client> OpenLibrary<C> {
    pub(crate) const fn new(client: C, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub(crate) const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) const fn client(&self) -> &C {
        &self.client
    }

    fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.config.api(path);
        trace!("GET {url}");
        self.client.get_json(&url)
    }

    /// `GET /works/{id}.json`, the returned work always carries the key it was fetched with.
    pub(crate) fn work(&self, id: &str) -> Result<WorkData, Error> {
        self.work_by_key(&format!("/works/{id}"))
    }

    /// Fetches a work by its full key, e.g. `/works/OL45883W`.
    pub(crate) fn work_by_key(&self, key: &str) -> Result<WorkData, Error> {
        let mut work: WorkData = self.get(&format!("{key}.json"))?;
        if work.key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            work.key = Some(key.to_owned());
        }
        Ok(work)
    }

    /// `GET /books/{id}.json`
    pub(crate) fn edition(&self, id: &str) -> Result<EditionData, Error> {
        self.get(&format!("/books/{id}.json"))
    }

    /// Display name of the author behind `key`, e.g. `/authors/OL34184A`.
    pub(crate) fn author_name(&self, key: &str) -> Result<String, Error> {
        let author: AuthorData = self.get(&format!("{key}.json"))?;
        author
            .name
            .or(author.personal_name)
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::new(ErrorKind::NoValue, format!("Author {key} has no name")))
    }

    /// Up to `limit` editions of the work behind `work_key`.
    pub(crate) fn editions(&self, work_key: &str, limit: usize) -> Result<Vec<EditionData>, Error> {
        let listing: EditionsListing = self.get(&format!("{work_key}/editions.json?limit={limit}"))?;
        trace!("{} editions listed for {work_key}", listing.entries.len());
        Ok(listing.entries)
    }

    /// Searches by title, and author when given.
    pub(crate) fn search_title(
        &self,
        title: &str,
        author: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SearchDoc>, Error> {
        info!("Searching Open Library for the title '{title}'");
        let mut path = format!("/search.json?title={}", urlencoding::encode(title));
        if let Some(author) = author {
            path.push_str("&author=");
            path.push_str(&urlencoding::encode(author));
        }
        path.push_str(&format!("&limit={limit}"));

        let SearchResponse { docs } = self.get(&path)?;
        Ok(docs)
    }

    /// Free text search returning the ten best matches.
    pub(crate) fn search_query(&self, query: &str) -> Result<Vec<SearchDoc>, Error> {
        info!("Searching Open Library for '{query}'");
        let path = format!(
            "/search.json?q={}&limit=10&fields={SEARCH_FIELDS}",
            urlencoding::encode(query)
        );

        let SearchResponse { docs } = self.get(&path)?;
        Ok(docs)
    }
}
