use log::{trace, warn};

use crate::{
    api::{
        open_library::{
            dto::{EditionData, WorkData},
            OpenLibrary,
        },
        Client,
    },
    record::BookRecord,
};

use super::year::extract_year;

const MAX_AUTHORS: usize = 3;
const MAX_SUBJECTS: usize = 2;
const LISTING_LIMIT: usize = 50;

/// Joins at most `max` non-blank values with `", "`.
pub(crate) fn join_first(values: &[String], max: usize) -> Option<String> {
    let joined = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .take(max)
        .collect::<Vec<_>>()
        .join(", ");

    Some(joined).filter(|j| !j.is_empty())
}

pub(crate) fn first_cover(covers: &[i64]) -> Option<i64> {
    covers.iter().copied().find(|id| *id > 0)
}

fn non_blank(text: Option<&String>) -> Option<String> {
    text.map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
}

/// Fills the gaps of a record from a fetched work and, when there is one, the edition the
/// record's id pointed at.
///
/// Every rule is only evaluated for a field without a real value, so no request is made for
/// data that would be thrown away.
pub(super) struct Merge<'a, C> {
    api: &'a OpenLibrary<C>,
    work: &'a WorkData,
    edition: Option<&'a EditionData>,
    // editions of the work, fetched once for both the year and the cover rule
    listing: Option<Vec<EditionData>>,
}

impl<'a, C: Client> Merge<'a, C> {
    pub(super) const fn new(
        api: &'a OpenLibrary<C>,
        work: &'a WorkData,
        edition: Option<&'a EditionData>,
    ) -> Self {
        Self {
            api,
            work,
            edition,
            listing: None,
        }
    }

    pub(super) fn apply(mut self, record: &mut BookRecord) {
        record.title.fill_with(|| self.title());
        record.author.fill_with(|| self.author());
        record.description.fill_with(|| self.description());
        record.category.fill_with(|| self.category());
        record.publication_year.fill_with(|| self.year());

        if record.cover_url.is_none() {
            let cover_id = self.cover_id();
            record.cover_url = cover_id.map(|id| self.api.config().cover_url(id));
        }
    }

    fn title(&self) -> Option<String> {
        non_blank(self.work.title.as_ref())
            .or_else(|| self.edition.and_then(|e| non_blank(e.title.as_ref())))
    }

    fn author(&self) -> Option<String> {
        let names = self
            .work
            .authors
            .iter()
            .take(MAX_AUTHORS)
            .filter_map(|a| a.author.as_ref())
            .filter_map(|a| match self.api.author_name(&a.key) {
                Ok(name) => Some(name),
                Err(e) => {
                    warn!("Skipping author {}: {e}", a.key);
                    None
                }
            })
            .collect::<Vec<_>>();

        Some(names.join(", ")).filter(|n| !n.is_empty())
    }

    fn description(&self) -> Option<String> {
        if let Some(text) = self.work.description.text() {
            return Some(text.to_owned());
        }
        if let Some(text) = self.edition.and_then(|e| e.description.text()) {
            return Some(text.to_owned());
        }

        trace!("No description on the work or edition - trying the first listed edition");
        let key = self.work.key.as_deref()?;
        match self.api.editions(key, 1) {
            Ok(entries) => entries.first().and_then(|e| {
                e.description
                    .text()
                    .or_else(|| e.notes.text())
                    .map(ToOwned::to_owned)
            }),
            Err(e) => {
                warn!("Cannot list the first edition of {key}: {e}");
                None
            }
        }
    }

    fn category(&self) -> Option<String> {
        join_first(&self.work.subjects, MAX_SUBJECTS)
            .or_else(|| self.edition.and_then(|e| join_first(&e.subjects, MAX_SUBJECTS)))
            .or_else(|| join_first(&self.work.subject_places, MAX_SUBJECTS))
    }

    fn year(&mut self) -> Option<u32> {
        if let Some(year) = self
            .edition
            .and_then(|e| e.publish_date.as_deref())
            .and_then(extract_year)
        {
            return Some(year);
        }

        trace!("No edition year - using the oldest listed edition");
        self.listing()
            .iter()
            .filter_map(|e| e.publish_date.as_deref().and_then(extract_year))
            .min()
    }

    fn cover_id(&mut self) -> Option<i64> {
        if let Some(id) = self.edition.and_then(|e| first_cover(&e.covers)) {
            return Some(id);
        }

        let mut dated = self
            .listing()
            .iter()
            .filter_map(|e| {
                let year = e.publish_date.as_deref().and_then(extract_year).unwrap_or(0);
                first_cover(&e.covers).map(|id| (year, id))
            })
            .collect::<Vec<_>>();
        // stable, so editions sharing a year keep the listing order
        dated.sort_by(|a, b| b.0.cmp(&a.0));

        dated
            .first()
            .map(|(_, id)| *id)
            .or_else(|| first_cover(&self.work.covers))
    }

    fn listing(&mut self) -> &[EditionData] {
        if self.listing.is_none() {
            let entries = match self.work.key.as_deref() {
                Some(key) => self.api.editions(key, LISTING_LIMIT).unwrap_or_else(|e| {
                    warn!("Cannot list the editions of {key}: {e}");
                    Vec::new()
                }),
                None => Vec::new(),
            };
            self.listing = Some(entries);
        }
        self.listing.as_deref().unwrap_or_default()
    }
}
