use super::{Enricher, SearchHit};
use crate::{
    api::{assert_requested, ol, Client, MockClient},
    config::ClientConfig,
    record::{BookRecord, Field},
    Error, ErrorKind,
};

const WORK_JSON: &str = include_str!("../../tests/data/work_OL45883W.json");
const EDITION_JSON: &str = include_str!("../../tests/data/edition_OL7353617M.json");
const EDITIONS_JSON: &str = include_str!("../../tests/data/editions_OL45883W.json");
const FIRST_EDITION_JSON: &str = include_str!("../../tests/data/editions_OL45883W_first.json");
const DAHL_JSON: &str = include_str!("../../tests/data/author_OL34184A.json");
const BLAKE_JSON: &str = include_str!("../../tests/data/author_OL2622837A.json");
const SEARCH_TITLE_JSON: &str = include_str!("../../tests/data/search_title.json");
const SEARCH_QUERY_JSON: &str = include_str!("../../tests/data/search_query.json");
const SEARCH_EMPTY_JSON: &str = include_str!("../../tests/data/search_empty.json");

const SEARCH_FOX: &str = "/search.json?title=Fantastic%20Mr%20Fox&limit=1";

fn enricher(client: MockClient) -> Enricher<MockClient> {
    Enricher::with_client(client, ClientConfig::default())
}

fn cover(id: i64) -> Option<String> {
    Some(format!("https://covers.openlibrary.org/b/id/{id}-L.jpg"))
}

/// Everything needed to resolve the Fantastic Mr Fox work and its authors.
fn fox_work() -> MockClient {
    MockClient::new()
        .route(ol("/works/OL45883W.json"), WORK_JSON)
        .route(ol("/authors/OL34184A.json"), DAHL_JSON)
        .route(ol("/authors/OL2622837A.json"), BLAKE_JSON)
}

fn complete_record() -> BookRecord {
    BookRecord {
        title: Field::Set("My Fox".to_owned()),
        author: Field::Set("Someone".to_owned()),
        description: Field::Set("Mine.".to_owned()),
        category: Field::Set("Favourites".to_owned()),
        publication_year: Field::Set(1999),
        cover_url: Some("https://example.org/fox.jpg".to_owned()),
        ..BookRecord::with_external_id("OL45883W")
    }
}

#[test]
fn edition_id_merges_edition_and_parent_work() {
    let enricher = enricher(
        fox_work()
            .route(ol("/books/OL7353617M.json"), EDITION_JSON)
            .route(ol("/works/OL45883W/editions.json?limit=50"), EDITIONS_JSON),
    );
    let mut record = BookRecord::with_external_id("OL7353617M");

    assert!(enricher.resolve(&mut record));

    assert_eq!(Field::Set("Fantastic Mr Fox".to_owned()), record.title);
    assert_eq!(Field::Set("Roald Dahl, Quentin Blake".to_owned()), record.author);
    assert!(record
        .description
        .value()
        .unwrap()
        .starts_with("The main character of Fantastic Mr. Fox"));
    assert_eq!(Field::Set("Animals, Hunger".to_owned()), record.category);
    assert_eq!(Field::Set(1988), record.publication_year);
    // edition cover wins over the newer (222) and older (333) listed editions
    assert_eq!(cover(111), record.cover_url);
    assert_eq!(Some("OL7353617M"), record.external_id());
    assert_eq!(0, enricher.api.client().count(&ol("/works/OL45883W/editions.json")));
}

#[test]
fn failed_edition_still_resolves_through_the_work() {
    let enricher = enricher(
        fox_work().route(ol("/works/OL45883W/editions.json?limit=50"), EDITIONS_JSON),
    );
    let mut record = BookRecord::with_external_id("OL45883M");

    assert!(enricher.resolve(&mut record));

    assert_requested!(enricher.api.client(), ol("/books/OL45883M.json"));
    assert_requested!(enricher.api.client(), ol("/works/OL45883W.json"));
    assert_eq!(Field::Set("Fantastic Mr Fox".to_owned()), record.title);
    // oldest listed edition
    assert_eq!(Field::Set(1974), record.publication_year);
    // newest listed edition with a cover, 2016 has none
    assert_eq!(cover(222), record.cover_url);
    assert_eq!(
        1,
        enricher.api.client().count(&ol("/works/OL45883W/editions.json")),
        "the listing is shared by the year and cover rules"
    );
}

#[test]
fn unknown_years_sort_last_for_covers() {
    let listing = r#"{"entries": [
        {"publish_date": "n.d.", "covers": [444]},
        {"publish_date": "1974", "covers": [333]}
    ]}"#;
    let enricher = enricher(
        fox_work().route(ol("/works/OL45883W/editions.json?limit=50"), listing),
    );
    let mut record = BookRecord::with_external_id("OL45883W");

    assert!(enricher.resolve(&mut record));
    assert_eq!(cover(333), record.cover_url);
}

#[test]
fn work_covers_are_the_last_cover_fallback() {
    let enricher = enricher(fox_work());
    let mut record = BookRecord::with_external_id("OL45883W");

    assert!(enricher.resolve(&mut record));

    // listing is unavailable, first positive id of the work
    assert_eq!(cover(6_498_519), record.cover_url);
    assert_eq!(Field::Empty, record.publication_year);
}

#[test]
fn only_three_authors_are_fetched_and_failures_are_skipped() {
    let work = r#"{
        "key": "/works/OL1W",
        "title": "Anthology",
        "authors": [
            {"author": {"key": "/authors/OL1A"}},
            {"author": {"key": "/authors/OL2A"}},
            {"author": {"key": "/authors/OL3A"}},
            {"author": {"key": "/authors/OL4A"}}
        ]
    }"#;
    let enricher = enricher(
        MockClient::new()
            .route(ol("/works/OL1W.json"), work)
            .route(ol("/authors/OL1A.json"), r#"{"name": "First"}"#)
            .fail(ol("/authors/OL2A.json"), ErrorKind::IO)
            .route(ol("/authors/OL3A.json"), r#"{"name": "Third"}"#)
            .route(ol("/authors/OL4A.json"), r#"{"name": "Fourth"}"#),
    );
    let mut record = BookRecord::with_external_id("OL1W");

    assert!(enricher.resolve(&mut record));

    assert_eq!(Field::Set("First, Third".to_owned()), record.author);
    assert_eq!(0, enricher.api.client().count(&ol("/authors/OL4A")));
}

#[test]
fn id_matching_neither_letter_tries_both_work_urls() {
    let enricher = enricher(MockClient::new());
    let mut record = BookRecord::with_external_id("45883");
    let before = record.clone();

    assert!(!enricher.resolve(&mut record));

    assert_eq!(
        vec![ol("/works/OL45883W.json"), ol("/works/45883.json")],
        enricher.api.client().requests()
    );
    assert_eq!(before, record);
}

#[test]
fn unformatted_work_id_is_the_retry() {
    let enricher = enricher(
        MockClient::new().route(ol("/works/45883.json"), r#"{"title": "Legacy"}"#),
    );
    let mut record = BookRecord::with_external_id("45883");

    assert!(enricher.resolve(&mut record));

    assert_eq!(Field::Set("Legacy".to_owned()), record.title);
    // the listing key falls back to the key the work was fetched with
    assert_requested!(enricher.api.client(), ol("/works/45883/editions.json?limit=1"));
}

#[test]
fn already_formatted_work_id_is_fetched_once() {
    let enricher = enricher(MockClient::new());
    let mut record = BookRecord::with_external_id("OL45883W");

    assert!(!enricher.resolve(&mut record));
    assert_eq!(vec![ol("/works/OL45883W.json")], enricher.api.client().requests());
}

#[test]
fn malformed_work_yields_nothing() {
    let enricher = enricher(
        MockClient::new().route(ol("/works/OL45883W.json"), r#"{"title": ["not", "text"]}"#),
    );
    let mut record = BookRecord::with_external_id("OL45883W");

    assert!(!enricher.resolve(&mut record));
    assert_eq!(BookRecord::with_external_id("OL45883W"), record);
}

#[test]
fn complete_record_is_never_overwritten() {
    let enricher = enricher(
        fox_work().route(ol("/works/OL45883W/editions.json?limit=50"), EDITIONS_JSON),
    );
    let mut record = complete_record();

    assert!(enricher.resolve(&mut record));
    assert!(enricher.resolve(&mut record));

    assert_eq!(complete_record(), record);
    // no field needed data so only the work itself was fetched
    assert_eq!(
        vec![ol("/works/OL45883W.json"), ol("/works/OL45883W.json")],
        enricher.api.client().requests()
    );
}

#[test]
fn placeholders_are_replaced() {
    let enricher = enricher(fox_work());
    let mut record = BookRecord::with_external_id("OL45883W");
    record.finalize();

    assert!(enricher.resolve(&mut record));

    assert_eq!(Field::Set("Fantastic Mr Fox".to_owned()), record.title);
    assert_eq!(Field::Set("Animals, Hunger".to_owned()), record.category);
    assert_eq!(Field::Placeholder, record.publication_year);
}

#[test]
fn description_falls_back_to_edition_then_first_listed_edition() {
    let bare_work = r#"{"key": "/works/OL45883W", "title": "Fantastic Mr Fox"}"#;
    let edition = r#"{
        "works": [{"key": "/works/OL45883W"}],
        "description": "From the edition."
    }"#;

    let with_edition = enricher(
        MockClient::new()
            .route(ol("/works/OL45883W.json"), bare_work)
            .route(ol("/books/OL7353617M.json"), edition),
    );
    let mut record = BookRecord::with_external_id("OL7353617M");
    assert!(with_edition.resolve(&mut record));
    assert_eq!(Field::Set("From the edition.".to_owned()), record.description);

    let with_listing = enricher(
        MockClient::new()
            .route(ol("/works/OL45883W.json"), bare_work)
            .route(ol("/works/OL45883W/editions.json?limit=1"), FIRST_EDITION_JSON),
    );
    let mut record = BookRecord::with_external_id("OL45883W");
    assert!(with_listing.resolve(&mut record));
    assert_eq!(
        Field::Set("First paperback printing.".to_owned()),
        record.description
    );
}

#[test]
fn category_falls_back_to_edition_subjects_then_places() {
    let placeless = r#"{"key": "/works/OL1W", "subject_places": ["England", "Wales", "Ireland"]}"#;
    let edition = r#"{"works": [{"key": "/works/OL1W"}], "subjects": ["Foxes"]}"#;

    let with_edition = enricher(
        MockClient::new()
            .route(ol("/works/OL1W.json"), placeless)
            .route(ol("/books/OL1M.json"), edition),
    );
    let mut record = BookRecord::with_external_id("OL1M");
    assert!(with_edition.resolve(&mut record));
    assert_eq!(Field::Set("Foxes".to_owned()), record.category);

    let work_only = enricher(MockClient::new().route(ol("/works/OL1W.json"), placeless));
    let mut record = BookRecord::with_external_id("OL1W");
    assert!(work_only.resolve(&mut record));
    assert_eq!(Field::Set("England, Wales".to_owned()), record.category);
}

#[test]
fn title_without_results_makes_one_search_and_changes_nothing() {
    let enricher = enricher(MockClient::new().route(ol(SEARCH_FOX), SEARCH_EMPTY_JSON));
    let mut record = BookRecord::with_title("Fantastic Mr Fox");
    record.category = Field::Set("Kids".to_owned());
    let before = record.clone();

    assert!(!enricher.resolve(&mut record));

    assert_eq!(vec![ol(SEARCH_FOX)], enricher.api.client().requests());
    assert_eq!(before, record);
}

#[test]
fn title_match_fills_from_search_then_work() {
    let enricher = enricher(fox_work().route(ol(SEARCH_FOX), SEARCH_TITLE_JSON));
    let mut record = BookRecord::with_title("Fantastic Mr Fox");

    assert!(enricher.resolve(&mut record));

    assert_eq!(1, enricher.api.client().count(&ol("/search.json")));
    assert_eq!(Some("OL45883W"), record.external_id());
    assert_eq!(Field::Set("Fantastic Mr Fox".to_owned()), record.title);
    assert_eq!(
        Field::Set("Roald Dahl, Quentin Blake, Tony Ross".to_owned()),
        record.author
    );
    assert_eq!(Field::Set(1970), record.publication_year);
    assert_eq!(Field::Set("Animals, Hunger".to_owned()), record.category);
    assert_eq!(cover(6_498_519), record.cover_url);
    assert!(record.description.is_set());
    // search data already covered the authors
    assert_eq!(0, enricher.api.client().count(&ol("/authors/")));
}

#[test]
fn title_match_without_work_is_still_applied() {
    let enricher = enricher(MockClient::new().route(ol(SEARCH_FOX), SEARCH_TITLE_JSON));
    let mut record = BookRecord::with_title("Fantastic Mr Fox");

    assert!(enricher.resolve(&mut record));

    assert_eq!(Some("OL45883W"), record.external_id());
    assert_eq!(Field::Set(1970), record.publication_year);
    assert_eq!(Field::Empty, record.description);
}

#[test]
fn placeholder_title_is_not_searched() {
    let enricher = enricher(MockClient::new());
    let mut record = BookRecord::with_title("Sin título");

    assert_eq!(Field::Placeholder, record.title);
    assert!(!enricher.resolve(&mut record));
    assert!(enricher.api.client().requests().is_empty());
}

#[test]
fn manual_cover_needs_no_lookup() {
    let enricher = enricher(MockClient::new());
    let mut record = BookRecord::with_title("Fantastic Mr Fox");
    record.set_cover_url("https://example.org/fox.jpg");

    assert_eq!(
        Some("https://example.org/fox.jpg".to_owned()),
        enricher.cover_url(&record)
    );
    assert!(enricher.api.client().requests().is_empty());
}

#[test]
fn cover_lookup_searches_title_and_author() {
    let url = "/search.json?title=Fantastic%20Mr%20Fox&author=Roald%20Dahl&limit=1";
    let enricher = enricher(MockClient::new().route(ol(url), SEARCH_TITLE_JSON));
    let mut record = BookRecord::with_title("Fantastic Mr Fox");
    record.author = Field::Set("Roald Dahl".to_owned());
    let before = record.clone();

    assert_eq!(cover(6_498_519), enricher.cover_url(&record));
    assert_eq!(before, record);
    assert_eq!(vec![ol(url)], enricher.api.client().requests());
}

#[test]
fn cover_lookup_without_title_or_match() {
    let enricher = enricher(MockClient::new().route(ol(SEARCH_FOX), SEARCH_EMPTY_JSON));

    assert_eq!(None, enricher.cover_url(&BookRecord::new()));
    assert!(enricher.api.client().requests().is_empty());
    assert_eq!(None, enricher.cover_url(&BookRecord::with_title("Fantastic Mr Fox")));
}

#[test]
fn search_cleans_up_hits() {
    let url = "/search.json?q=mr%20fox&limit=10&fields=key,title,author_name,first_publish_year,cover_i,isbn,subject";
    let enricher = enricher(MockClient::new().route(ol(url), SEARCH_QUERY_JSON));

    let hits = enricher.search(" mr fox ");

    assert_eq!(
        vec![
            SearchHit {
                external_id: "OL45883W".to_owned(),
                title: "Fantastic Mr Fox".to_owned(),
                author: "Roald Dahl".to_owned(),
                category: "Animals, Hunger".to_owned(),
                publication_year: 1970,
                description: "Publicado en 1970".to_owned(),
                cover_url: cover(6_498_519),
            },
            SearchHit {
                external_id: "OL99999W".to_owned(),
                title: "Fox notes".to_owned(),
                author: "Desconocido".to_owned(),
                category: "General".to_owned(),
                publication_year: 0,
                description: "Publicado en año desconocido".to_owned(),
                cover_url: None,
            },
        ],
        hits
    );
}

#[test]
fn search_without_query_or_network_has_no_hits() {
    let enricher = enricher(MockClient::new());

    assert!(enricher.search("  ").is_empty());
    assert!(enricher.api.client().requests().is_empty());
    assert!(enricher.search("mr fox").is_empty());
}

#[test]
fn imported_hit_leaves_filler_out() {
    let hit = SearchHit {
        external_id: "OL99999W".to_owned(),
        title: "Fox notes".to_owned(),
        author: "Desconocido".to_owned(),
        category: "General".to_owned(),
        publication_year: 0,
        description: "Publicado en año desconocido".to_owned(),
        cover_url: None,
    };
    let record = BookRecord::from(hit);

    assert_eq!(Field::Set("Fox notes".to_owned()), record.title);
    assert!(!record.author.is_set());
    assert!(!record.category.is_set());
    assert_eq!(Field::Empty, record.description);
    assert_eq!(Field::Empty, record.publication_year);
    assert_eq!(Some("OL99999W"), record.external_id());
}

struct PanickingClient;

impl Client for PanickingClient {
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: serde::de::DeserializeOwned,
    {
        panic!("unexpected request to {url}")
    }
}

#[test]
fn panic_while_resolving_is_not_found() {
    let enricher = Enricher::with_client(PanickingClient, ClientConfig::default());
    let mut record = BookRecord::with_external_id("OL45883W");

    assert!(!enricher.resolve(&mut record));
}
