//! Settings for talking to the Open Library API.

use std::time::Duration;

use crate::{Error, ErrorKind};

const OPEN_LIBRARY_URL: &str = "https://openlibrary.org";
const COVERS_URL: &str = "https://covers.openlibrary.org";
const TIMEOUT_SECS: u64 = 5;
const USER_AGENT: &str = concat!("shelf/", env!("CARGO_PKG_VERSION"));

/// Where the catalog API lives and how long a single request may take.
///
/// # Examples
///
/// ```
/// use shelf::config::ClientConfig;
///
/// let config = ClientConfig::default();
/// assert_eq!(
///     "https://covers.openlibrary.org/b/id/8231856-L.jpg",
///     config.cover_url(8_231_856)
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the catalog API, without a trailing slash.
    pub api_url: String,
    /// Base URL of the cover image host, without a trailing slash.
    pub covers_url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: OPEN_LIBRARY_URL.to_owned(),
            covers_url: COVERS_URL.to_owned(),
            timeout: Duration::from_secs(TIMEOUT_SECS),
            user_agent: USER_AGENT.to_owned(),
        }
    }
}

impl ClientConfig {
    /// Replaces the API base URL, trailing slashes are dropped.
    #[must_use]
    pub fn with_api_url<S: Into<String>>(mut self, url: S) -> Self {
        let mut url = url.into();
        while url.ends_with('/') {
            url.pop();
        }
        self.api_url = url;
        self
    }

    /// Replaces the per request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute URL for a path (or author/work key) of the API.
    #[must_use]
    pub fn api(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    /// Large cover image URL for a numeric cover id.
    #[must_use]
    pub fn cover_url(&self, cover_id: i64) -> String {
        format!("{}/b/id/{cover_id}-L.jpg", self.covers_url)
    }

    /// Builds the blocking HTTP client used for every request.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the TLS backend cannot be initialised.
    pub fn http_client(&self) -> Result<reqwest::blocking::Client, Error> {
        reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| Error::wrap_with(ErrorKind::IO, e, "Cannot build the HTTP client"))
    }
}
