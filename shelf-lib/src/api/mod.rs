use serde::de::DeserializeOwned;

pub(crate) mod open_library;

use crate::{Error, ErrorKind};

/// A blocking source of JSON documents addressed by URL.
///
/// The enrichment code only ever talks to the network through this trait so that every request
/// can be answered by a fake in tests.
pub trait Client {
    /// Fetches the document at `url` and deserializes it into `T`.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::IO`] is returned when the request cannot be sent,
    /// [`ErrorKind::Status`] when the response status is not a success and
    /// [`ErrorKind::Deserialize`] when the body is not the expected JSON shape.
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned;
}

impl Client for reqwest::blocking::Client {
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let resp = self
            .get(url)
            .send()
            .map_err(|e| Error::wrap_with(ErrorKind::IO, e, format!("GET {url}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::new(
                ErrorKind::Status,
                format!("GET {url} answered with {status}"),
            ));
        }

        resp.json()
            .map_err(|e| Error::wrap_with(ErrorKind::Deserialize, e, format!("GET {url}")))
    }
}

#[cfg(test)]
pub(crate) use test::{assert_requested, ol, MockClient};
