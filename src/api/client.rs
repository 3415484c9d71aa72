//! The shared HTTP client and base URL handling.

use crate::Error;

/// A client for the remote transfers REST API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the API served at `base_url`, e.g.
    /// `http://localhost:4000`.
    ///
    /// # Errors
    ///
    /// Returns [Error::ApiUnreachable] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|error| Error::ApiUnreachable(error.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The full URL for an API `path` such as "/api/transacoes".
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The underlying HTTP client.
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

#[cfg(test)]
mod client_tests {
    use super::ApiClient;

    #[test]
    fn url_joins_base_and_path() {
        let client = ApiClient::new("http://localhost:4000").unwrap();

        assert_eq!(
            client.url("/api/tags"),
            "http://localhost:4000/api/tags"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:4000/").unwrap();

        assert_eq!(
            client.url("/api/tags"),
            "http://localhost:4000/api/tags"
        );
    }
}
