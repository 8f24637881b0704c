//! HTTP transport used to reach the elevation provider.

use crate::FetchError;
use log::{debug, warn};
use std::time::Duration;

/// Blocking HTTP GET.
///
/// Kept behind a trait so the raster decoding path can be exercised
/// without a network.
pub trait HttpClient: Send + Sync {
    /// Returns the response body of a successful GET on `url`.
    ///
    /// Non-success responses are [`FetchError::Provider`] carrying the
    /// status code and response text.
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Production [`HttpClient`] built on `reqwest`.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        // Strip URLs from errors, they carry the API key.
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Network(e.without_url()))?;

        let status = response.status();
        debug!("provider response status: {status}");

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!("provider error {status}: {body}");
            return Err(FetchError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| FetchError::Network(e.without_url()))?;
        Ok(bytes.to_vec())
    }
}
