//! HTTP fetcher shared by all three pipelines.
//!
//! A thin wrapper over a single `reqwest::Client` configured with the
//! user agent and the request timeout from [`Settings`]. Anything other than
//! a 2xx answer is a [`FetchError`]; a timeout is reported as
//! [`FetchError::Timeout`] so the sensors can show it distinctly.

use crate::config::Settings;
use crate::error::FetchError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Build the client from the user agent and timeout in `settings`.
    ///
    /// # Returns
    ///
    /// `Err(FetchError::Request)` only when the TLS backend cannot be
    /// initialized.
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let timeout = settings.request_timeout();
        let inner = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(timeout)
            .build()?;
        Ok(Self { inner, timeout })
    }

    /// GET `url` and return the body as text.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Upstream answered with an error status");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        debug!(
            %url,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }

    /// GET `url` and deserialize the body as JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let body = self.get_text(url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                after: self.timeout,
            }
        } else {
            FetchError::Request(e)
        }
    }
}
