//! HTTP client for the live inventory endpoint, remote CSV exports and the
//! refresh trigger.

use std::time::Duration;

use lotview_core::AppConfig;
use reqwest::{Client, StatusCode};

use crate::error::SourceError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{InventoryResponse, RawRecord};

/// Header carrying the shared secret for the refresh trigger.
pub const ACTION_SECRET_HEADER: &str = "x-action-secret";

/// HTTP client for the inventory sources.
///
/// GET requests are retried on network failures and 5xx responses with
/// exponential backoff. The refresh trigger is a POST and is sent once.
pub struct InventoryClient {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl InventoryClient {
    /// Creates a client with the given timeout, `User-Agent` and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// # Errors
    ///
    /// Same as [`InventoryClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        Self::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    /// Fetches the raw vehicle list from the live JSON endpoint.
    ///
    /// # Errors
    ///
    /// - [`SourceError::NotFound`] / [`SourceError::UnexpectedStatus`] for non-2xx.
    /// - [`SourceError::UnexpectedContentType`] when the body is not JSON.
    /// - [`SourceError::Deserialize`] when the JSON does not match the envelope.
    /// - [`SourceError::Api`] when the envelope reports `ok == false`.
    /// - [`SourceError::Http`] on network failure after all retries.
    pub async fn fetch_api(&self, url: &str) -> Result<Vec<RawRecord>, SourceError> {
        let body = retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .header(reqwest::header::CACHE_CONTROL, "no-cache")
                .send()
                .await?;
            check_status(response.status(), url)?;

            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_owned();
            if !is_json_content_type(&content_type) {
                return Err(SourceError::UnexpectedContentType {
                    url: url.to_owned(),
                    content_type,
                });
            }

            Ok(response.text().await?)
        })
        .await?;

        let parsed = serde_json::from_str::<InventoryResponse>(&body).map_err(|e| {
            SourceError::Deserialize {
                context: format!("inventory response from {url}"),
                source: e,
            }
        })?;

        if !parsed.is_ok() {
            return Err(SourceError::Api {
                message: parsed
                    .error
                    .unwrap_or_else(|| "API returned error response".to_owned()),
            });
        }

        tracing::debug!(url, vehicles = parsed.vehicles.len(), "fetched live inventory");
        Ok(parsed.vehicles)
    }

    /// Downloads a CSV export and returns its text.
    ///
    /// # Errors
    ///
    /// - [`SourceError::NotFound`] / [`SourceError::UnexpectedStatus`] for non-2xx.
    /// - [`SourceError::Http`] on network failure after all retries.
    pub async fn fetch_csv(&self, url: &str) -> Result<String, SourceError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "text/csv,text/plain;q=0.9,*/*;q=0.8")
                .header(reqwest::header::CACHE_CONTROL, "no-store")
                .send()
                .await?;
            check_status(response.status(), url)?;
            Ok(response.text().await?)
        })
        .await
    }

    /// Asks the scraper to regenerate its data. Returns once the trigger is
    /// accepted; regeneration itself happens asynchronously on the far side.
    ///
    /// # Errors
    ///
    /// - [`SourceError::NotFound`] / [`SourceError::UnexpectedStatus`] for non-2xx.
    /// - [`SourceError::Http`] on network failure.
    pub async fn trigger_refresh(&self, url: &str, secret: Option<&str>) -> Result<(), SourceError> {
        let mut request = self.client.post(url);
        if let Some(secret) = secret {
            request = request.header(ACTION_SECRET_HEADER, secret);
        }
        let response = request.send().await?;
        check_status(response.status(), url)?;
        tracing::info!(url, "refresh trigger accepted");
        Ok(())
    }
}

/// Maps a non-2xx status to a typed error.
fn check_status(status: StatusCode, url: &str) -> Result<(), SourceError> {
    if status == StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound {
            url: url.to_owned(),
        });
    }
    if !status.is_success() {
        return Err(SourceError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }
    Ok(())
}

fn is_json_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|mime| {
            mime.eq_ignore_ascii_case("application/json")
                || mime.to_ascii_lowercase().ends_with("+json")
        })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
