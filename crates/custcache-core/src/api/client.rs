//! Dataset client for downloading the customer JSON document.

use std::time::Duration;

use chrono::Utc;
use reqwest::{header, Client};
use tracing::{debug, info};

use crate::config::Config;
use crate::models::Record;

use super::ApiError;

/// Name of the cache-busting query parameter appended to every request.
const CACHE_BUSTER_PARAM: &str = "t";

/// Fetches the dataset from a fixed URL.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct DatasetClient {
    client: Client,
    data_url: Option<String>,
}

impl DatasetClient {
    /// Create a new client for `data_url`. A `None` URL is allowed; every
    /// fetch then fails with [`ApiError::NotConfigured`] and the caller falls
    /// back to the cache.
    pub fn new(data_url: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, data_url })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(config.data_url.clone(), config.request_timeout())
    }

    pub fn data_url(&self) -> Option<&str> {
        self.data_url.as_deref()
    }

    /// Download and parse the dataset.
    ///
    /// The body must be a JSON array of objects. Non-2xx statuses, transport
    /// failures and any other body shape are errors.
    pub async fn fetch(&self) -> Result<Vec<Record>, ApiError> {
        let url = self.data_url.as_deref().ok_or(ApiError::NotConfigured)?;
        let stamp = Utc::now().timestamp_millis();
        debug!(url, stamp, "Fetching dataset");

        let response = self
            .client
            .get(url)
            .query(&[(CACHE_BUSTER_PARAM, stamp)])
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let body = response.text().await?;

        let records: Vec<Record> = serde_json::from_str(&body).map_err(|e| {
            ApiError::InvalidResponse(format!("expected a JSON array of objects: {}", e))
        })?;

        info!(count = records.len(), "Dataset fetched");
        Ok(records)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}
