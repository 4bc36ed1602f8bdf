use crate::models::{
    CityRecord, CitySuggestion, Happening, HappeningQuery, HappeningSubmission, TagSubmission,
};
use reqwest::{Client, Method};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the Happening backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Anything that can supply a filtered list of happenings
pub trait HappeningSource {
    fn fetch_happenings(
        &self,
        query: &HappeningQuery,
    ) -> impl Future<Output = Result<Vec<Happening>, BackendError>> + Send;
}

/// Client for the Happening REST backend
///
/// Covers city and tag search, listing happenings and the submission
/// endpoints. Submissions are sent as query string parameters.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search cities by name
    pub async fn search_cities(&self, term: &str) -> Result<Vec<CitySuggestion>, BackendError> {
        let url = self.url("/cities/search", &[("searchstring", search_term(term).to_string())]);
        tracing::debug!("Searching cities: {}", url);

        let records: Vec<CityRecord> = self.get_json(&url, "search cities").await?;

        Ok(records.into_iter().map(CitySuggestion::from).collect())
    }

    /// Search tag names, the term is sent as typed
    pub async fn search_tags(&self, term: &str) -> Result<Vec<String>, BackendError> {
        let url = self.url("/tags/search", &[("searchstring", term.to_string())]);
        tracing::debug!("Searching tags: {}", url);

        self.get_json(&url, "search tags").await
    }

    /// List happenings, optionally filtered by tag and proximity
    pub async fn list_happenings(&self, query: &HappeningQuery) -> Result<Vec<Happening>, BackendError> {
        let url = self.url("/happenings", &query.to_query_pairs());
        tracing::debug!("Fetching happenings: {}", url);

        let raw: Vec<Value> = self.get_json(&url, "fetch happenings").await?;
        let total = raw.len();

        // A malformed record should not hide the rest of the listing
        let happenings: Vec<Happening> = raw
            .into_iter()
            .filter_map(|doc| match serde_json::from_value(doc) {
                Ok(h) => Some(h),
                Err(e) => {
                    tracing::warn!("Skipping malformed happening: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Fetched {} happenings ({} returned)", happenings.len(), total);
        Ok(happenings)
    }

    pub async fn create_happening(&self, submission: &HappeningSubmission) -> Result<Value, BackendError> {
        let url = self.url("/happenings", &submission.to_query_pairs());
        self.send(Method::POST, &url, "create happening").await
    }

    pub async fn update_happening(
        &self,
        id: &str,
        submission: &HappeningSubmission,
    ) -> Result<Value, BackendError> {
        let path = format!("/happenings/{}", urlencoding::encode(id));
        let url = self.url(&path, &submission.to_query_pairs());
        self.send(Method::PUT, &url, "update happening").await
    }

    pub async fn create_tag(&self, submission: &TagSubmission) -> Result<Value, BackendError> {
        let url = self.url("/tags", &[("name", submission.name.clone())]);
        self.send(Method::POST, &url, "create tag").await
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        for (i, (key, value)) in params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn get_json<T>(&self, url: &str, action: &str) -> Result<T, BackendError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(BackendError::ApiError(format!(
                "Failed to {}: {}",
                action,
                response.status()
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to {}: {}", action, e)))
    }

    async fn send(&self, method: Method, url: &str, action: &str) -> Result<Value, BackendError> {
        tracing::debug!("{} {}", method, url);
        let response = self.client.request(method, url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to {}: {} - {}", action, status, body);
            return Err(BackendError::ApiError(format!("Failed to {}: {}", action, status)));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to {}: {}", action, e)))
    }
}

impl HappeningSource for BackendClient {
    async fn fetch_happenings(&self, query: &HappeningQuery) -> Result<Vec<Happening>, BackendError> {
        self.list_happenings(query).await
    }
}

/// Autocomplete labels look like "Chicago, IL"; only the part before the comma is searched
pub fn search_term(input: &str) -> &str {
    input.split(',').next().unwrap_or(input).trim()
}
