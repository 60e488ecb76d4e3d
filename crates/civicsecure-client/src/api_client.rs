//! HTTP client for the complaint REST API.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use civicsecure_shared::protocol::{
    ComplaintListResponse, ComplaintResponse, ComplaintStats, CreateComplaintRequest,
    ErrorResponse, HealthResponse, ListQuery, StatsResponse, UpdateComplaintRequest,
};
use civicsecure_shared::Complaint;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::gateway::ComplaintGateway;
use crate::tracking::ComplaintSource;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// `base_url` includes the API prefix, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, base })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.api_base_url)
    }

    /// Base URL plus path segments. Segments are percent-encoded, so ids
    /// containing `/` or `?` cannot escape their position.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Server liveness and database connectivity.
    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self.http.get(self.endpoint(&["health"])?).send().await?;
        decode(resp).await
    }

    pub async fn create(&self, request: &CreateComplaintRequest) -> Result<Complaint> {
        let resp = self
            .http
            .post(self.endpoint(&["complaints"])?)
            .json(request)
            .send()
            .await?;
        let body: ComplaintResponse = decode(resp).await?;
        Ok(body.complaint)
    }

    pub async fn list(&self, query: &ListQuery) -> Result<ComplaintListResponse> {
        let resp = self
            .http
            .get(self.endpoint(&["complaints"])?)
            .query(query)
            .send()
            .await?;
        decode(resp).await
    }

    /// `None` when no complaint has this id.
    pub async fn get(&self, id: &str) -> Result<Option<Complaint>> {
        let resp = self.http.get(self.endpoint(&["complaints", id])?).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: ComplaintResponse = decode(resp).await?;
        Ok(Some(body.complaint))
    }

    pub async fn update(&self, id: &str, request: &UpdateComplaintRequest) -> Result<Complaint> {
        let resp = self
            .http
            .put(self.endpoint(&["complaints", id])?)
            .json(request)
            .send()
            .await?;
        let body: ComplaintResponse = decode(resp).await?;
        Ok(body.complaint)
    }

    /// Returns the deleted record.
    pub async fn delete(&self, id: &str) -> Result<Complaint> {
        let resp = self.http.delete(self.endpoint(&["complaints", id])?).send().await?;
        let body: ComplaintResponse = decode(resp).await?;
        Ok(body.complaint)
    }

    pub async fn stats(&self) -> Result<ComplaintStats> {
        let resp = self
            .http
            .get(self.endpoint(&["complaints", "stats", "summary"])?)
            .send()
            .await?;
        let body: StatsResponse = decode(resp).await?;
        Ok(body.stats)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(api_error(status, &body))
}

/// Build an [`ClientError::Api`] from an error response, preferring the
/// server's `error` message.
fn api_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| match e.details.as_deref() {
            Some([first, ..]) if *first != e.error => format!("{}: {first}", e.error),
            _ => e.error,
        })
        .unwrap_or_else(|_| format!("Server error: {}", status.as_u16()));
    tracing::debug!(status = status.as_u16(), %message, "API request failed");
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

impl ComplaintGateway for ApiClient {
    async fn submit(&self, request: &CreateComplaintRequest) -> Result<Complaint> {
        self.create(request).await
    }
}

impl ComplaintSource for ApiClient {
    async fn fetch(&self, id: &str) -> Result<Option<Complaint>> {
        self.get(id).await
    }
}
