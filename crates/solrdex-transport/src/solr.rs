//! Solr HTTP transport
//!
//! Talks to a single core through its standard request handlers:
//!
//! | operation | handler |
//! |---|---|
//! | extract | `POST {core}/update/extract` (file bytes as body) |
//! | update | `POST {core}/update` (JSON command body) |
//! | select | `GET {core}/select` |
//! | ping | `GET {core}/admin/ping` |
//!
//! # Example
//!
//! ```rust,no_run
//! use solrdex_common::CorrelationId;
//! use solrdex_transport::{SearchTransport, SelectQuery, SolrClient};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SolrClient::new("http://localhost:8983/solr/nextcloud", Duration::from_secs(30))?;
//! let query = SelectQuery {
//!     query: "*:*".to_string(),
//!     rows: 10,
//!     ..SelectQuery::default()
//! };
//! let response = client.select(&query, &CorrelationId::new()).await?;
//! println!("{}", response.body);
//! # Ok(())
//! # }
//! ```

use crate::{
    ExtractRequest, RawResponse, SearchTransport, SelectQuery, TransportError, TransportResult,
    UpdateRequest,
};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use solrdex_common::CorrelationId;
use solrdex_config::SolrConfig;
use std::time::Duration;

/// HTTP client bound to one Solr core
#[derive(Clone)]
pub struct SolrClient {
    client: reqwest::Client,
    core_url: String,
}

impl SolrClient {
    /// Create a client for the core at `core_url` (e.g. `http://host:8983/solr/nextcloud`)
    ///
    /// # Errors
    /// Returns `TransportError::Configuration` if the HTTP client cannot be built
    pub fn new(core_url: impl Into<String>, timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            core_url: core_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from validated Solr settings
    ///
    /// # Errors
    /// Returns `TransportError::Configuration` for a blank servlet or core
    pub fn from_config(config: &SolrConfig) -> TransportResult<Self> {
        Self::new(
            config.core_url()?,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// Base URL of the bound core
    pub fn core_url(&self) -> &str {
        &self.core_url
    }

    fn endpoint(&self, handler: &str) -> String {
        format!("{}/{handler}", self.core_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> TransportResult<RawResponse> {
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Connection(format!("Failed to read response: {e}")))?;

        if status.is_success() {
            Ok(RawResponse::new(status.as_u16(), body))
        } else {
            Err(TransportError::Http {
                code: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl SearchTransport for SolrClient {
    #[tracing::instrument(skip(self, request), fields(file = %request.file.display()))]
    async fn extract(
        &self,
        request: &ExtractRequest,
        correlation_id: &CorrelationId,
    ) -> TransportResult<RawResponse> {
        let bytes = tokio::fs::read(&request.file)
            .await
            .map_err(|source| TransportError::Io {
                path: request.file.display().to_string(),
                source,
            })?;

        tracing::info!(
            correlation_id = %correlation_id,
            id = request.field("id").first().map_or("", String::as_str),
            bytes = bytes.len(),
            "Sending document to extraction"
        );

        let builder = self
            .client
            .post(self.endpoint("update/extract"))
            .query(&request.to_params())
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes);

        self.send(builder).await
    }

    #[tracing::instrument(skip(self, request))]
    async fn update(
        &self,
        request: &UpdateRequest,
        correlation_id: &CorrelationId,
    ) -> TransportResult<RawResponse> {
        tracing::info!(
            correlation_id = %correlation_id,
            command = ?request.command,
            "Sending update command"
        );

        let builder = self
            .client
            .post(self.endpoint("update"))
            .query(&request.to_params())
            .json(&request.body());

        self.send(builder).await
    }

    #[tracing::instrument(skip(self, query), fields(start = query.start, rows = query.rows))]
    async fn select(
        &self,
        query: &SelectQuery,
        correlation_id: &CorrelationId,
    ) -> TransportResult<RawResponse> {
        tracing::debug!(
            correlation_id = %correlation_id,
            filters = query.filters.len(),
            "Running select query"
        );

        let builder = self
            .client
            .get(self.endpoint("select"))
            .query(&query.to_params());

        self.send(builder).await
    }

    #[tracing::instrument(skip(self))]
    async fn ping(&self) -> TransportResult<bool> {
        let builder = self
            .client
            .get(self.endpoint("admin/ping"))
            .query(&[("wt", "json")]);

        let response = self.send(builder).await?;
        let status = response
            .json()?
            .get("status")
            .and_then(serde_json::Value::as_str)
            .map(str::to_ascii_uppercase);

        Ok(status.as_deref() == Some("OK"))
    }
}
