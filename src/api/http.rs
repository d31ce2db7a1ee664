//! HTTP client for the engine API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{
    application_error, classify_checked, BatchEntry, BatchRequest, BatchResponse, EngineApi,
    QueryRequest, TablesPayload,
};
use crate::config::ApiConfig;
use crate::error::{ConsoleError, Result};
use crate::result::{QueryPayload, QueryResult};

/// Engine client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpEngineClient {
    base_url: String,
    timeout_secs: u64,
    client: Client,
}

impl HttpEngineClient {
    /// Creates a client from the API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let client = Client::builder()
            .timeout(config.timeout()?)
            .build()
            .map_err(|e| ConsoleError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            timeout_secs: config.timeout_secs,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn send_error(&self, e: reqwest::Error) -> ConsoleError {
        if e.is_timeout() {
            ConsoleError::timeout(format!(
                "The query engine did not respond within {}s",
                self.timeout_secs
            ))
        } else {
            warn!(error = %e, "engine request failed");
            ConsoleError::unreachable(&self.base_url)
        }
    }

    /// Reads the body and decodes it, mapping unreadable bodies to a
    /// status-code message.
    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<(StatusCode, T)> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                self.send_error(e)
            } else {
                ConsoleError::malformed(status.as_u16())
            }
        })?;

        match serde_json::from_str(&body) {
            Ok(decoded) => Ok((status, decoded)),
            Err(e) => {
                warn!(%status, error = %e, "unparseable engine response");
                Err(ConsoleError::malformed(status.as_u16()))
            }
        }
    }
}

#[async_trait]
impl EngineApi for HttpEngineClient {
    fn api_url(&self) -> &str {
        &self.base_url
    }

    async fn query(&self, sql: &str) -> Result<QueryResult> {
        debug!(sql, "POST /query");
        let response = self
            .client
            .post(self.endpoint("query"))
            .json(&QueryRequest { query: sql })
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let (status, payload): (_, QueryPayload) = self.decode(response).await?;

        if !status.is_success() || payload.is_error_flagged() {
            let (message, detail) = payload.message_and_detail();
            return Err(application_error(status.as_u16(), message, detail));
        }

        classify_checked(payload)
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        debug!("GET /tables");
        let response = self
            .client
            .get(self.endpoint("tables"))
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let (status, payload): (_, TablesPayload) = self.decode(response).await?;

        if !status.is_success() {
            return Err(application_error(
                status.as_u16(),
                payload.message.or(payload.error),
                None,
            ));
        }

        payload
            .tables
            .ok_or_else(|| ConsoleError::malformed(status.as_u16()))
    }

    async fn batch(&self, queries: &[String]) -> Result<Vec<BatchEntry>> {
        debug!(count = queries.len(), "POST /batch");
        let response = self
            .client
            .post(self.endpoint("batch"))
            .json(&BatchRequest { queries })
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let (_, payload): (_, QueryPayload) = self.decode(response).await?;
            let (message, detail) = payload.message_and_detail();
            return Err(application_error(status.as_u16(), message, detail));
        }

        let (_, body): (_, BatchResponse) = self.decode(response).await?;
        Ok(body.results.into_iter().map(|r| r.into_entry()).collect())
    }
}
