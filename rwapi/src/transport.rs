use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::RwApiError;

/// Status code and raw body of an HTTP response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a JSON payload to the API. Timeouts and connection handling belong
/// to the implementation; the client never retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, body: String) -> Result<TransportResponse, RwApiError>;
}

/// reqwest based transport with a single overall timeout covering the
/// connection, redirects and reading the body.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, RwApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RwApiError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, body: String) -> Result<TransportResponse, RwApiError> {
        let transport_error = |source| RwApiError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
