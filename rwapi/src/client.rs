use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::errors::RwApiError;
use crate::query::Query;
use crate::result::ResultEnvelope;
use crate::transport::{HttpTransport, Transport};

/// Sends queries to the API and decodes the responses.
pub struct Client<T = HttpTransport> {
    transport: T,
    base_url: String,
    appname: Option<String>,
}

impl Client<HttpTransport> {
    /// Client for the default API endpoint. `timeout` covers the connection,
    /// redirects and reading the response body.
    pub fn new(
        appname: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, RwApiError> {
        let transport = HttpTransport::new(timeout)?;
        Ok(Self::with_transport(
            transport,
            DEFAULT_BASE_URL,
            Some(appname.into()),
        ))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, RwApiError> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::with_transport(
            transport,
            &config.base_url,
            config.appname.clone(),
        ))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T, base_url: &str, appname: Option<String>) -> Self {
        Self {
            transport,
            base_url: base_url.to_string(),
            appname: appname.filter(|name| !name.is_empty()),
        }
    }

    /// Points the client at another deployment of the API.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// URL of a resource, or of one item when `item_id` is given. The item ID
    /// is percent-encoded as a single path segment and the application name
    /// is added as the `appname` query parameter.
    pub fn url(&self, resource: &str, item_id: Option<&str>) -> String {
        let mut url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            resource.trim_start_matches('/')
        );
        if let Some(id) = item_id {
            url.push('/');
            url.push_str(&urlencoding::encode(id));
        }
        if let Some(appname) = &self.appname {
            url.push_str("?appname=");
            url.push_str(&urlencoding::encode(appname));
        }
        url
    }

    /// Queries `resource` (either "reports" or "reports/ID") and returns the
    /// raw response body.
    pub async fn query_raw(&self, resource: &str, query: &Query) -> Result<Vec<u8>, RwApiError> {
        self.post(self.url(resource, None), query).await
    }

    pub async fn query(
        &self,
        resource: &str,
        query: &Query,
    ) -> Result<ResultEnvelope, RwApiError> {
        let body = self.query_raw(resource, query).await?;
        ResultEnvelope::from_slice(&body)
    }

    pub async fn query_item_raw(
        &self,
        resource: &str,
        id: &str,
        query: &Query,
    ) -> Result<Vec<u8>, RwApiError> {
        self.post(self.url(resource, Some(id)), query).await
    }

    pub async fn query_item(
        &self,
        resource: &str,
        id: &str,
        query: &Query,
    ) -> Result<ResultEnvelope, RwApiError> {
        let body = self.query_item_raw(resource, id, query).await?;
        ResultEnvelope::from_slice(&body)
    }

    /// Queries `resource` and decodes the fields of every item into `R`.
    pub async fn query_as<R: DeserializeOwned>(
        &self,
        resource: &str,
        query: &Query,
    ) -> Result<(ResultEnvelope, Vec<R>), RwApiError> {
        let envelope = self.query(resource, query).await?;
        let items = envelope.materialize()?;
        Ok((envelope, items))
    }

    async fn post(&self, url: String, query: &Query) -> Result<Vec<u8>, RwApiError> {
        let payload = query.to_json()?;
        debug!("POST {} ({} byte payload)", url, payload.len());

        let response = self.transport.post(&url, payload.clone()).await?;
        debug!(
            "HTTP {} from {} ({} bytes)",
            response.status,
            url,
            response.body.len()
        );

        if !response.is_success() {
            warn!("Unexpected HTTP {} for request {}", response.status, url);
            return Err(RwApiError::UnexpectedStatus {
                url,
                payload,
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        Ok(response.body)
    }
}
