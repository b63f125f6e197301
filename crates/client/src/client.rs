//! HTTP transport implementation

use crate::error::{ClientError, Result};
use crate::types::{FlowFileEntity, ListingRequestEntity};
use async_trait::async_trait;
use queue_listing_core::domain::{FlowFileDetails, JobTarget, ListingRequest, ListingSnapshot};
use queue_listing_core::port::{ListingTransport, TransportError};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Connection settings for [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base used to resolve relative URIs, e.g. `http://localhost:8080/nifi-api/`
    pub base_url: Option<String>,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout: Duration::from_secs(30),
            user_agent: format!("queue-listing/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Listing transport over HTTP
///
/// Provides the create / poll / delete calls the listing controller needs,
/// plus flow-unit details and content downloads.
///
/// # Example
///
/// ```no_run
/// use queue_listing_client::{ClientOptions, HttpTransport};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpTransport::new(ClientOptions {
///     base_url: Some("http://localhost:8080/nifi-api/".to_string()),
///     ..Default::default()
/// })?;
/// # Ok(())
/// # }
/// ```
pub struct HttpTransport {
    client: Client,
    base_url: Option<Url>,
}

impl HttpTransport {
    pub fn new(options: ClientOptions) -> Result<Self> {
        let base_url = options
            .base_url
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|e| ClientError::InvalidUrl(format!("base URL: {}", e)))?;

        let client = Client::builder()
            .timeout(options.request_timeout)
            .user_agent(options.user_agent)
            .build()
            .map_err(|e| ClientError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Resolve an absolute URI, or a relative one against the base URL
    pub fn resolve(&self, uri: &str) -> Result<Url> {
        Url::parse(uri)
            .or_else(|e| match &self.base_url {
                Some(base) => base.join(uri),
                None => Err(e),
            })
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", uri, e)))
    }

    /// Fetch the full record behind a summary's `uri`
    pub async fn get_flowfile(
        &self,
        uri: &str,
        cluster_node_id: Option<&str>,
    ) -> Result<FlowFileDetails> {
        let mut url = self.resolve(uri)?;
        if let Some(node) = cluster_node_id {
            url.query_pairs_mut().append_pair("clusterNodeId", node);
        }
        debug!(url = %url, "Fetching flowfile details");

        let response = self.client.get(url).header(ACCEPT, "application/json").send().await?;
        let entity: FlowFileEntity = decode(response).await?;
        Ok(entity.flow_file)
    }

    /// Location of a flow unit's content
    pub fn content_url(&self, details: &FlowFileDetails) -> Result<Url> {
        let uri = details
            .uri
            .as_deref()
            .ok_or_else(|| ClientError::InvalidUrl(format!("flowfile {} has no uri", details.uuid)))?;
        let mut url = self.resolve(&format!("{}/content", uri.trim_end_matches('/')))?;
        if let Some(node) = details.cluster_node_id.as_deref() {
            url.query_pairs_mut().append_pair("clusterNodeId", node);
        }
        Ok(url)
    }

    /// Download a flow unit's content
    pub async fn fetch_content(&self, details: &FlowFileDetails) -> Result<Vec<u8>> {
        let url = self.content_url(details)?;
        debug!(url = %url, "Downloading flowfile content");

        let response = ensure_success(self.client.get(url).send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn create_listing(
        &self,
        target: &JobTarget,
        request: &ListingRequest,
    ) -> Result<ListingSnapshot> {
        let url = self.resolve(&target.listing_requests_uri())?;
        debug!(url = %url, sort_column = %request.sort_column, "Creating listing request");

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .form(request)
            .send()
            .await?;
        let entity: ListingRequestEntity = decode(response).await?;
        Ok(entity.listing_request)
    }

    async fn get_listing(&self, uri: &str) -> Result<ListingSnapshot> {
        let url = self.resolve(uri)?;
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let entity: ListingRequestEntity = decode(response).await?;
        Ok(entity.listing_request)
    }

    async fn delete_listing(&self, uri: &str) -> Result<()> {
        let url = self.resolve(uri)?;
        let response = self
            .client
            .delete(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ListingTransport for HttpTransport {
    async fn create(
        &self,
        target: &JobTarget,
        request: &ListingRequest,
    ) -> std::result::Result<ListingSnapshot, TransportError> {
        Ok(self.create_listing(target, request).await?)
    }

    async fn get(&self, uri: &str) -> std::result::Result<ListingSnapshot, TransportError> {
        Ok(self.get_listing(uri).await?)
    }

    async fn delete(&self, uri: &str) -> std::result::Result<(), TransportError> {
        Ok(self.delete_listing(uri).await?)
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = ensure_success(response).await?.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}
