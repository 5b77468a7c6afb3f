//! Retrieval of suggestion resources.
//!
//! [`ResourceFetcher`] is the seam between the catalog and whatever can
//! actually read bytes for a URL. [`SourceFetcher`] covers local installs
//! (`file:`) and remote ones (`http:`/`https:`); hosts with their own URL
//! schemes plug in their own implementation.
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::Url;
use tracing::debug;

use crate::error::NetworkError;

// Shared HTTP client with connection pooling, built on first remote fetch.
static HTTP_CLIENT: OnceCell<reqwest::Client> = OnceCell::new();

fn shared_client() -> Result<&'static reqwest::Client, NetworkError> {
    HTTP_CLIENT.get_or_try_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| NetworkError::Client(e.to_string()))
    })
}

/// Reads the raw bytes behind a resource URL.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, NetworkError>;
}

/// Default fetcher for `file`, `http` and `https` URLs.
#[derive(Debug, Clone, Default)]
pub struct SourceFetcher {
    client: Option<reqwest::Client>,
}

impl SourceFetcher {
    /// Fetcher using the process-wide HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetcher using a caller-configured client (proxies, TLS roots, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Some(client),
        }
    }

    async fn fetch_file(url: &Url) -> Result<Vec<u8>, NetworkError> {
        let path = url
            .to_file_path()
            .map_err(|()| NetworkError::InvalidUrl(format!("{url}: not a local file path")))?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| NetworkError::Io(format!("{}: {e}", path.display())))
    }

    async fn fetch_http(&self, url: &Url) -> Result<Vec<u8>, NetworkError> {
        let client = match &self.client {
            Some(client) => client,
            None => shared_client()?,
        };

        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| NetworkError::Request(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| NetworkError::Request(format!("reading body of {url}: {e}")))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl ResourceFetcher for SourceFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, NetworkError> {
        debug!(url = %url, "fetch_resource");
        match url.scheme() {
            "file" => Self::fetch_file(url).await,
            "http" | "https" => self.fetch_http(url).await,
            other => Err(NetworkError::UnsupportedScheme {
                scheme: other.to_string(),
            }),
        }
    }
}
