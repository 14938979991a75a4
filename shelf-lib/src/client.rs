//! Main ShelfClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::retry::RetryConfig;

/// HTTP client for the remote collection service.
///
/// This client is cheap to clone (uses `Arc` internally) and implements
/// [`crate::api::CollectionService`].
///
/// # Example
///
/// ```ignore
/// use shelf_lib::ShelfClient;
///
/// let client = ShelfClient::builder()
///     .url("http://localhost:3001")
///     .timeout(Duration::from_secs(10))
///     .build();
///
/// let page = client.list_items(&ItemsRequest::page(0, 20)).await?;
/// ```
#[derive(Clone)]
pub struct ShelfClient {
    pub(crate) inner: Arc<ShelfClientInner>,
}

pub(crate) struct ShelfClientInner {
    pub(crate) base_url: String,
    pub(crate) http_client: Client,
    pub(crate) timeout: Option<Duration>,
    pub(crate) retry_config: RetryConfig,
}

impl ShelfClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> ShelfClientBuilder<Missing> {
        ShelfClientBuilder::new()
    }

    /// Returns the base URL of the collection service.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the retry policy in use.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.inner.retry_config
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`ShelfClient`].
///
/// The base URL is required and enforced at compile time.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use shelf_lib::ShelfClient;
/// use shelf_lib::retry::RetryConfig;
///
/// let client = ShelfClient::builder()
///     .url("http://localhost:3001")
///     .retry(RetryConfig::no_retry())
///     .timeout(Duration::from_secs(5))
///     .build();
/// assert_eq!(client.base_url(), "http://localhost:3001");
/// ```
pub struct ShelfClientBuilder<Url> {
    url: Url,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry_config: RetryConfig,
    http_client: Option<Client>,
}

impl ShelfClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
            connect_timeout: None,
            retry_config: RetryConfig::default(),
            http_client: None,
        }
    }

    /// Sets the collection service URL.
    pub fn url(self, url: impl Into<String>) -> ShelfClientBuilder<Set<String>> {
        ShelfClientBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            retry_config: self.retry_config,
            http_client: self.http_client,
        }
    }
}

impl Default for ShelfClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> ShelfClientBuilder<U> {
    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the retry policy. Defaults to [`RetryConfig::default`].
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl ShelfClientBuilder<Set<String>> {
    /// Builds the [`ShelfClient`].
    pub fn build(self) -> ShelfClient {
        let http_client = self.http_client.unwrap_or_else(|| {
            let mut builder = Client::builder();
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder.build().expect("Failed to build HTTP client")
        });

        ShelfClient {
            inner: Arc::new(ShelfClientInner {
                base_url: self.url.0,
                http_client,
                timeout: self.timeout,
                retry_config: self.retry_config,
            }),
        }
    }
}
