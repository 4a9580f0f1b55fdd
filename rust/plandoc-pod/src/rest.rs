//! HTTP client for issuing raw requests against a Pod

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};

use crate::{HttpClient, PodError, Reference};

/// Authentication methods for [RestClient]
#[derive(Clone, Debug)]
pub enum AuthMethod {
    /// No authentication
    None,

    /// Bearer token authentication
    ///
    /// Includes `Authorization: Bearer {token}` header in all requests
    Bearer(String),
}

/// Configuration for [RestClient]
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Authentication method
    pub auth_method: AuthMethod,

    /// Optional timeout for requests in seconds (default: 30)
    pub timeout_seconds: Option<u64>,

    /// Optional custom headers to send with each request
    pub headers: Vec<(String, String)>,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            auth_method: AuthMethod::None,
            timeout_seconds: Some(30),
            headers: Vec::new(),
        }
    }
}

impl RestClientConfig {
    /// Set the authentication method
    pub fn with_auth(mut self, auth_method: AuthMethod) -> Self {
        self.auth_method = auth_method;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

/// An [HttpClient] that issues requests over the network via `reqwest`
///
/// ```no_run
/// use plandoc_pod::{AuthMethod, HttpClient, Reference, RestClient, RestClientConfig};
/// use reqwest::Method;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RestClientConfig::default()
///     .with_auth(AuthMethod::Bearer("my-token".to_string()))
///     .with_timeout(60);
/// let client = RestClient::new(config)?;
///
/// let status = client
///     .fetch(&Reference::new("https://some.pod/container/.dummy"), Method::DELETE)
///     .await?;
/// assert!(status.is_success());
/// # Ok(())
/// # }
/// ```
///
/// A [Pod](crate::Pod) backed by a real server hands its [RestClient] to
/// the resolvers through [Pod::client](crate::Pod::client). They use it for
/// requests such as removing the placeholder Document left behind when a
/// Container is created:
///
/// ```no_run
/// use async_trait::async_trait;
/// use plandoc_pod::{
///     HttpClient, MemoryDocument, MemoryPod, Pod, PodError, Reference, RestClient,
///     RestClientConfig,
/// };
/// use reqwest::Method;
///
/// #[derive(Clone, Debug)]
/// struct ServerPod {
///     documents: MemoryPod,
///     client: RestClient,
/// }
///
/// #[async_trait]
/// impl Pod for ServerPod {
///     type Document = MemoryDocument;
///     type Client = RestClient;
///
///     async fn fetch_document(&self, reference: &Reference) -> Result<MemoryDocument, PodError> {
///         self.documents.fetch_document(reference).await
///     }
///
///     fn create_document(&self, reference: &Reference) -> MemoryDocument {
///         self.documents.create_document(reference)
///     }
///
///     fn create_document_in_container(&self, container: &Reference) -> MemoryDocument {
///         self.documents.create_document_in_container(container)
///     }
///
///     fn client(&self) -> &RestClient {
///         &self.client
///     }
/// }
///
/// # async fn example() -> Result<(), PodError> {
/// let pod = ServerPod {
///     documents: MemoryPod::new(),
///     client: RestClient::new(RestClientConfig::default())?,
/// };
///
/// let placeholder = Reference::new("https://some.pod/notes/.dummy");
/// let status = pod.client().fetch(&placeholder, Method::DELETE).await?;
/// assert!(status.is_success());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct RestClient {
    config: RestClientConfig,
    client: Client,
}

impl RestClient {
    /// Create a new [RestClient] with the given configuration
    pub fn new(config: RestClientConfig) -> Result<Self, PodError> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout_seconds {
            client_builder = client_builder.timeout(std::time::Duration::from_secs(timeout));
        }

        let client = client_builder
            .build()
            .map_err(|error| PodError::RequestFailed {
                reference: Reference::new(""),
                reason: format!("Could not build HTTP client: {error}"),
            })?;

        Ok(Self { config, client })
    }

    /// Build a request with authentication and custom headers
    fn build_request(&self, url: &Reference, method: Method) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, url.as_str());

        match &self.config.auth_method {
            AuthMethod::None => {}
            AuthMethod::Bearer(token) => {
                builder = builder.bearer_auth(token);
            }
        }

        for (key, value) in &self.config.headers {
            builder = builder.header(key, value);
        }

        builder
    }
}

#[async_trait]
impl HttpClient for RestClient {
    async fn fetch(&self, url: &Reference, method: Method) -> Result<StatusCode, PodError> {
        tracing::debug!(%url, %method, "Sending request");
        let response = self
            .build_request(url, method)
            .send()
            .await
            .map_err(|error| PodError::RequestFailed {
                reference: url.clone(),
                reason: format!("HTTP request failed: {error}"),
            })?;

        let status = response.status();
        tracing::trace!(%url, %status, "Received response");

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PodError::Unauthorized {
                reference: url.clone(),
                reason: format!(
                    "HTTP {} - {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = RestClientConfig::default()
            .with_auth(AuthMethod::Bearer("token123".to_string()))
            .with_timeout(60)
            .with_header("X-Custom", "value");

        assert!(matches!(config.auth_method, AuthMethod::Bearer(_)));
        assert_eq!(config.timeout_seconds, Some(60));
        assert_eq!(config.headers.len(), 1);
    }

    #[test]
    fn test_request_carries_auth_and_headers() {
        let config = RestClientConfig::default()
            .with_auth(AuthMethod::Bearer("token123".to_string()))
            .with_header("X-Custom", "value");
        let client = RestClient::new(config).unwrap();

        let request = client
            .build_request(
                &Reference::new("https://some.pod/container/.dummy"),
                Method::DELETE,
            )
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::DELETE);
        assert_eq!(request.url().as_str(), "https://some.pod/container/.dummy");
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer token123"
        );
        assert_eq!(request.headers().get("x-custom").unwrap(), "value");
    }

    #[test]
    fn test_request_without_auth() {
        let client = RestClient::new(RestClientConfig::default()).unwrap();

        let request = client
            .build_request(&Reference::new("https://some.pod/document.ttl"), Method::GET)
            .build()
            .unwrap();

        assert!(request.headers().get("authorization").is_none());
    }
}
