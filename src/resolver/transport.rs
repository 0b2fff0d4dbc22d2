//! HTTP transport seam
//!
//! Every network call the resolver makes (page fetches, HEAD probes, asset
//! downloads) goes through the [`Transport`] trait:
//! - [`ReqwestTransport`] is the production implementation
//! - tests substitute in-memory fakes that record calls
//!
//! The transport never follows redirects on its own. Callers see every 3xx
//! and decide what to do with it.

use crate::config::ResolverConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client, Method};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Connection establishment timeout for the production client
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP methods the resolver issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Head,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Head => write!(f, "HEAD"),
        }
    }
}

/// A single outgoing request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    /// Extra headers, in the order they are sent
    pub headers: Vec<(&'static str, String)>,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: Url, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            timeout,
        }
    }

    pub fn head(url: Url, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Head,
            url,
            headers: Vec::new(),
            timeout,
        }
    }

    /// Adds a header to the request
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

/// A received response, fully buffered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// The URL that produced this response
    pub url: Url,
    pub status: u16,
    /// Raw `Content-Type` header, if present
    pub content_type: Option<String>,
    /// Raw `Location` header, if present
    pub location: Option<String>,
    /// Body bytes (always empty for HEAD)
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true for status 200
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Returns true for any 3xx status
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

/// Network-level failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Request failed for {url}: {message}")]
    Request { url: String, message: String },
}

impl TransportError {
    /// Classifies a reqwest failure the way the resolver reports it
    pub fn from_reqwest(url: &Url, error: &reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect {
                url,
                message: error.to_string(),
            }
        } else {
            Self::Request {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// Executes HTTP requests on behalf of the resolver
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request without following redirects
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Transport backed by a pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds the production transport
    ///
    /// The client negotiates gzip and brotli itself, keeps redirects manual,
    /// and applies a connect timeout. Whole-request timeouts come from each
    /// [`HttpRequest`].
    ///
    /// # Arguments
    ///
    /// * `config` - The resolver configuration (for the User-Agent)
    ///
    /// # Returns
    ///
    /// * `Ok(ReqwestTransport)` - Successfully built transport
    /// * `Err(reqwest::Error)` - Failed to build the client
    pub fn new(config: &ResolverConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent())
            .connect_timeout(CONNECT_TIMEOUT)
            .redirect(Policy::none()) // Handle redirects manually
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Head => Method::HEAD,
        };

        let mut builder = self
            .client
            .request(method, request.url.clone())
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&request.url, &e))?;

        let status = response.status().as_u16();
        let url = response.url().clone();
        let content_type = header_value(response.headers(), CONTENT_TYPE);
        let location = header_value(response.headers(), LOCATION);

        let body = match request.method {
            HttpMethod::Head => Vec::new(),
            HttpMethod::Get => response
                .bytes()
                .await
                .map_err(|e| TransportError::from_reqwest(&request.url, &e))?
                .to_vec(),
        };

        Ok(HttpResponse {
            url,
            status,
            content_type,
            location,
            body,
        })
    }
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
