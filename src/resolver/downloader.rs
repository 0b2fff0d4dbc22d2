//! Icon asset downloader
//!
//! Fetches a single candidate image and encodes it as a `data:` URI. Any
//! response other than a non-empty `200` is a failure; redirects are not
//! followed.

use crate::resolver::transport::{HttpRequest, Transport, TransportError};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Content type assumed when the server does not send one
pub const DEFAULT_ICON_CONTENT_TYPE: &str = "image/x-icon";

/// Why a download produced no icon
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    #[error("Invalid icon URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Empty body for {url}")]
    EmptyBody { url: String },
}

/// Downloads icon assets through the shared transport
#[derive(Clone)]
pub struct AssetDownloader {
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl AssetDownloader {
    /// Creates a downloader
    ///
    /// # Arguments
    ///
    /// * `transport` - The HTTP transport
    /// * `timeout` - Whole-request timeout per download
    pub fn new(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Downloads an icon given as a string, resolving nothing
    ///
    /// The string must already be an absolute URL.
    pub async fn download_str(&self, icon_url: &str) -> Result<String, DownloadError> {
        let url = Url::parse(icon_url).map_err(|e| DownloadError::InvalidUrl {
            url: icon_url.to_string(),
            message: e.to_string(),
        })?;
        self.download(&url).await
    }

    /// Downloads an icon and encodes it as a data URI
    ///
    /// # Arguments
    ///
    /// * `icon_url` - Absolute URL of the image
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - `data:<content-type>;base64,<payload>`
    /// * `Err(DownloadError)` - Network failure, non-200 status, or empty body
    pub async fn download(&self, icon_url: &Url) -> Result<String, DownloadError> {
        let request = HttpRequest::get(icon_url.clone(), self.timeout);
        let response = self.transport.execute(request).await?;

        if !response.is_ok() {
            return Err(DownloadError::Status {
                url: icon_url.to_string(),
                status: response.status,
            });
        }

        if response.body.is_empty() {
            return Err(DownloadError::EmptyBody {
                url: icon_url.to_string(),
            });
        }

        let content_type = response
            .content_type
            .as_deref()
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_ICON_CONTENT_TYPE);

        Ok(encode_data_uri(content_type, &response.body))
    }
}

/// Encodes bytes as a base64 data URI
///
/// # Examples
///
/// ```
/// use bookmark_icons::resolver::encode_data_uri;
///
/// assert_eq!(encode_data_uri("image/png", b"hi"), "data:image/png;base64,aGk=");
/// ```
pub fn encode_data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(bytes))
}
