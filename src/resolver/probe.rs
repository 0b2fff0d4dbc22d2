//! Standard icon location prober
//!
//! Sites that never declare an icon in their markup usually still serve one
//! from a conventional path. The prober issues a HEAD request for each path in
//! a fixed order and reports the first one answering `200`.

use crate::resolver::transport::{HttpRequest, Transport};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Conventional icon paths, most common first
pub const STANDARD_ICON_PATHS: &[&str] = &[
    "/favicon.ico",
    "/apple-touch-icon.png",
    "/apple-touch-icon-120x120.png",
    "/apple-touch-icon-152x152.png",
    "/apple-touch-icon-180x180.png",
    "/apple-touch-icon-precomposed.png",
    "/apple-icon.png",
    "/android-chrome-192x192.png",
    "/icon-192x192.png",
    "/icon.png",
    "/favicon.png",
    "/favicon-32x32.png",
    "/favicon-16x16.png",
];

/// Probes the standard icon paths of an origin
#[derive(Clone)]
pub struct StandardLocationProber {
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl StandardLocationProber {
    pub fn new(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Finds the first standard path that exists
    ///
    /// # Arguments
    ///
    /// * `base` - Any URL on the site; only its origin is used
    ///
    /// # Returns
    ///
    /// * `Some(Url)` - The first path answering HEAD with `200`
    /// * `None` - No path answered `200` (redirects and errors count as misses)
    pub async fn probe(&self, base: &Url) -> Option<Url> {
        for path in STANDARD_ICON_PATHS {
            let Ok(candidate) = base.join(path) else {
                continue;
            };

            let request = HttpRequest::head(candidate.clone(), self.timeout);
            match self.transport.execute(request).await {
                Ok(response) if response.is_ok() => {
                    tracing::debug!("Found icon at standard location {}", candidate);
                    return Some(candidate);
                }
                Ok(response) => {
                    tracing::trace!("HEAD {} -> {}", candidate, response.status);
                }
                Err(e) => {
                    tracing::debug!("HEAD {} failed: {}", candidate, e);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::testing::StubTransport;
    use crate::resolver::transport::HttpMethod;

    fn prober(stub: &Arc<StubTransport>) -> StandardLocationProber {
        StandardLocationProber::new(stub.clone(), Duration::from_secs(10))
    }

    #[test]
    fn test_path_list_order() {
        assert_eq!(STANDARD_ICON_PATHS.len(), 13);
        assert_eq!(STANDARD_ICON_PATHS[0], "/favicon.ico");
        assert_eq!(STANDARD_ICON_PATHS[12], "/favicon-16x16.png");
    }

    #[tokio::test]
    async fn test_first_hit_wins() {
        let stub = Arc::new(
            StubTransport::new()
                .status(HttpMethod::Head, "https://example.com/icon.png", 200)
                .status(HttpMethod::Head, "https://example.com/favicon.png", 200),
        );
        let base = Url::parse("https://example.com/deep/page?q=1").unwrap();

        let found = prober(&stub).probe(&base).await;

        assert_eq!(found.unwrap().as_str(), "https://example.com/icon.png");
        // Paths after the hit are never probed
        assert!(!stub.called(HttpMethod::Head, "https://example.com/favicon.png"));
    }

    #[tokio::test]
    async fn test_all_paths_probed_with_head_on_miss() {
        let stub = Arc::new(StubTransport::new());
        let base = Url::parse("https://example.com/").unwrap();

        assert!(prober(&stub).probe(&base).await.is_none());

        let calls = stub.calls();
        assert_eq!(calls.len(), STANDARD_ICON_PATHS.len());
        assert!(calls.iter().all(|(method, _)| *method == HttpMethod::Head));
    }

    #[tokio::test]
    async fn test_redirect_is_not_a_hit() {
        let stub = Arc::new(
            StubTransport::new()
                .status(HttpMethod::Head, "https://example.com/favicon.ico", 301)
                .status(HttpMethod::Head, "https://example.com/favicon.png", 200),
        );
        let base = Url::parse("https://example.com/").unwrap();

        let found = prober(&stub).probe(&base).await;
        assert_eq!(found.unwrap().as_str(), "https://example.com/favicon.png");
    }

    #[tokio::test]
    async fn test_network_errors_are_skipped() {
        let stub = Arc::new(
            StubTransport::new()
                .fail(HttpMethod::Head, "https://example.com/favicon.ico")
                .status(HttpMethod::Head, "https://example.com/apple-touch-icon.png", 200),
        );
        let base = Url::parse("https://example.com/").unwrap();

        let found = prober(&stub).probe(&base).await;
        assert_eq!(
            found.unwrap().as_str(),
            "https://example.com/apple-touch-icon.png"
        );
    }

    #[tokio::test]
    async fn test_port_is_kept() {
        let stub = Arc::new(
            StubTransport::new().status(HttpMethod::Head, "http://localhost:8080/favicon.ico", 200),
        );
        let base = Url::parse("http://localhost:8080/app").unwrap();

        let found = prober(&stub).probe(&base).await;
        assert_eq!(found.unwrap().as_str(), "http://localhost:8080/favicon.ico");
    }
}
