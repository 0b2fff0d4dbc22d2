//! Target page fetcher
//!
//! This module fetches the HTML of the bookmarked page so its icon metadata
//! can be read:
//! - browser-like request headers (some sites serve bots a different page)
//! - redirects followed manually, up to a configured limit
//! - redirects towards sign-in pages are not followed
//!
//! Whenever the page cannot be obtained the outcome is "base only": icon
//! discovery continues against the site origin without page metadata.

use crate::config::ResolverConfig;
use crate::resolver::transport::{HttpRequest, Transport};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Redirect targets containing any of these are treated as sign-in walls
pub const AUTH_REDIRECT_MARKERS: &[&str] = &["login", "signin", "auth", "accounts.google.com"];

const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// A successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL of the final response after redirects
    pub final_url: Url,
    /// Body decoded as (lossy) UTF-8
    pub body: String,
}

/// Why page discovery was abandoned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortCircuit {
    /// A redirect pointed at a sign-in page
    AuthRedirect { location: String },
    /// The final response was not `200`
    Status(u16),
    /// More redirects than allowed
    RedirectLimit,
    /// The request itself failed
    Network(String),
}

impl fmt::Display for ShortCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthRedirect { location } => write!(f, "redirect to sign-in page {}", location),
            Self::Status(status) => write!(f, "status {}", status),
            Self::RedirectLimit => write!(f, "too many redirects"),
            Self::Network(message) => write!(f, "network error: {}", message),
        }
    }
}

/// Result of a page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page HTML is available
    Fetched(FetchedPage),
    /// Only the original target URL is usable
    BaseOnly { base: Url, reason: ShortCircuit },
}

impl PageOutcome {
    /// The URL icon paths should be resolved against
    pub fn base(&self) -> &Url {
        match self {
            Self::Fetched(page) => &page.final_url,
            Self::BaseOnly { base, .. } => base,
        }
    }

    /// The fetched page, if discovery may read its HTML
    pub fn page(&self) -> Option<&FetchedPage> {
        match self {
            Self::Fetched(page) => Some(page),
            Self::BaseOnly { .. } => None,
        }
    }
}

/// Fetches target pages with manual redirect handling
#[derive(Clone)]
pub struct PageFetcher {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    max_redirects: u32,
    user_agent: String,
}

impl PageFetcher {
    /// Creates a page fetcher from the resolver configuration
    pub fn new(transport: Arc<dyn Transport>, config: &ResolverConfig) -> Self {
        Self {
            transport,
            timeout: config.page_timeout(),
            max_redirects: config.max_redirects,
            user_agent: config.user_agent().to_string(),
        }
    }

    /// Fetches a page
    ///
    /// # Request Flow
    ///
    /// 1. GET the URL with browser headers
    /// 2. On 3xx, resolve `Location` against the current URL
    ///    - a target containing a sign-in marker ends the fetch (base only)
    ///    - otherwise follow it, at most `max-redirects` times
    /// 3. A final `200` yields the page; anything else is base only
    ///
    /// # Arguments
    ///
    /// * `target` - The bookmarked URL
    ///
    /// # Returns
    ///
    /// The page, or the reason discovery must fall back to the base URL
    pub async fn fetch(&self, target: &Url) -> PageOutcome {
        let base_only = |reason: ShortCircuit| {
            tracing::debug!("Page discovery for {} limited to base: {}", target, reason);
            PageOutcome::BaseOnly {
                base: target.clone(),
                reason,
            }
        };

        let mut current = target.clone();
        let mut redirects = 0;

        loop {
            let response = match self.transport.execute(self.browser_request(&current)).await {
                Ok(response) => response,
                Err(e) => return base_only(ShortCircuit::Network(e.to_string())),
            };

            if response.is_redirect() {
                let Some(next) = response
                    .location
                    .as_deref()
                    .and_then(|location| current.join(location.trim()).ok())
                else {
                    return base_only(ShortCircuit::Status(response.status));
                };

                if is_auth_redirect(next.as_str()) {
                    return base_only(ShortCircuit::AuthRedirect {
                        location: next.to_string(),
                    });
                }

                if redirects >= self.max_redirects {
                    return base_only(ShortCircuit::RedirectLimit);
                }

                tracing::trace!("Following redirect {} -> {}", current, next);
                redirects += 1;
                current = next;
                continue;
            }

            if !response.is_ok() {
                return base_only(ShortCircuit::Status(response.status));
            }

            return PageOutcome::Fetched(FetchedPage {
                final_url: response.url,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }
    }

    fn browser_request(&self, url: &Url) -> HttpRequest {
        HttpRequest::get(url.clone(), self.timeout)
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", BROWSER_ACCEPT)
            .header("Accept-Language", BROWSER_ACCEPT_LANGUAGE)
            .header("DNT", "1")
            .header("Upgrade-Insecure-Requests", "1")
    }
}

/// Checks whether a resolved redirect target looks like a sign-in page
///
/// The match is a case-sensitive substring test, so `/Login` is followed
/// while `/login` is not.
pub fn is_auth_redirect(location: &str) -> bool {
    AUTH_REDIRECT_MARKERS
        .iter()
        .any(|marker| location.contains(marker))
}
