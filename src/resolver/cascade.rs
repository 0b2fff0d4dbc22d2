//! Single-URL resolution cascade
//!
//! This module contains the orchestration for resolving one URL:
//! - cache lookup keyed by origin
//! - an ordered list of [`Strategy`] objects tried until one yields an icon
//! - cache store on success, nothing on failure
//!
//! The target page is fetched lazily through [`Target::page`], at most once
//! per resolution, and only when a strategy actually needs it.

use crate::cache::{open_cache, IconCache, DEFAULT_ICON_TTL};
use crate::config::{Config, ResolverConfig};
use crate::resolver::candidates::extract_icon_candidates;
use crate::resolver::downloader::AssetDownloader;
use crate::resolver::known::known_service_icon;
use crate::resolver::page::{PageFetcher, PageOutcome};
use crate::resolver::pattern::find_icon_url;
use crate::resolver::probe::StandardLocationProber;
use crate::resolver::stage::Stage;
use crate::resolver::transport::{ReqwestTransport, Transport};
use crate::url::{ensure_scheme, normalize_origin};
use crate::{IconError, ResolveError, ResolveResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use url::Url;

/// A successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIcon {
    /// The cache key the icon is stored under
    pub origin: String,
    /// `data:<content-type>;base64,<payload>`
    pub data_uri: String,
    /// The stage that produced the icon
    pub stage: Stage,
}

/// The URL being resolved, shared by every strategy of one resolution
pub struct Target<'a> {
    origin: String,
    url: Option<Url>,
    pages: &'a PageFetcher,
    page: OnceCell<PageOutcome>,
}

impl<'a> Target<'a> {
    /// Prepares a raw user-supplied URL for resolution
    pub fn new(raw: &str, pages: &'a PageFetcher) -> Self {
        let with_scheme = ensure_scheme(raw);
        Self {
            origin: normalize_origin(raw),
            url: Url::parse(&with_scheme).ok(),
            pages,
            page: OnceCell::new(),
        }
    }

    /// The origin the result will be cached under
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The parsed target URL, if the input was parseable
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Fetches the target page on first use and returns the outcome
    pub async fn page(&self) -> Option<&PageOutcome> {
        let url = self.url.as_ref()?;
        Some(self.page.get_or_init(|| self.pages.fetch(url)).await)
    }

    /// The URL icon paths are resolved against (the final page URL when the
    /// page was fetched, the original target otherwise)
    pub async fn base(&self) -> Option<&Url> {
        self.page().await.map(PageOutcome::base)
    }

    /// Returns true once the page has been requested
    pub fn page_requested(&self) -> bool {
        self.page.initialized()
    }
}

/// One step of the cascade
#[async_trait]
pub trait Strategy: Send + Sync {
    /// The stage reported when this strategy succeeds
    fn stage(&self) -> Stage;

    /// Tries to produce an icon for the target
    ///
    /// # Returns
    ///
    /// * `Some(data_uri)` - The cascade stops here
    /// * `None` - Move on to the next strategy
    async fn attempt(&self, target: &Target<'_>) -> Option<String>;
}

/// Downloads the hard-coded icon of a well-known service
pub struct KnownServiceStrategy {
    downloader: AssetDownloader,
}

#[async_trait]
impl Strategy for KnownServiceStrategy {
    fn stage(&self) -> Stage {
        Stage::KnownService
    }

    async fn attempt(&self, target: &Target<'_>) -> Option<String> {
        let icon = known_service_icon(target.url()?)?;
        download_logged(&self.downloader, icon, target.origin()).await
    }
}

/// Probes the conventional icon paths with HEAD, then downloads the first hit
pub struct StandardLocationStrategy {
    prober: StandardLocationProber,
    downloader: AssetDownloader,
}

#[async_trait]
impl Strategy for StandardLocationStrategy {
    fn stage(&self) -> Stage {
        Stage::StandardLocation
    }

    async fn attempt(&self, target: &Target<'_>) -> Option<String> {
        let base = target.base().await?;
        let found = self.prober.probe(base).await?;
        // A failed download of the probed path ends this stage
        download_url_logged(&self.downloader, &found, target.origin()).await
    }
}

/// Tries the ranked `<link>` icon declarations of the page
pub struct HtmlCandidateStrategy {
    downloader: AssetDownloader,
}

#[async_trait]
impl Strategy for HtmlCandidateStrategy {
    fn stage(&self) -> Stage {
        Stage::HtmlCandidates
    }

    async fn attempt(&self, target: &Target<'_>) -> Option<String> {
        let page = target.page().await?.page()?;
        let candidates = extract_icon_candidates(&page.body, &page.final_url);
        tracing::debug!("{}: {} icon candidates in page", target.origin(), candidates.len());

        for candidate in candidates {
            if let Some(data_uri) =
                download_url_logged(&self.downloader, &candidate.url, target.origin()).await
            {
                return Some(data_uri);
            }
        }

        None
    }
}

/// Scans the raw page text for icon-like declarations
pub struct RegexFallbackStrategy {
    downloader: AssetDownloader,
}

#[async_trait]
impl Strategy for RegexFallbackStrategy {
    fn stage(&self) -> Stage {
        Stage::RegexFallback
    }

    async fn attempt(&self, target: &Target<'_>) -> Option<String> {
        let page = target.page().await?.page()?;
        let icon = find_icon_url(&page.body, &page.final_url)?;
        download_url_logged(&self.downloader, &icon, target.origin()).await
    }
}

/// GETs `/favicon.ico` on the base without probing first
///
/// Covers servers that reject HEAD but serve the file on GET.
pub struct DefaultIconStrategy {
    downloader: AssetDownloader,
}

#[async_trait]
impl Strategy for DefaultIconStrategy {
    fn stage(&self) -> Stage {
        Stage::DefaultIcon
    }

    async fn attempt(&self, target: &Target<'_>) -> Option<String> {
        let icon = target.base().await?.join("/favicon.ico").ok()?;
        download_url_logged(&self.downloader, &icon, target.origin()).await
    }
}

async fn download_logged(downloader: &AssetDownloader, icon: &str, origin: &str) -> Option<String> {
    match downloader.download_str(icon).await {
        Ok(data_uri) => Some(data_uri),
        Err(e) => {
            tracing::debug!("{}: {}", origin, e);
            None
        }
    }
}

async fn download_url_logged(
    downloader: &AssetDownloader,
    icon: &Url,
    origin: &str,
) -> Option<String> {
    match downloader.download(icon).await {
        Ok(data_uri) => Some(data_uri),
        Err(e) => {
            tracing::debug!("{}: {}", origin, e);
            None
        }
    }
}

/// Builds the standard cascade
///
/// Order: known service, standard locations, HTML candidates, regex
/// fallback, default icon.
pub fn default_cascade(
    transport: &Arc<dyn Transport>,
    config: &ResolverConfig,
) -> Vec<Box<dyn Strategy>> {
    let downloader = AssetDownloader::new(transport.clone(), config.download_timeout());
    let prober = StandardLocationProber::new(transport.clone(), config.probe_timeout());

    vec![
        Box::new(KnownServiceStrategy {
            downloader: downloader.clone(),
        }),
        Box::new(StandardLocationStrategy {
            prober,
            downloader: downloader.clone(),
        }),
        Box::new(HtmlCandidateStrategy {
            downloader: downloader.clone(),
        }),
        Box::new(RegexFallbackStrategy {
            downloader: downloader.clone(),
        }),
        Box::new(DefaultIconStrategy { downloader }),
    ]
}

/// Resolves URLs to embeddable icons
pub struct FaviconResolver {
    config: ResolverConfig,
    cache: Option<Arc<dyn IconCache>>,
    cache_ttl: Duration,
    pages: PageFetcher,
    cascade: Vec<Box<dyn Strategy>>,
}

impl FaviconResolver {
    /// Creates a resolver without a cache
    ///
    /// # Arguments
    ///
    /// * `config` - The resolver configuration
    /// * `transport` - The HTTP transport every request goes through
    pub fn new(config: ResolverConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            pages: PageFetcher::new(transport.clone(), &config),
            cascade: default_cascade(&transport, &config),
            config,
            cache: None,
            cache_ttl: DEFAULT_ICON_TTL,
        }
    }

    /// Attaches a cache backend
    ///
    /// # Arguments
    ///
    /// * `cache` - The cache gateway
    /// * `ttl` - Lifetime of entries written by this resolver
    pub fn with_cache(mut self, cache: Arc<dyn IconCache>, ttl: Duration) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl;
        self
    }

    /// Replaces the strategy list
    ///
    /// Strategies are tried in the given order after the cache check.
    pub fn with_cascade(mut self, cascade: Vec<Box<dyn Strategy>>) -> Self {
        self.cascade = cascade;
        self
    }

    /// Builds a production resolver from a full configuration
    ///
    /// # Returns
    ///
    /// * `Ok(FaviconResolver)` - reqwest transport plus the configured cache
    /// * `Err(IconError)` - The HTTP client or cache backend failed to open
    pub fn from_config(config: &Config) -> Result<Self, IconError> {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(&config.resolver)?);
        let mut resolver = Self::new(config.resolver.clone(), transport);

        if let Some(cache) = open_cache(&config.cache)? {
            resolver = resolver.with_cache(cache, config.cache.ttl());
        }

        Ok(resolver)
    }

    /// The resolver configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The strategy stages in the order they are tried
    pub fn stages(&self) -> Vec<Stage> {
        self.cascade.iter().map(|strategy| strategy.stage()).collect()
    }

    /// Resolves a URL to a data URI
    ///
    /// # Arguments
    ///
    /// * `url` - Any user-supplied URL, scheme optional
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - `data:<content-type>;base64,<payload>`
    /// * `Err(ResolveError)` - No stage produced an icon, or the deadline passed
    pub async fn resolve_favicon(&self, url: &str) -> ResolveResult<String> {
        self.resolve(url).await.map(|resolved| resolved.data_uri)
    }

    /// Resolves a URL and reports how the icon was found
    ///
    /// When `overall-deadline-secs` is configured the whole cascade is
    /// bounded by it.
    pub async fn resolve(&self, url: &str) -> ResolveResult<ResolvedIcon> {
        let Some(deadline) = self.config.overall_deadline() else {
            return self.run_cascade(url).await;
        };

        match tokio::time::timeout(deadline, self.run_cascade(url)).await {
            Ok(result) => result,
            Err(_) => {
                let origin = normalize_origin(url);
                tracing::warn!(
                    "Icon resolution for {} gave up after {}s",
                    origin,
                    deadline.as_secs()
                );
                Err(ResolveError::DeadlineExceeded {
                    origin,
                    seconds: deadline.as_secs(),
                })
            }
        }
    }

    async fn run_cascade(&self, url: &str) -> ResolveResult<ResolvedIcon> {
        let target = Target::new(url, &self.pages);
        let origin = target.origin().to_string();

        if let Some(data_uri) = self.cached(&origin).await {
            tracing::debug!("{}: cache hit", origin);
            return Ok(ResolvedIcon {
                origin,
                data_uri,
                stage: Stage::CacheCheck,
            });
        }

        for strategy in &self.cascade {
            let stage = strategy.stage();
            tracing::debug!("{}: trying {}", origin, stage);

            if let Some(data_uri) = strategy.attempt(&target).await {
                tracing::info!("Resolved icon for {} via {}", origin, stage);
                self.store(&origin, &data_uri).await;
                return Ok(ResolvedIcon {
                    origin,
                    data_uri,
                    stage,
                });
            }
        }

        tracing::info!("No icon found for {}", origin);
        Err(ResolveError::NotFound { origin })
    }

    async fn cached(&self, origin: &str) -> Option<String> {
        let cache = self.cache.as_ref()?;
        match cache.get(origin).await {
            Ok(Some(data_uri)) if !data_uri.is_empty() => Some(data_uri),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Icon cache lookup failed for {}, resolving live: {}", origin, e);
                None
            }
        }
    }

    async fn store(&self, origin: &str, data_uri: &str) {
        let Some(cache) = &self.cache else {
            return;
        };
        if let Err(e) = cache.put(origin, data_uri, self.cache_ttl).await {
            tracing::warn!("Failed to cache icon for {}: {}", origin, e);
        }
    }
}
