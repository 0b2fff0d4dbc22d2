//! Favicon resolution engine
//!
//! This module contains everything between a raw URL and an encoded icon:
//! - the HTTP transport seam and the asset downloader
//! - the discovery sources (known services, standard paths, page `<link>`
//!   elements, regex fallback)
//! - the single-URL cascade and the bounded-concurrency batch mode

mod batch;
mod candidates;
mod cascade;
mod downloader;
mod known;
mod page;
mod pattern;
mod probe;
mod stage;
mod transport;

#[cfg(test)]
mod testing;

pub use batch::{BatchReport, IconTarget};
pub use candidates::{extract_icon_candidates, rel_priority, IconCandidate, REL_PRIORITIES};
pub use cascade::{default_cascade, FaviconResolver, ResolvedIcon, Strategy, Target};
pub use downloader::{encode_data_uri, AssetDownloader, DownloadError, DEFAULT_ICON_CONTENT_TYPE};
pub use known::{known_service_icon, KNOWN_SERVICE_ICONS};
pub use page::{is_auth_redirect, FetchedPage, PageFetcher, PageOutcome, ShortCircuit};
pub use pattern::find_icon_url;
pub use probe::{StandardLocationProber, STANDARD_ICON_PATHS};
pub use stage::Stage;
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError,
};
