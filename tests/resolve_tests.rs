//! End-to-end resolution tests
//!
//! These use wiremock to run real HTTP servers and the production reqwest
//! transport.

mod common;

use bookmark_icons::config::{Config, ResolverConfig};
use bookmark_icons::resolver::ReqwestTransport;
use bookmark_icons::{FaviconResolver, IconCache, MemoryCache, SqliteCache, Stage};
use common::PIXEL_PNG;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver() -> FaviconResolver {
    let config = ResolverConfig::default();
    let transport = ReqwestTransport::new(&config).unwrap();
    FaviconResolver::new(config, Arc::new(transport))
}

#[tokio::test]
async fn test_shortcut_icon_resolved_and_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><head><link rel="shortcut icon" href="/i.png"></head></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/i.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PIXEL_PNG, "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(MemoryCache::new());
    let resolver = resolver().with_cache(cache.clone(), Duration::from_secs(3600));

    let resolved = resolver.resolve(&server.uri()).await.unwrap();
    assert_eq!(resolved.stage, Stage::HtmlCandidates);
    assert!(resolved.data_uri.starts_with("data:image/png;base64,iVBORw0KGgo"));

    let cached = cache.get(&server.uri()).await.unwrap();
    assert_eq!(cached.as_deref(), Some(resolved.data_uri.as_str()));

    // Same origin, different path: served from cache without another download
    let again = resolver
        .resolve(&format!("{}/some/article", server.uri()))
        .await
        .unwrap();
    assert_eq!(again.stage, Stage::CacheCheck);
    assert_eq!(again.data_uri, resolved.data_uri);
}

#[tokio::test]
async fn test_sign_in_redirect_is_not_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/login"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<link rel="icon" href="/login-icon.png">"#,
            "text/html",
        ))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8, 0, 1, 0], "image/x-icon"))
        .mount(&server)
        .await;

    let resolved = resolver().resolve(&server.uri()).await.unwrap();
    assert_eq!(resolved.stage, Stage::DefaultIcon);
    assert_eq!(resolved.data_uri, "data:image/x-icon;base64,AAABAA==");
}

#[tokio::test]
async fn test_default_icon_when_head_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PIXEL_PNG, "image/png"))
        .mount(&server)
        .await;

    let resolved = resolver().resolve(&server.uri()).await.unwrap();
    assert_eq!(resolved.stage, Stage::DefaultIcon);
    assert!(resolved.data_uri.starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_not_found_is_not_cached() {
    let server = MockServer::start().await;

    let cache = Arc::new(MemoryCache::new());
    let resolver = resolver().with_cache(cache.clone(), Duration::from_secs(3600));

    assert!(resolver.resolve_favicon(&server.uri()).await.is_err());
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_from_config_with_sqlite_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PIXEL_PNG, "image/png"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("icons.db");
    let toml = format!(
        "[cache]\nbackend = \"sqlite\"\ndatabase-path = \"{}\"\n",
        db_path.display().to_string().replace('\\', "\\\\")
    );
    let config: Config = bookmark_icons::config::parse_config(&toml).unwrap();

    let resolver = FaviconResolver::from_config(&config).unwrap();
    let data_uri = resolver.resolve_favicon(&server.uri()).await.unwrap();
    drop(resolver);

    let reopened = SqliteCache::new(&db_path).unwrap();
    let cached = reopened.get(&server.uri()).await.unwrap();
    assert_eq!(cached, Some(data_uri));
}
