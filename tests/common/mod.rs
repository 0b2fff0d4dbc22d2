//! Shared helpers for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use bookmark_icons::resolver::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// One-pixel transparent PNG
pub const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

type Handler = dyn Fn(&HttpRequest) -> Option<HttpResponse> + Send + Sync;

/// Transport driven by a closure, with a call log and in-flight tracking
///
/// The handler returns `None` for a connection failure. Every request sleeps
/// for the configured latency while counted as in flight; requests to a
/// stalled host never complete.
pub struct FakeTransport {
    handler: Box<Handler>,
    latency: Duration,
    stalled_hosts: Vec<String>,
    calls: Mutex<Vec<(HttpMethod, String)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> Option<HttpResponse> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            latency: Duration::ZERO,
            stalled_hosts: Vec::new(),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_stalled_host(mut self, host: &str) -> Self {
        self.stalled_hosts.push(host.to_string());
        self
    }

    /// Every request so far, in the order they were issued
    pub fn calls(&self) -> Vec<(HttpMethod, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// URLs of the GET requests so far
    pub fn gets(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(method, _)| *method == HttpMethod::Get)
            .map(|(_, url)| url)
            .collect()
    }

    /// Highest number of requests that were in flight at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.method, request.url.to_string()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let host = request.url.host_str().unwrap_or_default();
        if self.stalled_hosts.iter().any(|stalled| stalled == host) {
            std::future::pending::<()>().await;
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let response = (self.handler)(&request);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        response.ok_or_else(|| TransportError::Connect {
            url: request.url.to_string(),
            message: "connection refused".to_string(),
        })
    }
}

/// A response for `request` with the given status and body
pub fn respond(request: &HttpRequest, status: u16, content_type: Option<&str>, body: &[u8]) -> HttpResponse {
    HttpResponse {
        url: request.url.clone(),
        status,
        content_type: content_type.map(str::to_string),
        location: None,
        body: if request.method == HttpMethod::Head {
            Vec::new()
        } else {
            body.to_vec()
        },
    }
}

pub fn not_found(request: &HttpRequest) -> HttpResponse {
    respond(request, 404, None, b"")
}

pub fn html(request: &HttpRequest, body: &str) -> HttpResponse {
    respond(request, 200, Some("text/html; charset=utf-8"), body.as_bytes())
}

pub fn png(request: &HttpRequest) -> HttpResponse {
    respond(request, 200, Some("image/png"), PIXEL_PNG)
}
