//! Canned transport for resolver unit tests

use crate::resolver::transport::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

#[derive(Debug, Clone)]
enum Route {
    Respond {
        status: u16,
        content_type: Option<String>,
        location: Option<String>,
        body: Vec<u8>,
    },
    Fail,
}

/// Answers requests from a fixed route table and records every call
///
/// Unrouted requests get an empty 404.
#[derive(Debug, Default)]
pub struct StubTransport {
    routes: HashMap<(HttpMethod, String), Route>,
    calls: Mutex<Vec<(HttpMethod, String)>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(self, method: HttpMethod, url: &str, content_type: Option<&str>, body: &[u8]) -> Self {
        self.route(
            method,
            url,
            Route::Respond {
                status: 200,
                content_type: content_type.map(str::to_string),
                location: None,
                body: body.to_vec(),
            },
        )
    }

    pub fn html(self, url: &str, body: &str) -> Self {
        self.ok(HttpMethod::Get, url, Some("text/html"), body.as_bytes())
    }

    pub fn status(self, method: HttpMethod, url: &str, status: u16) -> Self {
        self.route(
            method,
            url,
            Route::Respond {
                status,
                content_type: None,
                location: None,
                body: Vec::new(),
            },
        )
    }

    pub fn redirect(self, url: &str, location: &str) -> Self {
        self.route(
            HttpMethod::Get,
            url,
            Route::Respond {
                status: 302,
                content_type: None,
                location: Some(location.to_string()),
                body: Vec::new(),
            },
        )
    }

    pub fn fail(self, method: HttpMethod, url: &str) -> Self {
        self.route(method, url, Route::Fail)
    }

    fn route(mut self, method: HttpMethod, url: &str, route: Route) -> Self {
        let key = Url::parse(url).map(|u| u.to_string()).unwrap_or_else(|_| url.to_string());
        self.routes.insert((method, key), route);
        self
    }

    pub fn calls(&self) -> Vec<(HttpMethod, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, method: HttpMethod, url: &str) -> bool {
        self.calls()
            .iter()
            .any(|(m, u)| *m == method && u == url)
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.to_string();
        self.calls.lock().unwrap().push((request.method, url.clone()));

        match self.routes.get(&(request.method, url.clone())) {
            Some(Route::Fail) => Err(TransportError::Connect {
                url,
                message: "connection refused".to_string(),
            }),
            Some(Route::Respond {
                status,
                content_type,
                location,
                body,
            }) => Ok(HttpResponse {
                url: request.url,
                status: *status,
                content_type: content_type.clone(),
                location: location.clone(),
                body: if request.method == HttpMethod::Head {
                    Vec::new()
                } else {
                    body.clone()
                },
            }),
            None => Ok(HttpResponse {
                url: request.url,
                status: 404,
                content_type: None,
                location: None,
                body: Vec::new(),
            }),
        }
    }
}
