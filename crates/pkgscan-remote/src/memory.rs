//! In-memory [`Transport`] serving canned responses.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use serde_json::Value;

use crate::{
    error::Result,
    http_client::{HttpResponse, Transport},
};

/// Serves registered URLs verbatim and answers 404 for everything else.
/// Clones share routes and the request log.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    routes: Arc<Mutex<HashMap<String, HttpResponse>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, url: impl Into<String>, response: HttpResponse) -> &Self {
        self.routes.lock().unwrap().insert(url.into(), response);
        self
    }

    /// Serves a JSON page, optionally pointing at the next one.
    pub fn json(&self, url: impl Into<String>, body: Value, next: Option<&str>) -> &Self {
        self.route(
            url,
            HttpResponse {
                status: 200,
                link: next.map(|next| format!("<{next}>; rel=\"next\"")),
                body: body.to_string().into_bytes(),
            },
        )
    }

    pub fn text(&self, url: impl Into<String>, body: &str) -> &Self {
        self.route(
            url,
            HttpResponse {
                status: 200,
                link: None,
                body: body.as_bytes().to_vec(),
            },
        )
    }

    pub fn status(&self, url: impl Into<String>, status: u16) -> &Self {
        self.route(
            url,
            HttpResponse {
                status,
                link: None,
                body: Vec::new(),
            },
        )
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MemoryTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(url.to_string());

        let response = self.routes.lock().unwrap().get(url).cloned();
        Ok(response.unwrap_or(HttpResponse {
            status: 404,
            link: None,
            body: br#"{"message":"404 Not Found"}"#.to_vec(),
        }))
    }
}
