//! In-process HTTP server standing in for the remote APIs.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    Router,
};
use rgenstudio::ClientConfig;
use serde_json::Value;

pub const API_KEY: &str = "test-api-key";

#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    body: Vec<u8>,
    delay: Duration,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self::raw(status, &body.to_string())
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.as_bytes().to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub fn empty(status: u16) -> Self {
        Self::raw(status, "")
    }

    /// Wait before answering; a long delay behaves like a hung server.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Vec<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn query_pairs(&self) -> HashMap<String, String> {
        let url = format!("http://mock{}?{}", self.path, self.query.clone().unwrap_or_default());
        reqwest::Url::parse(&url)
            .unwrap()
            .query_pairs()
            .into_owned()
            .collect()
    }
}

struct Shared {
    routes: HashMap<String, Reply>,
    fallback: Option<Reply>,
    captured: Mutex<Vec<CapturedRequest>>,
}

pub struct MockServer {
    pub url: String,
    shared: Arc<Shared>,
}

impl MockServer {
    /// Answers every request with the same reply.
    pub async fn single(reply: Reply) -> Self {
        Self::start(HashMap::new(), Some(reply)).await
    }

    /// Answers by exact path; anything else gets a 404 with an empty body.
    pub async fn routes(routes: Vec<(&str, Reply)>) -> Self {
        let routes = routes
            .into_iter()
            .map(|(path, reply)| (path.to_string(), reply))
            .collect();
        Self::start(routes, None).await
    }

    async fn start(routes: HashMap<String, Reply>, fallback: Option<Reply>) -> Self {
        let shared = Arc::new(Shared {
            routes,
            fallback,
            captured: Mutex::new(Vec::new()),
        });

        let state = Arc::clone(&shared);
        let app = Router::new().fallback(
            move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
                let state = Arc::clone(&state);
                async move {
                    state.captured.lock().unwrap().push(CapturedRequest {
                        method,
                        path: uri.path().to_string(),
                        query: uri.query().map(String::from),
                        authorization: headers
                            .get_all(header::AUTHORIZATION)
                            .iter()
                            .map(|v| v.to_str().unwrap().to_string())
                            .collect(),
                        content_type: headers
                            .get(header::CONTENT_TYPE)
                            .map(|v| v.to_str().unwrap().to_string()),
                        body: body.to_vec(),
                    });

                    let reply = state
                        .routes
                        .get(uri.path())
                        .or(state.fallback.as_ref())
                        .cloned()
                        .unwrap_or_else(|| Reply::empty(404));

                    if !reply.delay.is_zero() {
                        tokio::time::sleep(reply.delay).await;
                    }

                    (
                        reply.status,
                        [(header::CONTENT_TYPE, "application/json")],
                        reply.body,
                    )
                }
            },
        );

        let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
            .serve(app.into_make_service());
        let url = format!("http://{}", server.local_addr());
        tokio::spawn(server);

        Self { url, shared }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_credentials(API_KEY)
            .with_base_url(&self.url)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.shared.captured.lock().unwrap().clone()
    }

    pub fn only_request(&self) -> CapturedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

/// A base URL nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
