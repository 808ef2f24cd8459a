use std::sync::Arc;
use std::time::Instant;

use reqwest::{multipart::Form, Client, Method, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    clients::cancel::CancelSignal,
    config::{ClientConfig, ResolvedConfig},
    error::{ApiError, Result},
};

pub(crate) enum Payload {
    Empty,
    Json(Value),
    Multipart(Form),
}

/// One outgoing call, described before any I/O happens.
pub(crate) struct ApiRequest {
    method: Method,
    endpoint: String,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    payload: Payload,
}

impl ApiRequest {
    fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            segments: Vec::new(),
            query: Vec::new(),
            payload: Payload::Empty,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value =
            serde_json::to_value(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.payload = Payload::Json(value);
        Ok(self)
    }

    /// Appends one path segment after the endpoint, percent-encoded so that
    /// `/`, `?` and `#` stay inside it.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn multipart(mut self, form: Form) -> Self {
        self.payload = Payload::Multipart(form);
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }
}

/// Shared request layer: auth header, timeout/cancel race, error normalization.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ResolvedConfig>,
    cancel: Option<CancelSignal>,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let config = config.resolve()?;
        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {}", e)))?;

        log::debug!(
            "HTTP transport ready for {} (timeout {}ms)",
            config.base_url,
            config.timeout.as_millis()
        );

        Ok(Self {
            client,
            config: Arc::new(config),
            cancel: None,
        })
    }

    pub fn with_cancel(&self, signal: CancelSignal) -> Self {
        Self {
            client: self.client.clone(),
            config: Arc::clone(&self.config),
            cancel: Some(signal),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn timeout(&self) -> std::time::Duration {
        self.config.timeout
    }

    pub(crate) fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    pub(crate) fn resolve_url(&self, endpoint: &str, segments: &[String]) -> Result<Url> {
        let joined = self.url_for(endpoint);
        let mut url = Url::parse(&joined)
            .map_err(|e| ApiError::Config(format!("invalid request URL '{}': {}", joined, e)))?;

        if let Some(dots) = segments.iter().find(|s| matches!(s.as_str(), "." | "..")) {
            return Err(ApiError::Config(format!("path segment '{}' is not allowed", dots)));
        }

        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| ApiError::Config(format!("URL '{}' cannot take path segments", joined)))?
                .pop_if_empty()
                .extend(segments);
        }
        Ok(url)
    }

    /// Sends the request and decodes a success body into `T`.
    pub(crate) async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let (status, body) = self.exchange(request).await?;

        serde_json::from_slice(&body).map_err(|e| {
            log::warn!("Unexpected response shape (HTTP {}): {}", status, e);
            ApiError::InvalidResponse {
                message: e.to_string(),
                status_code: status,
            }
        })
    }

    /// Sends the request; success is decided by the status code alone.
    pub(crate) async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.exchange(request).await.map(|_| ())
    }

    async fn exchange(&self, request: ApiRequest) -> Result<(u16, Vec<u8>)> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let url = self.resolve_url(&request.endpoint, &request.segments)?;
        let method = request.method.clone();

        log::debug!("[req:{}] {} {}", request_id, method, url);

        let mut builder = self
            .client
            .request(request.method, url.clone())
            .bearer_auth(&self.config.api_key);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match request.payload {
            Payload::Empty => builder,
            Payload::Json(value) => builder.json(&value),
            Payload::Multipart(form) => builder.multipart(form),
        };

        let round_trip = async {
            let response = builder.send().await.map_err(|e| network_failure(request_id, e))?;
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|e| network_failure(request_id, e))?;
            Ok::<_, ApiError>((status, body.to_vec()))
        };

        let cancel = self.cancel.clone();
        let cancelled = async move {
            match cancel {
                Some(signal) => signal.cancelled().await,
                None => futures::future::pending::<()>().await,
            }
        };

        // Losing branches are dropped here, which aborts the request and disarms the timer.
        let outcome = tokio::select! {
            biased;
            _ = cancelled => Err(ApiError::Cancelled),
            result = round_trip => result,
            _ = tokio::time::sleep(self.config.timeout) => Err(ApiError::Timeout),
        };

        let elapsed = started.elapsed().as_millis();
        let (status, body) = match outcome {
            Ok(done) => done,
            Err(e) => {
                log::warn!(
                    "[req:{}] {} {} failed after {}ms: {}",
                    request_id,
                    method,
                    url,
                    elapsed,
                    e.code()
                );
                return Err(e);
            }
        };

        if !status.is_success() {
            let error = ApiError::from_error_body(status.as_u16(), &body);
            log::warn!(
                "[req:{}] {} {} -> HTTP {} ({}) in {}ms",
                request_id,
                method,
                url,
                status.as_u16(),
                error.code(),
                elapsed
            );
            return Err(error);
        }

        log::debug!(
            "[req:{}] {} {} -> HTTP {} in {}ms",
            request_id,
            method,
            url,
            status.as_u16(),
            elapsed
        );

        Ok((status.as_u16(), body))
    }
}

fn network_failure(request_id: Uuid, error: reqwest::Error) -> ApiError {
    log::debug!("[req:{}] transport failure: {}", request_id, error);
    ApiError::Network
}
