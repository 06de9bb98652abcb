// File: src/client/core.rs
use crate::client::middleware::{JsonHeadersLayer, JsonHeadersService};
use crate::client::schema::{build_request_body, extract_candidate_text, parsed_task_from_text};
use crate::config::Config;
use crate::model::ParsedTask;

use chrono::NaiveDateTime;
use http::{Method, Request, StatusCode, Uri};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::fmt;
use std::time::Duration;
use tower::{ServiceBuilder, ServiceExt};

type HttpsClient = JsonHeadersService<
    Client<
        hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
        String,
    >,
>;

/// The one failure kind of the AI path. Network, auth and format problems all
/// collapse into this; the reason is only for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiParseError {
    pub reason: String,
}

impl AiParseError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<String> for AiParseError {
    fn from(e: String) -> Self {
        Self::new(e)
    }
}
impl From<&str> for AiParseError {
    fn from(e: &str) -> Self {
        Self::new(e)
    }
}
impl fmt::Display for AiParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AI parse failed: {}", self.reason)
    }
}
impl std::error::Error for AiParseError {}

#[derive(Clone)]
pub struct AiClient {
    http: HttpsClient,
    endpoint: Uri,
    api_key: String,
    timeout: Option<Duration>,
}

// Hand-written so the API key never ends up in a log line.
impl fmt::Debug for AiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AiClient {
    pub fn new(config: &Config) -> Result<Self, AiParseError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err("Missing API key".into());
        }
        let endpoint: Uri = config
            .ai_endpoint
            .parse()
            .map_err(|e: http::uri::InvalidUri| AiParseError::new(e.to_string()))?;

        let mut root_store = rustls::RootCertStore::empty();
        let result = rustls_native_certs::load_native_certs();
        root_store.add_parsable_certificates(result.certs);
        if root_store.is_empty() {
            // Plain http endpoints still work; https ones will fail the handshake.
            log::warn!("No system certificates found; https AI endpoints will be rejected");
        }
        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let http_client = Client::builder(TokioExecutor::new()).build(https_connector);
        let http = ServiceBuilder::new()
            .layer(JsonHeadersLayer::new(format!(
                "quicktask/{}",
                env!("CARGO_PKG_VERSION")
            )))
            .service(http_client);

        let timeout =
            (config.ai_timeout_secs > 0).then(|| Duration::from_secs(config.ai_timeout_secs));

        Ok(Self {
            http,
            endpoint,
            api_key: api_key.to_string(),
            timeout,
        })
    }

    fn request_uri(&self) -> Result<Uri, AiParseError> {
        let base = self.endpoint.to_string();
        let sep = if base.contains('?') { '&' } else { '?' };
        format!("{}{}key={}", base, sep, self.api_key)
            .parse()
            .map_err(|e: http::uri::InvalidUri| AiParseError::new(e.to_string()))
    }

    /// One request, no retries. `now` is only used to tell the model what "today" is.
    pub async fn parse_with_ai(
        &self,
        text: &str,
        now: NaiveDateTime,
    ) -> Result<ParsedTask, AiParseError> {
        let call = self.call(text, now);
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| AiParseError::new(format!("Timed out after {:?}", limit)))?,
            None => call.await,
        }
    }

    async fn call(&self, text: &str, now: NaiveDateTime) -> Result<ParsedTask, AiParseError> {
        let body = build_request_body(text, now).to_string();
        let req = Request::builder()
            .method(Method::POST)
            .uri(self.request_uri()?)
            .body(body)
            .map_err(|e| AiParseError::new(e.to_string()))?;

        log::debug!("POST {} ({} chars of input)", self.endpoint, text.len());

        let response = self
            .http
            .clone()
            .oneshot(req)
            .await
            .map_err(|e| AiParseError::new(format!("Request failed: {}", e)))?;

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| AiParseError::new(format!("Failed to read response: {}", e)))?
            .to_bytes();

        if !status.is_success() {
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    AiParseError::new(format!("API request rejected: {}", status))
                }
                _ => AiParseError::new(format!("API request failed: {}", status)),
            });
        }

        let reply = extract_candidate_text(&bytes)?;
        parsed_task_from_text(&reply)
    }
}
