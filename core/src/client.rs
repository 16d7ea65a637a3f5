//! HTTPS JSON client.
//!
//! # Design
//! `HttpsClient` owns an immutable `ClientConfig`, the precomputed
//! authorization header, and a `Transport`. Every call is split the same
//! way: `build_request` turns the target and parameters into an
//! `HttpRequest`, the transport executes it exactly once, and
//! `parse_response` decodes the answer. The client keeps no per-request
//! state, so one instance can be shared between threads.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::{ClientConfig, Credentials};
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::IntoParameters;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Blocking client that sends JSON requests and decodes JSON responses.
#[derive(Clone)]
pub struct HttpsClient {
    config: ClientConfig,
    authorization: Option<String>,
    transport: Arc<dyn Transport>,
}

impl HttpsClient {
    /// Build a client that talks to the network through ureq.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self::with_transport(config, transport)
    }

    /// Build a client around a caller-supplied transport.
    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        let authorization = config
            .credentials
            .as_ref()
            .map(Credentials::authorization_header);
        Self {
            config,
            authorization,
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Use basic authentication for every later request on this instance.
    pub fn set_authorization(&mut self, username: &str, password: &str) {
        let credentials = Credentials::new(username, password);
        self.authorization = Some(credentials.authorization_header());
        self.config.credentials = Some(credentials);
    }

    /// The `Authorization` header value sent with each request, if any.
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    pub fn get(&self, url: &str, params: impl IntoParameters) -> Result<Value, ClientError> {
        self.request(HttpMethod::Get, url, params)
    }

    pub fn put(&self, url: &str, params: impl IntoParameters) -> Result<Value, ClientError> {
        self.request(HttpMethod::Put, url, params)
    }

    pub fn post(&self, url: &str, params: impl IntoParameters) -> Result<Value, ClientError> {
        self.request(HttpMethod::Post, url, params)
    }

    pub fn delete(&self, url: &str, params: impl IntoParameters) -> Result<Value, ClientError> {
        self.request(HttpMethod::Delete, url, params)
    }

    /// Run one full request/response cycle.
    pub fn request(
        &self,
        method: HttpMethod,
        url: &str,
        params: impl IntoParameters,
    ) -> Result<Value, ClientError> {
        let request = self.build_request(method, url, params)?;

        let response = self.transport.execute(&request).inspect_err(|e| {
            warn!(%method, url = %request.url, error = %e, "request failed");
        })?;

        self.parse_response(response).inspect_err(|e| {
            warn!(%method, url = %request.url, error = %e, "unusable response");
        })
    }

    /// Describe the request `request` would send, without sending it.
    ///
    /// Null or empty parameters produce no body and no `Content-Type`.
    pub fn build_request(
        &self,
        method: HttpMethod,
        url: &str,
        params: impl IntoParameters,
    ) -> Result<HttpRequest, ClientError> {
        let url = self.resolve_url(url)?;
        let body = params
            .into_parameters()?
            .filter(|params| !params.is_empty())
            .map(|params| params.to_json_string())
            .transpose()?;

        let mut headers = vec![("accept".to_string(), JSON_CONTENT_TYPE.to_string())];
        if let Some(authorization) = self.authorization.as_deref().filter(|a| !a.is_empty()) {
            headers.push(("authorization".to_string(), authorization.to_string()));
        }
        if body.is_some() {
            headers.push(("content-type".to_string(), JSON_CONTENT_TYPE.to_string()));
        }

        if let Some(body) = &body {
            debug!(%method, %url, %body, "parameters out");
        }

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers,
            body,
        })
    }

    /// Decode a response. An empty 2xx body decodes to `Value::Null`.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ClientError> {
        debug!(status = response.status, "response received");
        check_status(&response)?;

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Absolute targets are used as-is; anything else is appended to the
    /// base URL.
    fn resolve_url(&self, target: &str) -> Result<Url, ClientError> {
        let url = match Url::parse(target) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self
                    .config
                    .base_url
                    .as_deref()
                    .ok_or_else(|| ClientError::invalid_url(target, "relative url and no base url"))?;
                let joined = format!("{base}/{}", target.trim_start_matches('/'));
                Url::parse(&joined).map_err(|e| ClientError::invalid_url(&joined, e.to_string()))?
            }
            Err(e) => return Err(ClientError::invalid_url(target, e.to_string())),
        };

        match url.scheme() {
            "https" => {}
            "http" if !self.config.https_only => {}
            "http" => return Err(ClientError::invalid_url(target, "plain http refused")),
            other => {
                return Err(ClientError::invalid_url(
                    target,
                    format!("unsupported scheme {other:?}"),
                ))
            }
        }
        if url.host_str().is_none() {
            return Err(ClientError::invalid_url(target, "missing host"));
        }

        Ok(url)
    }
}

impl Default for HttpsClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl fmt::Debug for HttpsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpsClient")
            .field("config", &self.config)
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

/// Map non-success status codes to the appropriate `ClientError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ClientError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ClientError::NotFound);
    }
    Err(ClientError::Status {
        status: response.status,
        body: response.body.clone(),
    })
}
