//! Execution of one `HttpRequest` over the network.
//!
//! # Design
//! `Transport` is the only place the client performs I/O. `UreqTransport`
//! is the blocking implementation; tests swap in transports that record
//! requests and replay canned responses.
//!
//! The ureq agent keeps no idle connections, so the connection a request
//! opens is closed once its response body has been read (or the call fails)
//! and never carries over to the next request.

use std::io;

use tracing::warn;
use ureq::tls::TlsConfig;
use ureq::{Agent, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one request/response cycle.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError>;
}

/// Blocking transport backed by a `ureq::Agent` with rustls.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        if config.danger_accept_invalid_certs {
            warn!("TLS certificate and hostname verification disabled");
        }

        let tls_config = TlsConfig::builder()
            .disable_verification(config.danger_accept_invalid_certs)
            .build();

        let agent = Agent::config_builder()
            .tls_config(tls_config)
            .https_only(config.https_only)
            .http_status_as_error(false)
            .timeout_connect(Some(config.connect_timeout))
            .timeout_recv_response(Some(config.read_timeout))
            .timeout_recv_body(Some(config.read_timeout))
            .max_idle_connections(0)
            .max_idle_connections_per_host(0)
            .build()
            .new_agent();

        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();

        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, None) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Get, Some(body)) => with_headers(self.agent.get(url), headers)
                .force_send_body()
                .send(body.as_bytes()),
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Delete, Some(body)) => with_headers(self.agent.delete(url), headers)
                .force_send_body()
                .send(body.as_bytes()),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
        };

        let mut response = result.map_err(map_ureq_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(map_ureq_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Sort ureq failures into timeout, network, and protocol errors.
fn map_ureq_error(err: ureq::Error) -> ClientError {
    let message = err.to_string();
    match err {
        ureq::Error::Timeout(_) => ClientError::Timeout(message),
        ureq::Error::Io(ref e) if e.kind() == io::ErrorKind::TimedOut => {
            ClientError::Timeout(message)
        }
        ureq::Error::Protocol(_) | ureq::Error::Http(_) | ureq::Error::BodyExceedsLimit(_) => {
            ClientError::Protocol(message)
        }
        _ => ClientError::Network(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_timeout_maps_to_timeout() {
        let err = ureq::Error::Io(io::Error::new(io::ErrorKind::TimedOut, "read"));
        assert!(matches!(map_ureq_error(err), ClientError::Timeout(_)));
    }

    #[test]
    fn io_failure_maps_to_network() {
        let err = ureq::Error::Io(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
        assert!(matches!(map_ureq_error(err), ClientError::Network(_)));
    }

    #[test]
    fn default_config_keeps_certificate_verification() {
        let transport = UreqTransport::new(&ClientConfig::default());
        assert!(!transport.agent.config().tls_config().disable_verification());
    }

    #[test]
    fn accept_invalid_certs_disables_verification() {
        let config = ClientConfig::new().danger_accept_invalid_certs(true);
        let transport = UreqTransport::new(&config);
        assert!(transport.agent.config().tls_config().disable_verification());
    }

    #[test]
    fn oversized_body_maps_to_protocol() {
        let err = ureq::Error::BodyExceedsLimit(10);
        assert!(matches!(map_ureq_error(err), ClientError::Protocol(_)));
    }
}
