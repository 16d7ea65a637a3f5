//! Blocking HTTPS client for JSON APIs.
//!
//! # Overview
//! `HttpsClient` sends GET/PUT/POST/DELETE requests with an optional JSON
//! object body and returns the decoded JSON response. Parameters may be
//! given as object text, key/value pairs, or a ready map. Basic
//! authentication is attached to every request once configured.
//!
//! # Design
//! - Configuration is an explicit `ClientConfig` value; there is no global
//!   client and no connection shared between calls.
//! - Certificate and hostname verification are on unless the config opts
//!   out with `danger_accept_invalid_certs`.
//! - Each call is `build_request` → `Transport::execute` → `parse_response`,
//!   and every failure comes back as a `ClientError`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::HttpsClient;
pub use config::{ClientConfig, Credentials};
pub use error::ClientError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{IntoParameters, KeyValuePair, Parameters};
