//! Client configuration.
//!
//! # Design
//! `ClientConfig` is a plain value: build it with the chained setters or
//! read it from the environment, then hand it to `HttpsClient::new`. Nothing
//! in it changes once a client has been built.

use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::ClientError;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(3000);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(3000);

pub const ENV_BASE_URL: &str = "HTTPS_CLIENT_BASE_URL";
pub const ENV_USERNAME: &str = "HTTPS_CLIENT_USERNAME";
pub const ENV_PASSWORD: &str = "HTTPS_CLIENT_PASSWORD";
pub const ENV_CONNECT_TIMEOUT_MS: &str = "HTTPS_CLIENT_CONNECT_TIMEOUT_MS";
pub const ENV_READ_TIMEOUT_MS: &str = "HTTPS_CLIENT_READ_TIMEOUT_MS";
pub const ENV_ACCEPT_INVALID_CERTS: &str = "HTTPS_CLIENT_ACCEPT_INVALID_CERTS";

/// Username and password for HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `Basic base64(username:password)`.
    pub fn authorization_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Settings shared by every request a client makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for targets that are not absolute URLs.
    pub base_url: Option<String>,
    pub credentials: Option<Credentials>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Skip certificate chain and hostname verification.
    pub danger_accept_invalid_certs: bool,
    /// Refuse any scheme other than `https`.
    pub https_only: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            credentials: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            danger_accept_invalid_certs: false,
            https_only: true,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Accept any certificate chain and any hostname. The channel stays
    /// encrypted but the peer is not authenticated.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_certs = accept;
        self
    }

    pub fn https_only(mut self, https_only: bool) -> Self {
        self.https_only = https_only;
        self
    }

    /// Read the `HTTPS_CLIENT_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Missing keys keep their
    /// defaults; credentials apply only when a username is present.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            config = config.base_url(&base_url);
        }
        if let Some(username) = lookup(ENV_USERNAME).filter(|v| !v.is_empty()) {
            let password = lookup(ENV_PASSWORD).unwrap_or_default();
            config = config.basic_auth(username, password);
        }
        if let Some(raw) = lookup(ENV_CONNECT_TIMEOUT_MS) {
            config.connect_timeout = parse_millis(ENV_CONNECT_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_READ_TIMEOUT_MS) {
            config.read_timeout = parse_millis(ENV_READ_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ACCEPT_INVALID_CERTS) {
            config.danger_accept_invalid_certs = parse_bool(ENV_ACCEPT_INVALID_CERTS, &raw)?;
        }

        Ok(config)
    }
}

fn parse_millis(key: &str, raw: &str) -> Result<Duration, ClientError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| ClientError::Config {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ClientError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(ClientError::Config {
            key: key.to_string(),
            reason: format!("expected true or false, got {other:?}"),
        }),
    }
}
