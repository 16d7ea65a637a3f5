use std::{collections::BTreeMap, time::Duration};

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;

pub const PLAIN_TEXT_BODY: &str = "plain text, not json";

/// What the server saw of a request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EchoReply {
    pub method: String,
    pub path: String,
    /// Lower-cased header names.
    pub headers: BTreeMap<String, String>,
    /// Parsed JSON body; `null` when empty, a string when not JSON.
    pub body: Value,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/text", get(text))
        .route("/empty", get(empty))
        .route("/status/{code}", any(status))
        .route("/slow/{millis}", get(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<EchoReply> {
    debug!(%method, %uri, bytes = body.len(), "echo");
    Json(EchoReply {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: collect_headers(&headers),
        body: decode_body(&body),
    })
}

async fn text() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        PLAIN_TEXT_BODY,
    )
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn status(Path(code): Path<u16>) -> impl IntoResponse {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let reason = status.canonical_reason().unwrap_or("unknown");
    (status, Json(json!({ "error": reason, "status": status.as_u16() })))
}

async fn slow(Path(millis): Path<u64>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Json(json!({ "slept_ms": millis }))
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

fn decode_body(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_decodes_to_null() {
        assert_eq!(decode_body(b""), Value::Null);
    }

    #[test]
    fn json_body_is_parsed() {
        assert_eq!(decode_body(br#"{"a":1}"#), json!({"a": 1}));
    }

    #[test]
    fn non_json_body_is_kept_as_text() {
        assert_eq!(decode_body(b"hello"), json!("hello"));
    }

    #[test]
    fn header_names_are_lower_cased() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, "application/json".parse().unwrap());
        let collected = collect_headers(&headers);
        assert_eq!(collected.get("accept").map(String::as_str), Some("application/json"));
    }

    #[test]
    fn echo_reply_serializes_null_body() {
        let reply = EchoReply {
            method: "GET".to_string(),
            path: "/echo".to_string(),
            headers: BTreeMap::new(),
            body: Value::Null,
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["body"], Value::Null);
        assert_eq!(json["method"], "GET");
    }
}
