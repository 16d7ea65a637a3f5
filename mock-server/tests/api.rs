use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, EchoReply, PLAIN_TEXT_BODY};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_get_without_body() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/echo")
                .header(http::header::ACCEPT, "application/json")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let reply: EchoReply = body_json(resp).await;
    assert_eq!(reply.method, "GET");
    assert_eq!(reply.path, "/echo");
    assert_eq!(reply.body, Value::Null);
    assert_eq!(reply.headers.get("accept").map(String::as_str), Some("application/json"));
}

#[tokio::test]
async fn echo_post_returns_parsed_body() {
    let resp = app()
        .oneshot(json_request("POST", "/echo/jobs", r#"{"name":"build"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let reply: EchoReply = body_json(resp).await;
    assert_eq!(reply.method, "POST");
    assert_eq!(reply.path, "/echo/jobs");
    assert_eq!(reply.body, json!({"name": "build"}));
    assert_eq!(
        reply.headers.get("content-type").map(String::as_str),
        Some("application/json")
    );
}

#[tokio::test]
async fn echo_accepts_put_and_delete() {
    for method in ["PUT", "DELETE"] {
        let resp = app().oneshot(json_request(method, "/echo", "{}")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let reply: EchoReply = body_json(resp).await;
        assert_eq!(reply.method, method);
    }
}

// --- fixtures ---

#[tokio::test]
async fn text_is_not_json() {
    let resp = app()
        .oneshot(Request::builder().uri("/text").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert_eq!(body.as_ref(), PLAIN_TEXT_BODY.as_bytes());
    assert!(serde_json::from_slice::<Value>(&body).is_err());
}

#[tokio::test]
async fn empty_returns_204_without_body() {
    let resp = app()
        .oneshot(Request::builder().uri("/empty").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn status_route_returns_requested_code() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/status/409")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], 409);
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
async fn status_route_rejects_non_numeric_code() {
    let resp = app()
        .oneshot(Request::builder().uri("/status/teapot").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn slow_route_reports_delay() {
    let resp = app()
        .oneshot(Request::builder().uri("/slow/5").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["slept_ms"], 5);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let resp = app()
        .oneshot(Request::builder().uri("/nope").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
