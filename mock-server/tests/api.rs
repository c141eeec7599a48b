use std::collections::BTreeMap;

use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, EchoedBody, Item};
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

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- items ---

#[tokio::test]
async fn list_items_empty() {
    let resp = app().oneshot(get("/items")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Item> = body_json(resp).await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn create_item_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/items", r#"{"name":"Buy milk"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let item: Item = body_json(resp).await;
    assert_eq!(item.name, "Buy milk");
    assert!(!item.done);
}

#[tokio::test]
async fn create_item_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/items", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_item_not_found() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/items/00000000-0000-0000-0000-000000000000")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn list_filters_by_name() {
    use tower::Service;

    let mut app = app().into_service();
    for body in [r#"{"name":"a"}"#, r#"{"name":"b","done":true}"#] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/items", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/items?name=b"))
        .await
        .unwrap();
    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "b");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/counts"))
        .await
        .unwrap();
    let counts: BTreeMap<String, usize> = body_json(resp).await;
    assert_eq!(counts["done"], 1);
    assert_eq!(counts["open"], 1);
}

// --- echo ---

#[tokio::test]
async fn echo_query_decodes_pairs() {
    let resp = app()
        .oneshot(get("/echo/query?q=rust+%26+c&page=2"))
        .await
        .unwrap();

    let params: BTreeMap<String, String> = body_json(resp).await;
    assert_eq!(params["q"], "rust & c");
    assert_eq!(params["page"], "2");
}

#[tokio::test]
async fn echo_form_decodes_body() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/echo/form")
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body("reason=duplicate+entry".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let fields: BTreeMap<String, String> = body_json(resp).await;
    assert_eq!(fields["reason"], "duplicate entry");
}

#[tokio::test]
async fn echo_headers_lowercases_names() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/echo/headers")
                .header("X-Id", "1")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers: BTreeMap<String, String> = body_json(resp).await;
    assert_eq!(headers["x-id"], "1");
}

#[tokio::test]
async fn echo_body_reports_bytes_and_content_type() {
    let resp = app()
        .oneshot(json_request("PATCH", "/echo/body", r#"{"name":"é"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: EchoedBody = body_json(resp).await;
    assert_eq!(echoed.method, "PATCH");
    assert_eq!(echoed.content_type.as_deref(), Some("application/json"));
    assert_eq!(echoed.text.as_deref(), Some(r#"{"name":"é"}"#));
    assert_eq!(echoed.bytes, r#"{"name":"é"}"#.as_bytes());
}

// --- status ---

#[tokio::test]
async fn status_route_answers_with_requested_code() {
    let resp = app().oneshot(get("/status/409")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn status_204_has_empty_body() {
    let resp = app().oneshot(get("/status/204")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn status_out_of_range_is_bad_request() {
    let resp = app().oneshot(get("/status/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- payload ---

#[tokio::test]
async fn payload_shapes() {
    let resp = app().oneshot(get("/payload/array")).await.unwrap();
    assert_eq!(body_bytes(resp).await.as_ref(), b"[1,2,3]");

    let resp = app().oneshot(get("/payload/null")).await.unwrap();
    assert_eq!(body_bytes(resp).await.as_ref(), b"null");

    let resp = app().oneshot(get("/payload/empty")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());

    let resp = app().oneshot(get("/payload/html")).await.unwrap();
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "text/html");
    assert_eq!(body_bytes(resp).await.as_ref(), b"<html>oops</html>");

    let resp = app().oneshot(get("/payload/unknown")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
