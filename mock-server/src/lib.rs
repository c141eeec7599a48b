//! Test server for the typed request integration tests.
//!
//! Routes fall into three groups:
//! - `/items`, `/items/{id}` and `/counts` hold a small in-memory item list,
//!   so lists, maps, created objects and `204 No Content` come from real
//!   state changes.
//! - `/echo/*` reflects what arrived on the wire (query, form fields,
//!   headers, raw body bytes with their content type).
//! - `/status/{code}` and `/payload/{kind}` answer with a chosen status or a
//!   chosen body shape, for accepted-status and parse-failure cases.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, delete, get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub done: bool,
}

#[derive(Deserialize)]
pub struct CreateItem {
    pub name: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Deserialize)]
pub struct ItemFilter {
    pub name: Option<String>,
}

/// What `/echo/body` saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoedBody {
    pub method: String,
    pub content_type: Option<String>,
    /// The body as text, `None` when it is not valid UTF-8.
    pub text: Option<String>,
    pub bytes: Vec<u8>,
}

pub type Items = Arc<RwLock<HashMap<Uuid, Item>>>;

pub fn app() -> Router {
    let items: Items = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", delete(delete_item))
        .route("/counts", get(counts))
        .route("/echo/query", get(echo_query))
        .route("/echo/form", post(echo_form))
        .route("/echo/headers", get(echo_headers).post(echo_headers))
        .route("/echo/body", any(echo_body))
        .route("/status/{code}", any(status))
        .route("/payload/{kind}", get(payload))
        .with_state(items)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

/// Items sorted by name, optionally only those with an exact name.
async fn list_items(State(items): State<Items>, Query(filter): Query<ItemFilter>) -> Json<Vec<Item>> {
    let items = items.read().await;
    let mut matching: Vec<Item> = items
        .values()
        .filter(|item| filter.name.as_ref().is_none_or(|n| &item.name == n))
        .cloned()
        .collect();
    matching.sort_by(|a, b| a.name.cmp(&b.name));
    Json(matching)
}

async fn create_item(
    State(items): State<Items>,
    Json(input): Json<CreateItem>,
) -> (StatusCode, Json<Item>) {
    let item = Item {
        id: Uuid::new_v4(),
        name: input.name,
        done: input.done,
    };
    tracing::debug!(id = %item.id, "created item");
    items.write().await.insert(item.id, item.clone());
    (StatusCode::CREATED, Json(item))
}

async fn delete_item(State(items): State<Items>, Path(id): Path<Uuid>) -> StatusCode {
    match items.write().await.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

/// Number of open and done items.
async fn counts(State(items): State<Items>) -> Json<BTreeMap<String, usize>> {
    let items = items.read().await;
    let done = items.values().filter(|i| i.done).count();
    Json(BTreeMap::from([
        ("done".to_string(), done),
        ("open".to_string(), items.len() - done),
    ]))
}

async fn echo_query(Query(params): Query<BTreeMap<String, String>>) -> Json<BTreeMap<String, String>> {
    Json(params)
}

async fn echo_form(Form(fields): Form<BTreeMap<String, String>>) -> Json<BTreeMap<String, String>> {
    Json(fields)
}

/// Request headers with lowercase names; repeated headers keep the last value.
async fn echo_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    Json(
        headers
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect(),
    )
}

async fn echo_body(method: Method, headers: HeaderMap, body: Bytes) -> Json<EchoedBody> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(EchoedBody {
        method: method.to_string(),
        content_type,
        text: std::str::from_utf8(&body).ok().map(str::to_string),
        bytes: body.to_vec(),
    })
}

/// Answer with `code`. Statuses that allow a body get `{"status": code}`.
async fn status(Path(code): Path<u16>) -> Response {
    let Ok(status) = StatusCode::from_u16(code) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED {
        return status.into_response();
    }
    (status, Json(serde_json::json!({ "status": code }))).into_response()
}

/// Fixed bodies of a given shape: `array`, `null`, `empty` or `html`.
async fn payload(Path(kind): Path<String>) -> Response {
    match kind.as_str() {
        "array" => Json([1, 2, 3]).into_response(),
        "null" => Json(serde_json::Value::Null).into_response(),
        "empty" => StatusCode::OK.into_response(),
        "html" => ([(header::CONTENT_TYPE, "text/html")], "<html>oops</html>").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
