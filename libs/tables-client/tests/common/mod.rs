//! In-process fake table store for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde_json::Value;

#[derive(Default)]
pub struct StoreOptions {
    /// 1-based index of the write (in arrival order) that gets a 500.
    pub fail_write: Option<usize>,
    /// GETs before this count (1-based) see an empty table.
    pub visible_from_read: usize,
}

#[derive(Default)]
pub struct Inner {
    pub options: StoreOptions,
    pub json: Mutex<HashMap<String, Vec<Value>>>,
    pub csv: Mutex<HashMap<String, String>>,
    pub frames: Mutex<Vec<String>>,
    pub writes: AtomicUsize,
    pub reads: AtomicUsize,
    pub header_mismatches: AtomicUsize,
}

#[derive(Clone)]
pub struct FakeStore {
    pub inner: Arc<Inner>,
    pub base_url: String,
}

impl FakeStore {
    pub async fn start(options: StoreOptions) -> Self {
        let inner = Arc::new(Inner { options, ..Default::default() });

        let app = Router::new()
            .route("/tables/{table}", post(handle_write).get(handle_read))
            .route("/frame", post(handle_frame))
            .with_state(inner.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { inner, base_url: format!("http://{addr}") }
    }

    pub fn json_rows(&self, table: &str) -> Vec<Value> {
        self.inner.json.lock().unwrap().get(table).cloned().unwrap_or_default()
    }

    pub fn csv_table(&self, table: &str) -> Option<String> {
        self.inner.csv.lock().unwrap().get(table).cloned()
    }

    pub fn csv_table_count(&self) -> usize {
        self.inner.csv.lock().unwrap().len()
    }
}

/// Base URL nothing listens on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn handle_write(
    State(inner): State<Arc<Inner>>,
    Path(table): Path<String>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let n = inner.writes.fetch_add(1, Ordering::SeqCst) + 1;
    if inner.options.fail_write == Some(n) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "injected failure".to_string());
    }

    let is_csv = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/csv"));

    if is_csv {
        inner.csv.lock().unwrap().insert(table, body);
        return (StatusCode::OK, "ok".to_string());
    }

    let doc: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) => return (StatusCode::BAD_REQUEST, format!("bad json: {e}")),
    };
    let header_id = headers.get("uuid").and_then(|v| v.to_str().ok());
    if header_id != doc["id"].as_str() {
        inner.header_mismatches.fetch_add(1, Ordering::SeqCst);
    }
    inner.json.lock().unwrap().entry(table).or_default().push(doc);
    (StatusCode::OK, "ok".to_string())
}

async fn handle_read(State(inner): State<Arc<Inner>>, Path(table): Path<String>) -> axum::response::Response {
    let n = inner.reads.fetch_add(1, Ordering::SeqCst) + 1;

    if let Some(csv) = inner.csv.lock().unwrap().get(&table).cloned() {
        return csv.into_response();
    }

    let rows = if n < inner.options.visible_from_read {
        Vec::new()
    } else {
        inner.json.lock().unwrap().get(&table).cloned().unwrap_or_default()
    };
    axum::Json(rows).into_response()
}

async fn handle_frame(State(inner): State<Arc<Inner>>, body: String) -> impl IntoResponse {
    let rows = body.lines().count().saturating_sub(1);
    inner.frames.lock().unwrap().push(body);
    format!("stored {rows} rows")
}
