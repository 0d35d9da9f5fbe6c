//! Minimal axum table store for exercising the subcommands.

use std::path::Path as FsPath;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use serde_json::Value;

use crate::config::GlobalArgs;

#[derive(Default)]
struct Inner {
    /// 1-based index of the POST (tables or frame) answered with 500.
    fail_write: Option<usize>,
    writes: AtomicUsize,
    rows: Mutex<Vec<(String, String)>>,
}

pub struct TestStore {
    inner: Arc<Inner>,
    pub base_url: String,
}

impl TestStore {
    pub async fn start(fail_write: Option<usize>) -> Self {
        let inner = Arc::new(Inner { fail_write, ..Default::default() });

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

    /// Bodies stored for `table`, in arrival order.
    pub fn bodies(&self, table: &str) -> Vec<String> {
        self.inner
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == table)
            .map(|(_, b)| b.clone())
            .collect()
    }

    pub fn table_count(&self) -> usize {
        let rows = self.inner.rows.lock().unwrap();
        let mut tables: Vec<&str> = rows.iter().map(|(t, _)| t.as_str()).collect();
        tables.sort_unstable();
        tables.dedup();
        tables.len()
    }
}

/// Global args pointing at `host`, reading config from `config`.
pub fn global(host: &str, config: &FsPath) -> GlobalArgs {
    GlobalArgs {
        config: config.to_string_lossy().into_owned(),
        host: Some(host.to_string()),
        timeout_ms: Some(5_000),
    }
}

fn injected(inner: &Inner) -> bool {
    let n = inner.writes.fetch_add(1, Ordering::SeqCst) + 1;
    inner.fail_write == Some(n)
}

async fn handle_write(
    State(inner): State<Arc<Inner>>,
    Path(table): Path<String>,
    body: String,
) -> impl IntoResponse {
    if injected(&inner) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "injected failure");
    }
    inner.rows.lock().unwrap().push((table, body));
    (StatusCode::OK, "ok")
}

async fn handle_read(State(inner): State<Arc<Inner>>, Path(table): Path<String>) -> impl IntoResponse {
    let rows: Vec<Value> = inner
        .rows
        .lock()
        .unwrap()
        .iter()
        .filter(|(t, _)| *t == table)
        .filter_map(|(_, b)| serde_json::from_str(b).ok())
        .collect();
    axum::Json(rows)
}

async fn handle_frame(State(inner): State<Arc<Inner>>, body: String) -> impl IntoResponse {
    if injected(&inner) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "injected failure".to_string());
    }
    let rows = body.lines().count().saturating_sub(1);
    (StatusCode::OK, format!("stored {rows} rows"))
}
