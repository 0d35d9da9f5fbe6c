use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::error::ClientError;
use crate::record::{Record, TableName};

/// Header carrying the record id next to the JSON body.
pub const UUID_HEADER: &str = "UUID";

// ═══════════════════════════════════════════════════════════════
//  WriteOutcome
// ═══════════════════════════════════════════════════════════════

/// Result of a single POST. `status` is `None` when no response arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub id: String,
    pub status: Option<u16>,
    /// Raw response body, or the error text for transport failures.
    pub body: String,
}

impl WriteOutcome {
    pub fn failed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { id: id.into(), status: None, body: reason.into() }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(200)
    }
}

// ═══════════════════════════════════════════════════════════════
//  TablesClient
// ═══════════════════════════════════════════════════════════════

/// HTTP client for the table store (`/tables/{table}`, `/frame`).
///
/// Cheap to clone: the inner `reqwest::Client` is pooled and shared.
#[derive(Clone)]
pub struct TablesClient {
    http: reqwest::Client,
    base_url: String,
}

impl TablesClient {
    /// `timeout` applies to each request as a whole; `None` waits forever.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder.build().map_err(ClientError::Build)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn table_url(&self, table: &TableName) -> String {
        format!("{}/tables/{}", self.base_url, table)
    }

    /// POST one record as JSON. Never fails: errors become a failed outcome.
    pub async fn write_record(&self, table: &TableName, record: &Record) -> WriteOutcome {
        let body = match serde_json::to_string(record) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(table = %table, id = %record.id, error = %e, "encode failed");
                return WriteOutcome::failed(&record.id, format!("encode: {e}"));
            }
        };

        let request = self
            .http
            .post(self.table_url(table))
            .header(CONTENT_TYPE, "application/json")
            .header(UUID_HEADER, record.id.as_str())
            .body(body.clone());

        let outcome = send(request, &record.id).await;
        if outcome.is_success() {
            tracing::info!(table = %table, id = %record.id, status = ?outcome.status, response = %outcome.body, record = %body, "write");
        } else {
            tracing::warn!(table = %table, id = %record.id, status = ?outcome.status, response = %outcome.body, record = %body, "write failed");
        }
        outcome
    }

    /// POST a CSV document to a table. The outcome id is the table name.
    pub async fn write_csv(&self, table: &TableName, csv: String) -> WriteOutcome {
        let request = self
            .http
            .post(self.table_url(table))
            .header(CONTENT_TYPE, "text/csv")
            .body(csv);

        let outcome = send(request, table.as_str()).await;
        if outcome.is_success() {
            tracing::info!(table = %table, status = ?outcome.status, response = %outcome.body, "csv write");
        } else {
            tracing::warn!(table = %table, status = ?outcome.status, response = %outcome.body, "csv write failed");
        }
        outcome
    }

    /// POST a CSV frame to `/frame`.
    pub async fn post_frame(&self, csv: String) -> WriteOutcome {
        let request = self
            .http
            .post(format!("{}/frame", self.base_url))
            .header(CONTENT_TYPE, "text/csv")
            .body(csv);

        let outcome = send(request, "frame").await;
        tracing::info!(status = ?outcome.status, response = %outcome.body, "frame upload");
        outcome
    }

    /// GET the whole table and parse it as a JSON array.
    pub async fn read_all(&self, table: &TableName) -> Result<Vec<Value>, ClientError> {
        let url = self.table_url(table);
        let body = self.fetch(&url).await?;
        serde_json::from_str(&body).map_err(|source| ClientError::Decode { url, source })
    }

    /// GET the whole table as raw text (CSV tables).
    pub async fn read_csv(&self, table: &TableName) -> Result<String, ClientError> {
        self.fetch(&self.table_url(table)).await
    }

    async fn fetch(&self, url: &str) -> Result<String, ClientError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.to_string(), source })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|source| ClientError::Transport { url: url.to_string(), source })?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            })
        }
    }
}

async fn send(request: reqwest::RequestBuilder, id: &str) -> WriteOutcome {
    let resp = match request.send().await {
        Ok(r) => r,
        Err(e) => return WriteOutcome::failed(id, format!("transport: {e}")),
    };
    let status = resp.status().as_u16();
    match resp.text().await {
        Ok(body) => WriteOutcome { id: id.to_string(), status: Some(status), body },
        // Status arrived but the body was cut off; keep the status for classification.
        Err(e) => WriteOutcome { id: id.to_string(), status: Some(status), body: format!("read body: {e}") },
    }
}
