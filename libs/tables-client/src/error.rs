/// Errors surfaced by [`TablesClient`](crate::TablesClient) reads and setup.
///
/// Writes never return this type: they fold every failure into a
/// [`WriteOutcome`](crate::WriteOutcome) so a batch keeps going.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("transport ({url}): {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("status {status} ({url}): {body}")]
    Status { url: String, status: u16, body: String },

    #[error("decode ({url}): {source}")]
    Decode { url: String, source: serde_json::Error },

    #[error("invalid table name: '{0}'")]
    InvalidTable(String),
}
