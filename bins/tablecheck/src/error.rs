#[derive(Debug, thiserror::Error)]
pub enum TablecheckError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Client(#[from] tables_client::ClientError),

    #[error("wrong number of results: expected {expected}, observed {observed}")]
    CountMismatch { expected: usize, observed: usize },

    #[error("{failed} of {total} writes failed")]
    WriteFailures { failed: usize, total: usize },
}
