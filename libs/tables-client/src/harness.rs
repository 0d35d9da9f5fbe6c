use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinSet;

use crate::client::{TablesClient, WriteOutcome};
use crate::error::ClientError;
use crate::record::{Record, TableName};

/// `n` records with fresh v7 ids and a `seq` payload field.
pub fn generate_batch(n: usize) -> Vec<Record> {
    (0..n).map(|seq| Record::with_fresh_id().with("seq", seq)).collect()
}

// ═══════════════════════════════════════════════════════════════
//  Concurrent write
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct BatchReport {
    pub requested: usize,
    pub successes: usize,
    pub outcomes: Vec<WriteOutcome>,
}

impl BatchReport {
    pub fn failures(&self) -> usize {
        self.requested - self.successes
    }
}

/// Fire every write as its own task and join them all.
///
/// Outcomes are summed after the join; tasks share nothing but the client.
/// A panicked task counts as a failure.
pub async fn write_batch_concurrently(
    client: &TablesClient,
    table: &TableName,
    records: Vec<Record>,
) -> BatchReport {
    let requested = records.len();
    let mut tasks = JoinSet::new();
    for record in records {
        let client = client.clone();
        let table = table.clone();
        tasks.spawn(async move { client.write_record(&table, &record).await });
    }
    join_outcomes(table, requested, tasks).await
}

/// Join every write task; a task that failed to join becomes a failed outcome.
async fn join_outcomes(
    table: &TableName,
    requested: usize,
    mut tasks: JoinSet<WriteOutcome>,
) -> BatchReport {
    let mut outcomes = Vec::with_capacity(requested);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                tracing::error!(table = %table, error = %e, "write task failed");
                outcomes.push(WriteOutcome::failed("", format!("join: {e}")));
            }
        }
    }

    let successes = outcomes.iter().filter(|o| o.is_success()).count();
    BatchReport { requested, successes, outcomes }
}

/// Write records one after another, in order.
pub async fn write_sequential(
    client: &TablesClient,
    table: &TableName,
    records: &[Record],
) -> BatchReport {
    let mut outcomes = Vec::with_capacity(records.len());
    for record in records {
        outcomes.push(client.write_record(table, record).await);
    }
    let successes = outcomes.iter().filter(|o| o.is_success()).count();
    BatchReport { requested: records.len(), successes, outcomes }
}

// ═══════════════════════════════════════════════════════════════
//  Read-back
// ═══════════════════════════════════════════════════════════════

/// When and how often to read the table back after writing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadPolicy {
    /// Sleep before the first read.
    pub settle: Duration,
    /// Extra reads allowed while fewer than `expected` records are visible.
    pub retries: u32,
    pub retry_interval: Duration,
}

/// Read the table, re-reading per `policy` until `expected` records show up.
///
/// Returns the last read. Any read error aborts immediately.
pub async fn read_back(
    client: &TablesClient,
    table: &TableName,
    expected: usize,
    policy: ReadPolicy,
) -> Result<Vec<Value>, ClientError> {
    if !policy.settle.is_zero() {
        tracing::debug!(table = %table, settle_ms = policy.settle.as_millis() as u64, "settling");
        tokio::time::sleep(policy.settle).await;
    }

    let mut records = client.read_all(table).await?;
    let mut attempt = 0;
    while records.len() < expected && attempt < policy.retries {
        attempt += 1;
        tracing::info!(
            table = %table,
            attempt,
            observed = records.len(),
            expected,
            "read-back short, retrying"
        );
        tokio::time::sleep(policy.retry_interval).await;
        records = client.read_all(table).await?;
    }
    Ok(records)
}

/// Compare against the requested batch size, not the tallied successes.
pub fn verify_count(expected: usize, observed: usize) -> bool {
    if expected == observed {
        true
    } else {
        tracing::error!(expected, observed, "wrong number of results");
        false
    }
}

// ═══════════════════════════════════════════════════════════════
//  Full pipeline
// ═══════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct VerifyReport {
    pub table: TableName,
    pub batch: BatchReport,
    pub observed: usize,
    pub matched: bool,
}

/// generate → write all → read back → compare.
pub async fn run_verify(
    client: &TablesClient,
    table: &TableName,
    writes: usize,
    policy: ReadPolicy,
) -> Result<VerifyReport, ClientError> {
    tracing::info!(table = %table, writes, "table name");

    let records = generate_batch(writes);
    let batch = write_batch_concurrently(client, table, records).await;
    tracing::info!(table = %table, successes = batch.successes, requested = batch.requested, "success");

    let read = read_back(client, table, writes, policy).await?;
    tracing::debug!(table = %table, records = ?read, "read-back");

    let observed = read.len();
    let matched = verify_count(writes, observed);

    Ok(VerifyReport {
        table: table.clone(),
        batch,
        observed,
        matched,
    })
}
