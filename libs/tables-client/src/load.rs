use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tokio::task::JoinSet;

use crate::client::TablesClient;
use crate::frame::{FrameRng, count_csv_rows, default_start, generate_frame};
use crate::record::TableName;

#[derive(Debug, Clone, Copy)]
pub struct LoadPlan {
    pub tables: usize,
    pub rows: usize,
    /// After each write after the first, also read two already-written tables.
    pub interleave_reads: bool,
    pub seed: i64,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub tables: Vec<TableName>,
    pub write_successes: usize,
    pub reads: usize,
    pub read_failures: usize,
}

impl LoadReport {
    pub fn write_failures(&self) -> usize {
        self.tables.len() - self.write_successes
    }
}

enum TaskResult {
    Write(bool),
    Read(bool),
}

/// Write one CSV frame to each of `plan.tables` fresh tables, all concurrently.
pub async fn run_load(client: &TablesClient, plan: LoadPlan) -> LoadReport {
    let mut values = FrameRng::new(plan.seed);
    let mut names = StdRng::from_entropy();
    let mut report = LoadReport::default();
    let mut tasks = JoinSet::new();

    for _ in 0..plan.tables {
        let table = TableName::random_alphanumeric(&mut names);
        let frame = generate_frame(plan.rows, &["value"], default_start(), &mut values);
        tracing::info!(table = %table, rows = frame.rows, "writing data");

        if plan.interleave_reads && !report.tables.is_empty() {
            for _ in 0..2 {
                let Some(target) = report.tables.choose(&mut names).cloned() else {
                    break;
                };
                let client = client.clone();
                tasks.spawn(async move {
                    match client.read_csv(&target).await {
                        Ok(text) => {
                            tracing::info!(table = %target, rows = count_csv_rows(&text), "read data");
                            TaskResult::Read(true)
                        }
                        Err(e) => {
                            tracing::warn!(table = %target, error = %e, "read failed");
                            TaskResult::Read(false)
                        }
                    }
                });
            }
        }

        let client = client.clone();
        let target = table.clone();
        tasks.spawn(async move {
            let outcome = client.write_csv(&target, frame.text).await;
            TaskResult::Write(outcome.is_success())
        });
        report.tables.push(table);
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(TaskResult::Write(ok)) => {
                if ok {
                    report.write_successes += 1;
                }
            }
            Ok(TaskResult::Read(ok)) => {
                report.reads += 1;
                if !ok {
                    report.read_failures += 1;
                }
            }
            Err(e) => tracing::error!(error = %e, "load task failed"),
        }
    }

    report
}
