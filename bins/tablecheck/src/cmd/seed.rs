use tables_client::{Record, TableName, write_sequential};

use crate::config::{GlobalArgs, SeedArgs, SeedEffective};
use crate::error::TablecheckError;

pub async fn run(global: &GlobalArgs, args: &SeedArgs) -> Result<(), TablecheckError> {
    let (cfg, client) = super::prepare(global)?;
    let eff = SeedEffective::new(args, &cfg.seed);

    let table = TableName::parse(eff.table.as_str())?;
    let records = match &eff.file {
        Some(path) => load_records(path)?,
        None => default_records(),
    };

    let report = write_sequential(&client, &table, &records).await;
    tracing::info!(
        table = %table,
        requested = report.requested,
        successes = report.successes,
        "seed complete"
    );

    if report.failures() > 0 {
        return Err(TablecheckError::WriteFailures {
            failed: report.failures(),
            total: report.requested,
        });
    }
    Ok(())
}

pub fn default_records() -> Vec<Record> {
    vec![
        Record::new("tim").with("client", "a"),
        Record::new("john").with("client", "b"),
    ]
}

/// JSON array of objects, each with a string `id`.
pub fn load_records(path: &str) -> Result<Vec<Record>, TablecheckError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| TablecheckError::Config(format!("cannot read records {path}: {e}")))?;
    serde_json::from_str(&content)
        .map_err(|e| TablecheckError::Config(format!("bad records {path}: {e}")))
}
