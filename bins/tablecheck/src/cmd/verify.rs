use tables_client::{TableName, run_verify};

use crate::config::{GlobalArgs, VerifyArgs, VerifyEffective};
use crate::error::TablecheckError;

pub async fn run(global: &GlobalArgs, args: &VerifyArgs) -> Result<(), TablecheckError> {
    let (cfg, client) = super::prepare(global)?;
    let eff = VerifyEffective::new(args, &cfg.verify);

    let table = match &eff.table {
        Some(name) => TableName::parse(name.as_str())?,
        None => TableName::fresh(),
    };

    let report = run_verify(&client, &table, eff.writes, eff.policy).await?;

    tracing::info!(
        table = %report.table,
        requested = report.batch.requested,
        successes = report.batch.successes,
        observed = report.observed,
        matched = report.matched,
        "verify complete"
    );

    if !report.matched && !eff.allow_mismatch {
        return Err(TablecheckError::CountMismatch {
            expected: eff.writes,
            observed: report.observed,
        });
    }
    Ok(())
}
