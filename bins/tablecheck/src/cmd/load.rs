use tables_client::{LoadPlan, run_load};

use crate::config::{GlobalArgs, LoadArgs, LoadEffective};
use crate::error::TablecheckError;

pub async fn run(global: &GlobalArgs, args: &LoadArgs) -> Result<(), TablecheckError> {
    let (cfg, client) = super::prepare(global)?;
    let eff = LoadEffective::new(args, &cfg.load);

    let start = std::time::Instant::now();
    let plan = LoadPlan {
        tables: eff.tables,
        rows: eff.rows,
        interleave_reads: eff.interleave_reads,
        seed: eff.seed,
    };
    let report = run_load(&client, plan).await;

    let elapsed = start.elapsed();
    tracing::info!(
        tables = report.tables.len(),
        write_successes = report.write_successes,
        reads = report.reads,
        read_failures = report.read_failures,
        elapsed_s = format_args!("{:.2}", elapsed.as_secs_f64()),
        "load complete"
    );

    if report.write_failures() > 0 {
        return Err(TablecheckError::WriteFailures {
            failed: report.write_failures(),
            total: report.tables.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::test_store::{TestStore, global};

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn all_tables_written_exits_ok() {
        let store = TestStore::start(None).await;
        let dir = tempfile::tempdir().unwrap();
        let global = global(&store.base_url, &dir.path().join("absent.toml"));

        let load = LoadArgs { tables: Some(4), rows: Some(3), seed: Some(11), ..Default::default() };
        run(&global, &load).await.unwrap();
        assert_eq!(store.table_count(), 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn failed_table_write_fails_the_run() {
        let store = TestStore::start(Some(1)).await;
        let dir = tempfile::tempdir().unwrap();
        let global = global(&store.base_url, &dir.path().join("absent.toml"));

        let load = LoadArgs { tables: Some(3), rows: Some(2), ..Default::default() };
        let err = run(&global, &load).await.unwrap_err();
        assert!(matches!(err, TablecheckError::WriteFailures { failed: 1, total: 3 }), "{err:?}");
    }
}
