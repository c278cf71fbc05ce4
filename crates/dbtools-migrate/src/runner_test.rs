use super::*;
use dbtools_core::CoreError;
use dbtools_db::{DbError, MemoryClient};
use dbtools_exec::{ExecError, ProcessOutcome, RecordingExecutor};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONN: &str = "postgresql://app@localhost/app";

fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

/// SQL directory whose `migration/` holds the given script names.
fn sql_dir(scripts: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let migration = dir.path().join("migration");
    fs::create_dir(&migration).unwrap();
    for name in scripts {
        fs::write(migration.join(name), "SELECT 1;\n").unwrap();
    }
    dir
}

fn config(dir: &Path) -> Config {
    Config {
        connection: Some(CONN.to_string()),
        sql_directory: dir.to_path_buf(),
        ..Config::default()
    }
}

fn file_names(executor: &RecordingExecutor) -> Vec<String> {
    executor
        .files()
        .iter()
        .map(|f| {
            Path::new(f)
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

fn checkpoints(client: &MemoryClient) -> Vec<String> {
    client
        .statements()
        .into_iter()
        .filter(|s| s.starts_with("CREATE OR REPLACE FUNCTION"))
        .collect()
}

#[tokio::test]
async fn test_equal_versions_do_nothing() {
    let dir = sql_dir(&["1.0.0.sql", "1.1.0.sql"]);
    let config = config(dir.path());
    let client = MemoryClient::new().with_version("data", "1.0.0");
    let store = SchemaVersionStore::new(client.clone(), "data");
    let executor = RecordingExecutor::new();
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    let report = runner.run(&v("1.0.0")).await.unwrap();

    assert_eq!(report, MigrationReport::UpToDate { version: v("1.0.0") });
    assert!(executor.invocations().is_empty());
    assert!(checkpoints(&client).is_empty());
}

#[tokio::test]
async fn test_downgrade_rejected_before_any_script() {
    let dir = sql_dir(&["1.5.0.sql"]);
    let config = config(dir.path());
    let client = MemoryClient::new().with_version("data", "2.0.0");
    let store = SchemaVersionStore::new(client.clone(), "data");
    let executor = RecordingExecutor::new();
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    let err = runner.run(&v("1.0.0")).await.unwrap_err();

    match err {
        MigrateError::DowngradeRejected { current, target } => {
            assert_eq!(current, v("2.0.0"));
            assert_eq!(target, v("1.0.0"));
        }
        other => panic!("expected DowngradeRejected, got {other:?}"),
    }
    assert!(executor.invocations().is_empty());
    assert_eq!(client.recorded("data").as_deref(), Some("2.0.0"));
}

#[tokio::test]
async fn test_check_direction_reads_without_side_effects() {
    let dir = sql_dir(&["1.5.0.sql"]);
    let config = config(dir.path());
    let client = MemoryClient::new().with_version("data", "1.2.0");
    let store = SchemaVersionStore::new(client.clone(), "data");
    let executor = RecordingExecutor::new();
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    assert_eq!(runner.check_direction(&v("1.2.0")).await.unwrap(), v("1.2.0"));
    assert_eq!(runner.check_direction(&v("2.0.0")).await.unwrap(), v("1.2.0"));
    assert!(matches!(
        runner.check_direction(&v("1.2.0-rc.1")).await,
        Err(MigrateError::DowngradeRejected { .. })
    ));
    assert!(executor.invocations().is_empty());
    assert!(checkpoints(&client).is_empty());
}

#[tokio::test]
async fn test_runs_scripts_strictly_between_versions() {
    let dir = sql_dir(&["1.0.0.sql", "1.1.0.sql", "1.2.0.sql", "2.0.0.sql", "2.1.0.sql"]);
    let config = config(dir.path());
    let client = MemoryClient::new().with_version("data", "1.0.0");
    let store = SchemaVersionStore::new(client.clone(), "data");
    let executor = RecordingExecutor::new();
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    let report = runner.run(&v("2.0.0")).await.unwrap();

    assert_eq!(
        report,
        MigrationReport::Migrated {
            from: v("1.0.0"),
            to: v("2.0.0"),
            applied: vec![v("1.1.0"), v("1.2.0")],
        }
    );
    assert_eq!(file_names(&executor), ["1.1.0.sql", "1.2.0.sql"]);
    assert_eq!(client.recorded("data").as_deref(), Some("2.0.0"));
}

#[tokio::test]
async fn test_checkpoint_after_each_script_and_target_last() {
    let dir = sql_dir(&["0.1.0.sql", "0.2.0.sql", "0.3.0.sql"]);
    let config = config(dir.path());
    let client = MemoryClient::new().with_schema("data");
    let store = SchemaVersionStore::new(client.clone(), "data");
    let executor = RecordingExecutor::new();
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    runner.run(&v("1.0.0")).await.unwrap();

    assert_eq!(
        checkpoints(&client),
        [
            ddl::replace_version("data", "0.1.0"),
            ddl::replace_version("data", "0.2.0"),
            ddl::replace_version("data", "1.0.0"),
        ]
    );
}

#[tokio::test]
async fn test_script_invocation_arguments() {
    let dir = sql_dir(&["1.1.0.sql"]);
    let config = config(dir.path());
    let store = SchemaVersionStore::new(MemoryClient::new().with_version("data", "1.0.0"), "data");
    let executor = RecordingExecutor::new();
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    runner.run(&v("1.2.0")).await.unwrap();

    let invocations = executor.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].program, "psql");
    let script = dir.path().join("migration").join("1.1.0.sql");
    assert_eq!(
        invocations[0].args,
        vec![
            "--dbname".to_string(),
            CONN.to_string(),
            "--set".to_string(),
            "ON_ERROR_STOP=1".to_string(),
            "--quiet".to_string(),
            "--command".to_string(),
            r#"SET search_path TO "data""#.to_string(),
            "--single-transaction".to_string(),
            "--file".to_string(),
            script.display().to_string(),
        ]
    );
}

#[tokio::test]
async fn test_sets_search_path_before_reading_version() {
    let dir = sql_dir(&[]);
    let config = config(dir.path());
    let client = MemoryClient::new().with_version("data", "1.0.0");
    let store = SchemaVersionStore::new(client.clone(), "data");
    let executor = RecordingExecutor::new();
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    runner.run(&v("1.0.0")).await.unwrap();

    assert_eq!(client.statements()[0], ddl::set_search_path("data"));
}

#[tokio::test]
async fn test_failure_keeps_last_checkpoint_and_resumes() {
    let dir = sql_dir(&["1.2.0.sql", "1.3.0.sql", "1.4.0.sql"]);
    let config = config(dir.path());
    let client = MemoryClient::new().with_version("data", "1.1.0");
    let store = SchemaVersionStore::new(client.clone(), "data");
    let executor = RecordingExecutor::new();
    executor.fail_when("1.3.0.sql", ProcessOutcome::Exited(3));
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    let err = runner.run(&v("1.5.0")).await.unwrap_err();
    match err {
        MigrateError::ScriptExecutionFailed {
            version,
            path,
            applied,
            planned,
            source,
        } => {
            assert_eq!(version, v("1.3.0"));
            assert_eq!(path, dir.path().join("migration").join("1.3.0.sql"));
            assert_eq!(applied, 1);
            assert_eq!(planned, 3);
            assert_eq!(
                source,
                ExecError::AbnormalExit {
                    program: "psql".to_string(),
                    status: 3
                }
            );
        }
        other => panic!("expected ScriptExecutionFailed, got {other:?}"),
    }
    assert_eq!(client.recorded("data").as_deref(), Some("1.2.0"));
    assert_eq!(file_names(&executor), ["1.2.0.sql", "1.3.0.sql"]);

    executor.clear_failures();
    executor.clear();
    let report = runner.run(&v("1.5.0")).await.unwrap();

    assert_eq!(report.applied(), [v("1.3.0"), v("1.4.0")]);
    assert_eq!(file_names(&executor), ["1.3.0.sql", "1.4.0.sql"]);
    assert_eq!(client.recorded("data").as_deref(), Some("1.5.0"));
}

#[tokio::test]
async fn test_failure_on_first_script_applies_nothing() {
    let dir = sql_dir(&["1.1.0.sql", "1.2.0.sql"]);
    let config = config(dir.path());
    let client = MemoryClient::new().with_version("data", "1.0.0");
    let store = SchemaVersionStore::new(client.clone(), "data");
    let executor = RecordingExecutor::new();
    executor.fail_when("1.1.0.sql", ProcessOutcome::Signaled(9));
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    let err = runner.run(&v("2.0.0")).await.unwrap_err();

    assert!(matches!(
        err,
        MigrateError::ScriptExecutionFailed {
            applied: 0,
            planned: 2,
            source: ExecError::Signaled { signal: 9, .. },
            ..
        }
    ));
    let message = err.to_string();
    assert!(message.contains("[R002]"), "{message}");
    assert!(message.contains("1.1.0"), "{message}");
    assert!(message.contains("0 of 2"), "{message}");
    assert_eq!(client.recorded("data").as_deref(), Some("1.0.0"));
}

#[tokio::test]
async fn test_target_without_script_is_recorded() {
    let dir = sql_dir(&["2.0.0.sql"]);
    let config = config(dir.path());
    let client = MemoryClient::new().with_version("data", "1.0.0");
    let store = SchemaVersionStore::new(client.clone(), "data");
    let executor = RecordingExecutor::new();
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    let report = runner.run(&v("1.1.0")).await.unwrap();

    assert!(report.applied().is_empty());
    assert!(!report.is_up_to_date());
    assert!(executor.invocations().is_empty());
    assert_eq!(client.recorded("data").as_deref(), Some("1.1.0"));
}

#[tokio::test]
async fn test_missing_migration_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let client = MemoryClient::new().with_schema("data");
    let store = SchemaVersionStore::new(client.clone(), "data");
    let executor = RecordingExecutor::new();
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    let report = runner.run(&v("1.0.0")).await.unwrap();

    assert_eq!(
        report,
        MigrationReport::Migrated {
            from: Version::ZERO,
            to: v("1.0.0"),
            applied: vec![],
        }
    );
    assert_eq!(client.recorded("data").as_deref(), Some("1.0.0"));
}

#[tokio::test]
async fn test_migration_path_not_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("migration"), "").unwrap();
    let config = config(dir.path());
    let store = SchemaVersionStore::new(MemoryClient::new().with_schema("data"), "data");
    let executor = RecordingExecutor::new();
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    assert!(matches!(
        runner.run(&v("1.0.0")).await,
        Err(MigrateError::Core(CoreError::NotADirectory { .. }))
    ));
}

#[tokio::test]
async fn test_floor_version_for_fresh_database() {
    let dir = sql_dir(&["0.5.0.sql", "1.0.0.sql", "1.1.0.sql"]);
    let mut config = config(dir.path());
    config.floor_version = v("1.0.0");
    let store = SchemaVersionStore::new(MemoryClient::new().with_schema("data"), "data");
    let executor = RecordingExecutor::new();
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    assert_eq!(runner.current().await.unwrap(), v("1.0.0"));
    let report = runner.run(&v("2.0.0")).await.unwrap();

    assert_eq!(report.applied(), [v("1.1.0")]);
}

#[tokio::test]
async fn test_malformed_script_name_fails_before_running() {
    let dir = sql_dir(&["1.1.0.sql", "01.2.0.sql"]);
    let config = config(dir.path());
    let store = SchemaVersionStore::new(MemoryClient::new().with_version("data", "1.0.0"), "data");
    let executor = RecordingExecutor::new();
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    assert!(matches!(
        runner.run(&v("2.0.0")).await,
        Err(MigrateError::Core(CoreError::VersionParse { .. }))
    ));
    assert!(executor.invocations().is_empty());
}

#[tokio::test]
async fn test_prerelease_target_orders_before_release() {
    let dir = sql_dir(&["1.1.0-beta.1.sql", "1.1.0-rc.1.sql", "1.1.0.sql"]);
    let config = config(dir.path());
    let store = SchemaVersionStore::new(MemoryClient::new().with_version("data", "1.0.0"), "data");
    let executor = RecordingExecutor::new();
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    let report = runner.run(&v("1.1.0-rc.2")).await.unwrap();

    assert_eq!(report.applied(), [v("1.1.0-beta.1"), v("1.1.0-rc.1")]);
}

#[tokio::test]
async fn test_unreachable_database() {
    let dir = sql_dir(&["1.1.0.sql"]);
    let config = config(dir.path());
    let client = MemoryClient::new().with_version("data", "1.0.0");
    client.set_unreachable(true);
    let store = SchemaVersionStore::new(client, "data");
    let executor = RecordingExecutor::new();
    let runner = MigrationRunner::new(&store, &executor, &config, CONN);

    assert!(matches!(
        runner.run(&v("2.0.0")).await,
        Err(MigrateError::Store(DbError::ConnectionError(_)))
    ));
    assert!(executor.invocations().is_empty());
}
