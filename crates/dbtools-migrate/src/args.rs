//! Argument vectors for the client, dump, and restore programs.
//!
//! Every program receives `--dbname <connection>` first. The SQL client also
//! stops at the first error and runs quietly.

use std::path::Path;

fn with_dbname(connection: &str, rest: &[&str]) -> Vec<String> {
    let mut args = vec!["--dbname".to_string(), connection.to_string()];
    args.extend(rest.iter().map(|a| a.to_string()));
    args
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

/// SQL client invocation followed by `extra`.
pub fn sql(connection: &str, extra: &[&str]) -> Vec<String> {
    let mut args = with_dbname(connection, &["--set", "ON_ERROR_STOP=1", "--quiet"]);
    args.extend(extra.iter().map(|a| a.to_string()));
    args
}

/// Run one script file.
pub fn sql_file(connection: &str, file: &Path) -> Vec<String> {
    let file = path_arg(file);
    sql(connection, &["--file", file.as_str()])
}

/// Run one migration script in a single transaction after `set_search_path`.
pub fn migration(connection: &str, set_search_path: &str, file: &Path) -> Vec<String> {
    let file = path_arg(file);
    sql(
        connection,
        &[
            "--command",
            set_search_path,
            "--single-transaction",
            "--file",
            file.as_str(),
        ],
    )
}

/// Refresh planner statistics after a restore.
pub fn analyze(connection: &str) -> Vec<String> {
    with_dbname(connection, &["--command", "ANALYZE"])
}

/// Dump in the custom archive format.
pub fn dump(connection: &str, file: &Path) -> Vec<String> {
    let file = path_arg(file);
    with_dbname(connection, &["--format", "custom", "--file", file.as_str()])
}

/// Restore, dropping existing objects first.
pub fn restore(connection: &str, file: &Path) -> Vec<String> {
    let file = path_arg(file);
    with_dbname(connection, &["--clean", "--if-exists", file.as_str()])
}
