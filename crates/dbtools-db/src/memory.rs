//! In-memory [`SqlClient`] for tests.
//!
//! Understands the statements produced by [`crate::ddl`] (schema creation and
//! removal plus the version function) and records every statement it sees.
//! Anything else is accepted and only recorded. Clones share state, so a test
//! can hand one clone to a store and inspect another.

use crate::ddl::VERSION_FUNCTION;
use crate::error::{DbError, DbResult};
use crate::traits::SqlClient;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    schemas: BTreeSet<String>,
    versions: BTreeMap<String, String>,
    statements: Vec<String>,
    fail_on: Vec<String>,
    unreachable: bool,
}

/// Shared-state fake database.
#[derive(Debug, Clone, Default)]
pub struct MemoryClient {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `schema` already created.
    pub fn with_schema(self, schema: &str) -> Self {
        self.lock().schemas.insert(schema.to_string());
        self
    }

    /// Start with `schema` created and `version` recorded in it.
    pub fn with_version(self, schema: &str, version: &str) -> Self {
        {
            let mut state = self.lock();
            state.schemas.insert(schema.to_string());
            state
                .versions
                .insert(schema.to_string(), version.to_string());
        }
        self
    }

    /// Recorded version text in `schema`, if any.
    pub fn recorded(&self, schema: &str) -> Option<String> {
        self.lock().versions.get(schema).cloned()
    }

    pub fn has_schema(&self, schema: &str) -> bool {
        self.lock().schemas.contains(schema)
    }

    /// Every statement executed or queried so far, in order.
    pub fn statements(&self) -> Vec<String> {
        self.lock().statements.clone()
    }

    /// Fail any statement containing `fragment` with an execution error.
    pub fn fail_on(&self, fragment: &str) {
        self.lock().fail_on.push(fragment.to_string());
    }

    /// Make every call fail as if the server were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }

    /// Record `sql` and apply failure injection.
    fn begin(&self, sql: &str) -> DbResult<MutexGuard<'_, MemoryState>> {
        let mut state = self.lock();
        if state.unreachable {
            return Err(DbError::ConnectionError(
                "connection refused (memory client unreachable)".to_string(),
            ));
        }
        state.statements.push(sql.to_string());
        if state.fail_on.iter().any(|f| sql.contains(f.as_str())) {
            return Err(DbError::ExecutionError(format!("injected failure: {sql}")));
        }
        Ok(state)
    }
}

/// Parse a leading double-quoted identifier, returning it and the remainder.
fn leading_ident(s: &str) -> Option<(String, &str)> {
    let rest = s.strip_prefix('"')?;
    let mut ident = String::new();
    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '"' {
            if rest[i + 1..].starts_with('"') {
                ident.push('"');
                chars.next();
            } else {
                return Some((ident, &rest[i + 1..]));
            }
        } else {
            ident.push(c);
        }
    }
    None
}

/// Extract the single-quoted literal that follows `marker`.
fn literal_after(s: &str, marker: &str) -> Option<String> {
    let start = s.find(marker)? + marker.len();
    let rest = s[start..].strip_prefix('\'')?;
    let mut value = String::new();
    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '\'' {
            if rest[i + 1..].starts_with('\'') {
                value.push('\'');
                chars.next();
            } else {
                return Some(value);
            }
        } else {
            value.push(c);
        }
    }
    None
}

fn unsupported(sql: &str) -> DbError {
    DbError::ExecutionError(format!("memory client cannot evaluate: {sql}"))
}

#[async_trait]
impl SqlClient for MemoryClient {
    async fn execute(&self, sql: &str) -> DbResult<()> {
        let mut state = self.begin(sql)?;

        if let Some(rest) = sql.strip_prefix("CREATE SCHEMA ") {
            let (schema, _) = leading_ident(rest).ok_or_else(|| unsupported(sql))?;
            if !state.schemas.insert(schema.clone()) {
                return Err(DbError::ExecutionError(format!(
                    "schema \"{schema}\" already exists"
                )));
            }
        } else if let Some(rest) = sql.strip_prefix("DROP SCHEMA IF EXISTS ") {
            let (schema, _) = leading_ident(rest).ok_or_else(|| unsupported(sql))?;
            state.schemas.remove(&schema);
            state.versions.remove(&schema);
        } else if let Some(rest) = sql.strip_prefix("CREATE OR REPLACE FUNCTION ") {
            let (schema, rest) = leading_ident(rest).ok_or_else(|| unsupported(sql))?;
            if rest.starts_with(&format!(".{VERSION_FUNCTION}()")) {
                if !state.schemas.contains(&schema) {
                    return Err(DbError::ExecutionError(format!(
                        "schema \"{schema}\" does not exist"
                    )));
                }
                let version = literal_after(rest, "RETURN ").ok_or_else(|| unsupported(sql))?;
                state.versions.insert(schema, version);
            }
        }

        Ok(())
    }

    async fn fetch_bool(&self, sql: &str) -> DbResult<bool> {
        let state = self.begin(sql)?;
        if sql.contains("pg_catalog.pg_proc") {
            let schema = literal_after(sql, "n.nspname = ").ok_or_else(|| unsupported(sql))?;
            return Ok(state.versions.contains_key(&schema));
        }
        Err(unsupported(sql))
    }

    async fn fetch_text(&self, sql: &str) -> DbResult<String> {
        let state = self.begin(sql)?;
        let rest = sql.strip_prefix("SELECT ").ok_or_else(|| unsupported(sql))?;
        let (schema, _) = leading_ident(rest).ok_or_else(|| unsupported(sql))?;
        state.versions.get(&schema).cloned().ok_or_else(|| {
            DbError::ExecutionError(format!(
                "function {schema}.{VERSION_FUNCTION}() does not exist"
            ))
        })
    }

    fn db_type(&self) -> &'static str {
        "memory"
    }
}
