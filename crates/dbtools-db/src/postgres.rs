//! PostgreSQL client backed by tokio-postgres

use crate::error::{DbError, DbResult};
use crate::traits::SqlClient;
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};

/// A live PostgreSQL session.
///
/// The wire connection is driven by a background task that is aborted when
/// the client is dropped, so one `PgClient` scopes exactly one session.
pub struct PgClient {
    client: Client,
    connection: JoinHandle<()>,
}

impl PgClient {
    /// Open a session using a libpq-style connection string or URI.
    pub async fn connect(connection_string: &str) -> DbResult<Self> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls)
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;

        let connection = tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("PostgreSQL connection error: {e}");
            }
        });

        Ok(Self { client, connection })
    }

    async fn fetch_row(&self, sql: &str) -> DbResult<tokio_postgres::Row> {
        self.client
            .query_opt(sql, &[])
            .await?
            .ok_or_else(|| DbError::UnexpectedResult(format!("no row returned: {sql}")))
    }
}

impl Drop for PgClient {
    fn drop(&mut self) {
        self.connection.abort();
    }
}

#[async_trait]
impl SqlClient for PgClient {
    async fn execute(&self, sql: &str) -> DbResult<()> {
        log::debug!("SQL {sql}");
        self.client.batch_execute(sql).await?;
        Ok(())
    }

    async fn fetch_bool(&self, sql: &str) -> DbResult<bool> {
        self.fetch_row(sql)
            .await?
            .try_get(0)
            .map_err(|e| DbError::UnexpectedResult(format!("{e}: {sql}")))
    }

    async fn fetch_text(&self, sql: &str) -> DbResult<String> {
        self.fetch_row(sql)
            .await?
            .try_get(0)
            .map_err(|e| DbError::UnexpectedResult(format!("{e}: {sql}")))
    }

    fn db_type(&self) -> &'static str {
        "postgresql"
    }
}
