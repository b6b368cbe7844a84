//! SQLite persistence for parsed log records.

use std::path::Path;

use engine::{LogRecord, RecordSink};
use rusqlite::{params, Connection};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid table name '{0}': use letters, digits and underscores")]
    InvalidTable(String),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Table names are interpolated into SQL, so only plain identifiers pass.
pub fn validate_table_name(table: &str) -> Result<(), StoreError> {
    let mut chars = table.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidTable(table.to_string()))
    }
}

/// Writes records into one table, creating it on first use.
pub struct SqliteSink {
    conn: Connection,
    table: String,
}

impl SqliteSink {
    pub fn open(path: &Path, table: &str) -> Result<Self, StoreError> {
        validate_table_name(table)?;
        info!("Opening database {}", path.display());
        Self::with_connection(Connection::open(path)?, table)
    }

    pub fn with_connection(conn: Connection, table: &str) -> Result<Self, StoreError> {
        validate_table_name(table)?;
        let sink = Self {
            conn,
            table: table.to_string(),
        };
        sink.create_table()?;
        Ok(sink)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn create_table(&self) -> Result<(), StoreError> {
        let sql = format!(
            r#"CREATE TABLE IF NOT EXISTS "{}" (
                id INTEGER PRIMARY KEY,
                "date" TEXT NOT NULL,
                level VARCHAR(15),
                origin TEXT,
                "type" VARCHAR(64),
                ip VARCHAR(128),
                http VARCHAR(10),
                route TEXT,
                code INTEGER,
                "time" REAL,
                "user" TEXT,
                model TEXT,
                records TEXT,
                "text" TEXT
            )"#,
            self.table
        );
        self.conn.execute(&sql, [])?;
        debug!(table = %self.table, "Ensured log table exists");
        Ok(())
    }
}

impl RecordSink for SqliteSink {
    type Error = StoreError;

    /// Insert all records in a single transaction.
    fn store(&mut self, records: &[LogRecord]) -> Result<usize, StoreError> {
        let sql = format!(
            r#"INSERT INTO "{}" ("date", level, origin, "type", ip, http, route, code, "time", "user", model, records, "text")
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"#,
            self.table
        );

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for r in records {
                stmt.execute(params![
                    r.date, r.level, r.origin, r.kind, r.ip, r.http, r.route, r.code, r.time,
                    r.user, r.model, r.records, r.text,
                ])?;
            }
        }
        tx.commit()?;

        info!(table = %self.table, rows = records.len(), "Wrote log records");
        Ok(records.len())
    }
}
