use anyhow::{Context, Result};
use rusqlite::{Connection, DatabaseName};
use std::path::Path;
use tracing::{debug, info};

use super::schema_gen::{generate_schema_script, quote_ident};
use crate::mapper::Row;
use crate::schema::{DependencyResolver, TableSchema};

/// Explicit database handle passed to every pipeline stage
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a fresh database file, replacing any previous load
    pub fn create(db_path: &Path) -> Result<Self> {
        // Remove existing database if present
        if db_path.exists() {
            std::fs::remove_file(db_path).context("Failed to remove existing database")?;
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to create database: {:?}", db_path))?;

        Self::configure(conn)
    }

    /// Open an existing database without touching its contents
    pub fn open(db_path: &Path) -> Result<Self> {
        anyhow::ensure!(db_path.is_file(), "Database not found: {:?}", db_path);
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        Self::configure(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self> {
        // Enable foreign keys and optimize for bulk insert
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
        )
        .context("Failed to configure database")?;

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create all destination tables, either from a user-supplied script or
    /// from the built-in schema definitions
    pub fn bootstrap(&self, script: Option<&Path>) -> Result<()> {
        let sql = match script {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read schema script: {:?}", path))?,
            None => {
                let tables = DependencyResolver::new()
                    .all_tables_ordered()
                    .map_err(anyhow::Error::msg)?;
                generate_schema_script(&tables)
            }
        };

        self.conn
            .execute_batch(&sql)
            .context("Failed to execute schema script")?;
        info!(custom = script.is_some(), "schema created");

        Ok(())
    }

    /// Insert all rows for one table with a single prepared statement inside
    /// one transaction. An empty row set issues no statement.
    pub fn insert_rows(&mut self, schema: &TableSchema, rows: &[Row]) -> Result<usize> {
        if rows.is_empty() {
            debug!(table = schema.name, "no rows to insert");
            return Ok(0);
        }

        let columns: Vec<String> = schema.column_names().into_iter().map(quote_ident).collect();
        let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
        let insert_sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(schema.name),
            columns.join(", "),
            placeholders.join(", ")
        );

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx
                .prepare_cached(&insert_sql)
                .with_context(|| format!("Failed to prepare insert for: {}", schema.name))?;

            for row in rows {
                anyhow::ensure!(
                    row.len() == columns.len(),
                    "Row for {} has {} values, expected {}",
                    schema.name,
                    row.len(),
                    columns.len()
                );
                for (idx, value) in row.values.iter().enumerate() {
                    value.bind_to(idx + 1, &mut stmt)?;
                }
                stmt.raw_execute()
                    .with_context(|| format!("Failed to insert into: {}", schema.name))?;
            }
        }
        tx.commit()?;

        info!(table = schema.name, count = rows.len(), "inserted rows");
        Ok(rows.len())
    }

    pub fn row_count(&self, table: &str) -> Result<u64> {
        let sql = format!("SELECT count(*) FROM {}", quote_ident(table));
        let count: i64 = self
            .conn
            .query_row(&sql, [], |row| row.get(0))
            .with_context(|| format!("Failed to count rows in: {}", table))?;
        Ok(count as u64)
    }

    /// Write a consistent copy of the database to `dest` using the online
    /// backup API. This is the snapshot the query runner provisions from.
    pub fn export_snapshot(&self, dest: &Path) -> Result<()> {
        if dest.exists() {
            std::fs::remove_file(dest).context("Failed to remove existing snapshot")?;
        }
        self.conn
            .backup(DatabaseName::Main, dest, None)
            .with_context(|| format!("Failed to export snapshot: {:?}", dest))?;
        info!(path = %dest.display(), "snapshot exported");
        Ok(())
    }

    /// Finalize the database
    pub fn finalize(self) -> Result<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        Ok(())
    }
}
