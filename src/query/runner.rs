use anyhow::{Context, Result};
use csv::WriterBuilder;
use rusqlite::backup::Progress;
use rusqlite::types::Value;
use rusqlite::{Connection, DatabaseName, OpenFlags};
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::catalog::AnalyticalQuery;
use crate::config::{ProvisionMode, QueryConfig};

/// Failure of one step of one query. Never aborts the run.
#[derive(Error, Debug)]
pub enum QueryStepError {
    #[error("failed to reset scratch database: {0}")]
    Scratch(#[from] std::io::Error),
    #[error("failed to provision from snapshot: {0}")]
    Provision(#[source] rusqlite::Error),
    #[error("shared scratch database unavailable")]
    ScratchUnavailable,
    #[error("plan/timing failed: {0}")]
    Plan(#[source] rusqlite::Error),
    #[error("fetch failed: {0}")]
    Fetch(#[source] rusqlite::Error),
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryTiming {
    Completed(Duration),
    /// Some step failed; printed as `INC`
    Incomplete,
}

impl QueryTiming {
    pub fn is_complete(&self) -> bool {
        matches!(self, QueryTiming::Completed(_))
    }
}

impl fmt::Display for QueryTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryTiming::Completed(elapsed) => {
                write!(f, "Execution Time: {:.3} ms", elapsed.as_secs_f64() * 1000.0)
            }
            QueryTiming::Incomplete => write!(f, "INC"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub number: u8,
    pub timing: QueryTiming,
    /// Rows written to the CSV file, 0 when incomplete
    pub rows: usize,
}

/// Result set with every value rendered as text
struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

pub struct QueryRunner {
    config: QueryConfig,
}

impl QueryRunner {
    pub fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    /// Run the given queries in order. Only an unreadable snapshot or an
    /// uncreatable output directory fails the whole run.
    pub fn run(&self, queries: &[&AnalyticalQuery]) -> Result<Vec<QueryOutcome>> {
        self.check_snapshot()?;
        std::fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!("Failed to create output directory: {:?}", self.config.output_dir)
        })?;

        let mut shared: Option<Connection> = None;
        let mut provision_failed = false;
        let mut outcomes = Vec::with_capacity(queries.len());

        for query in queries {
            let result = match self.config.provision {
                ProvisionMode::EveryQuery => self
                    .provision()
                    .and_then(|conn| self.execute(&conn, query)),
                ProvisionMode::Once => {
                    // one attempt per run; later queries fail without retrying
                    if shared.is_none() && !provision_failed {
                        match self.provision() {
                            Ok(conn) => shared = Some(conn),
                            Err(err) => {
                                provision_failed = true;
                                warn!("scratch database provisioning failed: {}", err);
                            }
                        }
                    }
                    match &shared {
                        Some(conn) => self.execute(conn, query),
                        None => Err(QueryStepError::ScratchUnavailable),
                    }
                }
            };

            let outcome = match result {
                Ok((elapsed, rows)) => {
                    info!(query = query.number, rows, elapsed_ms = elapsed.as_millis() as u64, "query complete");
                    QueryOutcome {
                        number: query.number,
                        timing: QueryTiming::Completed(elapsed),
                        rows,
                    }
                }
                Err(err) => {
                    warn!(query = query.number, "query incomplete: {}", err);
                    QueryOutcome {
                        number: query.number,
                        timing: QueryTiming::Incomplete,
                        rows: 0,
                    }
                }
            };
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Connection failure is the one fatal error
    fn check_snapshot(&self) -> Result<()> {
        let snapshot = &self.config.snapshot;
        let conn = Connection::open_with_flags(snapshot, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("Failed to open snapshot: {:?}", snapshot))?;
        let tables: i64 = conn
            .query_row("SELECT count(*) FROM sqlite_master WHERE type = 'table'", [], |row| {
                row.get(0)
            })
            .with_context(|| format!("Failed to read snapshot: {:?}", snapshot))?;
        debug!(tables, "snapshot readable");
        Ok(())
    }

    fn provision(&self) -> Result<Connection, QueryStepError> {
        let scratch = &self.config.scratch_db;
        if scratch.exists() {
            std::fs::remove_file(scratch)?;
        }

        let mut conn = Connection::open(scratch).map_err(QueryStepError::Provision)?;
        conn.restore(
            DatabaseName::Main,
            &self.config.snapshot,
            None::<fn(Progress)>,
        )
        .map_err(QueryStepError::Provision)?;
        debug!(path = %scratch.display(), "scratch database provisioned");
        Ok(conn)
    }

    fn execute(
        &self,
        conn: &Connection,
        query: &AnalyticalQuery,
    ) -> Result<(Duration, usize), QueryStepError> {
        let elapsed = plan_and_time(conn, query)?;
        let table = fetch(conn, query)?;
        write_csv(&self.config.output_dir.join(query.csv_name()), &table)?;
        Ok((elapsed, table.rows.len()))
    }
}

/// Log the query plan, then time one full execution of the statement
fn plan_and_time(conn: &Connection, query: &AnalyticalQuery) -> Result<Duration, QueryStepError> {
    let mut plan = conn
        .prepare(&format!("EXPLAIN QUERY PLAN {}", query.sql))
        .map_err(QueryStepError::Plan)?;
    let mut plan_rows = plan.query([]).map_err(QueryStepError::Plan)?;
    while let Some(row) = plan_rows.next().map_err(QueryStepError::Plan)? {
        let detail: String = row.get(3).map_err(QueryStepError::Plan)?;
        debug!(query = query.number, "plan: {}", detail);
    }

    let mut stmt = conn.prepare(query.sql).map_err(QueryStepError::Plan)?;
    let started = Instant::now();
    let mut rows = stmt.query([]).map_err(QueryStepError::Plan)?;
    while rows.next().map_err(QueryStepError::Plan)?.is_some() {}
    Ok(started.elapsed())
}

fn fetch(conn: &Connection, query: &AnalyticalQuery) -> Result<ResultTable, QueryStepError> {
    let mut stmt = conn.prepare(query.sql).map_err(QueryStepError::Fetch)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|idx| row.get::<_, Value>(idx).map(render_value))
                .collect::<rusqlite::Result<Vec<String>>>()
        })
        .map_err(QueryStepError::Fetch)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(QueryStepError::Fetch)?;

    Ok(ResultTable { columns, rows })
}

fn render_value(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s,
        Value::Blob(b) => String::from_utf8_lossy(&b).into_owned(),
    }
}

fn write_csv(path: &Path, table: &ResultTable) -> Result<(), QueryStepError> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{get_query, QUERIES};
    use crate::writer::Database;
    use std::path::PathBuf;

    fn snapshot_fixture(dir: &Path) -> PathBuf {
        let db = Database::create(&dir.join("load.db")).unwrap();
        db.bootstrap(None).unwrap();
        db.connection()
            .execute_batch(
                "INSERT INTO competitions (competition_id, season_id, competition_name, season_name,
                     competition_youth, competition_international)
                 VALUES (11, 90, 'La Liga', '2020/2021', 0, 0);
                 INSERT INTO matches (match_id, competition_id, season_id) VALUES (1, 11, 90);
                 INSERT INTO events (event_id, event_index, type, player_name, team,
                     under_pressure, off_camera, out, counterpress, match_id)
                 VALUES ('e1', 1, 'Shot', 'Lionel Messi', 'Barcelona', 0, 0, 0, 0, 1),
                        ('e2', 2, 'Shot', 'Lionel Messi', 'Barcelona', 0, 0, 0, 0, 1);
                 INSERT INTO shot (event_id, expected_goals, aerial_won, follows_dribble,
                     first_time, open_goal, deflected)
                 VALUES ('e1', 0.25, 0, 0, 1, 0, 0), ('e2', 0.75, 0, 0, 0, 0, 0);",
            )
            .unwrap();
        let snapshot = dir.join("snapshot.db");
        db.export_snapshot(&snapshot).unwrap();
        snapshot
    }

    fn config(dir: &Path, snapshot: PathBuf) -> QueryConfig {
        QueryConfig::new(snapshot, dir.join("scratch.db"), dir.join("out"))
    }

    #[test]
    fn test_timing_display() {
        let timing = QueryTiming::Completed(Duration::from_micros(1500));
        assert_eq!(timing.to_string(), "Execution Time: 1.500 ms");
        assert_eq!(QueryTiming::Incomplete.to_string(), "INC");
    }

    #[test]
    fn test_run_writes_csv_per_query() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_fixture(dir.path());
        let runner = QueryRunner::new(config(dir.path(), snapshot));

        let queries: Vec<_> = QUERIES.iter().collect();
        let outcomes = runner.run(&queries).unwrap();
        assert_eq!(outcomes.len(), 10);
        assert!(outcomes.iter().all(|o| o.timing.is_complete()));

        let q2 = std::fs::read_to_string(dir.path().join("out/Q_2.csv")).unwrap();
        assert_eq!(q2, "player_name,shots\nLionel Messi,2\n");
        let q1 = std::fs::read_to_string(dir.path().join("out/Q_1.csv")).unwrap();
        assert_eq!(q1, "player_name,xg_score\nLionel Messi,0.5\n");
        // nothing loaded for the Premier League
        let q6 = std::fs::read_to_string(dir.path().join("out/Q_6.csv")).unwrap();
        assert_eq!(q6, "team,shots\n");
    }

    #[test]
    fn test_csv_failure_marks_only_that_query() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_fixture(dir.path());
        // a directory where the csv file should go makes the write fail
        std::fs::create_dir_all(dir.path().join("out/Q_3.csv")).unwrap();

        let runner = QueryRunner::new(config(dir.path(), snapshot));
        let queries: Vec<_> = [2, 3, 4].iter().filter_map(|n| get_query(*n)).collect();
        let outcomes = runner.run(&queries).unwrap();

        let timings: Vec<bool> = outcomes.iter().map(|o| o.timing.is_complete()).collect();
        assert_eq!(timings, vec![true, false, true]);
        assert_eq!(outcomes[1].timing, QueryTiming::Incomplete);
        assert!(dir.path().join("out/Q_4.csv").is_file());
    }

    #[test]
    fn test_provision_once_reuses_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_fixture(dir.path());
        let runner =
            QueryRunner::new(config(dir.path(), snapshot).provision_once(true));

        let queries: Vec<_> = QUERIES.iter().take(3).collect();
        let outcomes = runner.run(&queries).unwrap();
        assert!(outcomes.iter().all(|o| o.timing.is_complete()));
        assert_eq!(outcomes[2].rows, 1);
    }

    #[test]
    fn test_provision_once_failure_marks_every_query_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_fixture(dir.path());
        // a directory in place of the scratch file cannot be replaced
        std::fs::create_dir_all(dir.path().join("scratch.db/keep")).unwrap();

        let runner =
            QueryRunner::new(config(dir.path(), snapshot).provision_once(true));
        let queries: Vec<_> = QUERIES.iter().take(3).collect();
        let outcomes = runner.run(&queries).unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.timing == QueryTiming::Incomplete && o.rows == 0));
        assert!(dir.path().join("scratch.db/keep").is_dir());
        assert!(!dir.path().join("out/Q_1.csv").exists());
    }

    #[test]
    fn test_missing_snapshot_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let runner = QueryRunner::new(config(dir.path(), dir.path().join("absent.db")));
        let queries: Vec<_> = QUERIES.iter().collect();
        assert!(runner.run(&queries).is_err());
    }
}
