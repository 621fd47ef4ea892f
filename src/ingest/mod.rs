//! Ingestion pipeline: competitions → matches → lineups/players → events.
//!
//! Each step is split into a pure `collect_*` phase (read documents, map
//! rows) and an insert phase. A source error aborts only its own step;
//! database errors abort the run.

mod steps;

pub use steps::*;

use anyhow::Result;
use std::collections::BTreeMap;
use tracing::{debug, error, info};

use crate::filter::CompetitionFilter;
use crate::schema::tables::{COMPETITIONS, EVENTS, LINEUPS, MANAGERS, MATCHES, PLAYERS, PLAYS};
use crate::schema::TableSchema;
use crate::source::DataLayout;
use crate::writer::Database;

/// Outcome of one ingestion run
#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    /// Rows inserted per table
    pub inserted: BTreeMap<&'static str, usize>,
    /// Event type labels with no subtype table, with occurrence counts
    pub unrecognized_types: BTreeMap<String, usize>,
    /// Steps aborted by a source error, with the error text
    pub failed_steps: Vec<(&'static str, String)>,
}

impl IngestSummary {
    pub fn total_rows(&self) -> usize {
        self.inserted.values().sum()
    }

    pub fn count(&self, table: &str) -> usize {
        self.inserted.get(table).copied().unwrap_or(0)
    }

    fn record(&mut self, table: &'static TableSchema, count: usize) {
        *self.inserted.entry(table.name).or_default() += count;
    }

    fn fail(&mut self, step: &'static str, err: anyhow::Error) {
        error!(step, "load step aborted: {:#}", err);
        self.failed_steps.push((step, format!("{:#}", err)));
    }
}

/// Run the four load steps in dependency order against a bootstrapped database
pub fn run_ingest(
    db: &mut Database,
    layout: &DataLayout,
    filter: &CompetitionFilter,
) -> Result<IngestSummary> {
    let mut summary = IngestSummary::default();

    let seasons = match collect_competitions(layout, filter) {
        Ok(batch) => {
            let count = db.insert_rows(&COMPETITIONS, &batch.rows)?;
            summary.record(&COMPETITIONS, count);
            batch.selected
        }
        Err(err) => {
            summary.fail("competitions", err);
            Vec::new()
        }
    };
    info!(seasons = seasons.len(), "competition seasons selected");

    let match_ids = match collect_matches(layout, &seasons) {
        Ok(batch) => {
            let count = db.insert_rows(&MANAGERS, &batch.managers)?;
            summary.record(&MANAGERS, count);
            let count = db.insert_rows(&MATCHES, &batch.matches)?;
            summary.record(&MATCHES, count);
            batch.match_ids
        }
        Err(err) => {
            summary.fail("matches", err);
            Vec::new()
        }
    };

    match collect_lineups(layout, &match_ids) {
        Ok(batch) => {
            let count = db.insert_rows(&LINEUPS, &batch.lineups)?;
            summary.record(&LINEUPS, count);
            let count = db.insert_rows(&PLAYERS, &batch.players)?;
            summary.record(&PLAYERS, count);
            let count = db.insert_rows(&PLAYS, &batch.plays)?;
            summary.record(&PLAYS, count);
        }
        Err(err) => summary.fail("lineups", err),
    }

    match collect_events(layout, &match_ids) {
        Ok(batch) => {
            let count = db.insert_rows(&EVENTS, &batch.events)?;
            summary.record(&EVENTS, count);
            for (table, rows) in &batch.details {
                let count = db.insert_rows(table, rows)?;
                summary.record(*table, count);
            }
            for (label, count) in &batch.unrecognized {
                debug!(label = %label, count, "event type has no subtype table");
            }
            summary.unrecognized_types = batch.unrecognized;
        }
        Err(err) => summary.fail("events", err),
    }

    Ok(summary)
}
