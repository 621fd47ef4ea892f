use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::filter::CompetitionFilter;
use crate::mapper::{
    competition_row, event_row, lineup_row, manager_row, match_row, player_row, plays_row,
    EventDetail, Row,
};
use crate::schema::{TableSchema, ALL_TABLES};
use crate::source::model::{Competition, Event, Lineup, Match};
use crate::source::{read_document, DataLayout};
use crate::writer::RowSet;

/// competitions.json mapped to rows, plus the whitelisted season keys
#[derive(Debug, Default)]
pub struct CompetitionBatch {
    pub rows: Vec<Row>,
    /// (competition_id, season_id) pairs whose matches should be loaded
    pub selected: Vec<(i64, i64)>,
}

#[derive(Debug, Default)]
pub struct MatchBatch {
    pub managers: Vec<Row>,
    pub matches: Vec<Row>,
    pub match_ids: Vec<i64>,
}

#[derive(Debug, Default)]
pub struct LineupBatch {
    pub lineups: Vec<Row>,
    pub players: Vec<Row>,
    pub plays: Vec<Row>,
}

#[derive(Debug, Default)]
pub struct EventBatch {
    pub events: Vec<Row>,
    /// Subtype rows grouped per table, in schema order
    pub details: Vec<(&'static TableSchema, Vec<Row>)>,
    pub unrecognized: BTreeMap<String, usize>,
}

impl EventBatch {
    pub fn detail_rows(&self, table: &str) -> usize {
        self.details
            .iter()
            .find(|(schema, _)| schema.name == table)
            .map(|(_, rows)| rows.len())
            .unwrap_or(0)
    }
}

pub fn collect_competitions(
    layout: &DataLayout,
    filter: &CompetitionFilter,
) -> Result<CompetitionBatch> {
    let competitions: Vec<Competition> = read_document(&layout.competitions())?;

    let mut selected = BTreeSet::new();
    let mut rows = Vec::with_capacity(competitions.len());
    for competition in &competitions {
        if filter.accepts(competition) {
            selected.insert((competition.competition_id, competition.season_id));
        }
        rows.push(competition_row(competition));
    }

    Ok(CompetitionBatch {
        rows,
        selected: selected.into_iter().collect(),
    })
}

pub fn collect_matches(layout: &DataLayout, seasons: &[(i64, i64)]) -> Result<MatchBatch> {
    let mut managers: RowSet<i64> = RowSet::new();
    let mut batch = MatchBatch::default();

    for &(competition_id, season_id) in seasons {
        let path = layout.matches(competition_id, season_id);
        let matches: Vec<Match> = read_document(&path)?;
        debug!(competition_id, season_id, matches = matches.len(), "read matches");

        for m in &matches {
            let teams = [m.home_team.as_ref(), m.away_team.as_ref()];
            for manager in teams.into_iter().flatten().filter_map(|t| t.manager()) {
                if let Some((id, row)) = manager_row(manager) {
                    managers.insert(id, row);
                }
            }

            batch.matches.push(match_row(m));
            batch.match_ids.push(m.match_id);
        }
    }

    batch.managers = managers.into_rows();
    Ok(batch)
}

/// Lineup ids are assigned from a counter starting at 0, in match order
pub fn collect_lineups(layout: &DataLayout, match_ids: &[i64]) -> Result<LineupBatch> {
    let mut players: RowSet<i64> = RowSet::new();
    let mut plays: RowSet<(i64, i64)> = RowSet::new();
    let mut batch = LineupBatch::default();
    let mut next_lineup_id: i64 = 0;

    for &match_id in match_ids {
        let lineups: Vec<Lineup> = read_document(&layout.lineups(match_id))?;

        for lineup in &lineups {
            let lineup_id = next_lineup_id;
            next_lineup_id += 1;

            for player in &lineup.lineup {
                players.insert(player.player_id, player_row(player));
                plays.insert(
                    (player.player_id, lineup_id),
                    plays_row(player.player_id, player.jersey_number, lineup_id),
                );
            }

            batch.lineups.push(lineup_row(
                lineup_id,
                lineup.team_id,
                lineup.team_name.as_deref(),
                match_id,
            ));
        }
    }

    batch.players = players.into_rows();
    batch.plays = plays.into_rows();
    Ok(batch)
}

pub fn collect_events(layout: &DataLayout, match_ids: &[i64]) -> Result<EventBatch> {
    let mut grouped: BTreeMap<&'static str, Vec<Row>> = BTreeMap::new();
    let mut batch = EventBatch::default();

    for &match_id in match_ids {
        let path = layout.events(match_id);
        let events: Vec<Event> = read_document(&path)?;

        for event in &events {
            batch.events.push(event_row(event, match_id));

            let detail = EventDetail::from_event(event);
            match detail.row(&event.id) {
                Some((table, row)) => grouped.entry(table.name).or_default().push(row),
                None => {
                    debug!(event_id = %event.id, label = event.type_label(), "no subtype row");
                    *batch
                        .unrecognized
                        .entry(event.type_label().to_string())
                        .or_default() += 1;
                }
            }
        }
    }

    batch.details = ALL_TABLES
        .iter()
        .filter_map(|table| grouped.remove(table.name).map(|rows| (*table, rows)))
        .collect();
    anyhow::ensure!(
        grouped.is_empty(),
        "subtype rows mapped to unregistered tables: {:?}",
        grouped.keys().collect::<Vec<_>>()
    );

    info!(
        events = batch.events.len(),
        unrecognized = batch.unrecognized.values().sum::<usize>(),
        "events mapped"
    );
    Ok(batch)
}

/// Read every document the pipeline would touch and fail on the first
/// problem, without writing anything
pub fn check_sources(layout: &DataLayout, filter: &CompetitionFilter) -> Result<usize> {
    let competitions = collect_competitions(layout, filter).context("competitions")?;
    let matches = collect_matches(layout, &competitions.selected).context("matches")?;
    collect_lineups(layout, &matches.match_ids).context("lineups")?;
    collect_events(layout, &matches.match_ids).context("events")?;
    Ok(matches.match_ids.len())
}
