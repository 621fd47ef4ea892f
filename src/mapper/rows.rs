use super::record::{Point, Row, SqlValue};
use crate::source::model::{name_of, Competition, Event, LineupPlayer, Manager, Match, Team, Venue};

fn venue_name(venue: &Option<Venue>) -> Option<String> {
    venue.as_ref().and_then(|v| v.name.clone())
}

fn venue_country(venue: &Option<Venue>) -> Option<String> {
    venue.as_ref().and_then(|v| name_of(&v.country))
}

pub fn competition_row(competition: &Competition) -> Row {
    Row::new(vec![
        competition.competition_id.into(),
        competition.season_id.into(),
        competition.competition_name.clone().into(),
        competition.competition_gender.clone().into(),
        competition.country_name.clone().into(),
        competition.season_name.clone().into(),
        competition.competition_youth.into(),
        competition.competition_international.into(),
    ])
}

/// Managers without an id cannot be keyed and are skipped
pub fn manager_row(manager: &Manager) -> Option<(i64, Row)> {
    let id = manager.id?;
    let row = Row::new(vec![
        id.into(),
        manager.name.clone().into(),
        manager.nickname.clone().into(),
        manager.dob.clone().into(),
        name_of(&manager.country).into(),
    ]);
    Some((id, row))
}

fn team_values(team: Option<&Team>) -> Vec<SqlValue> {
    let team = team.cloned().unwrap_or_default();
    let manager_id = team.manager().and_then(|m| m.id);
    vec![
        team.team_id.into(),
        team.team_name.into(),
        team.team_gender.into(),
        manager_id.into(),
        team.team_group.into(),
        name_of(&team.country).into(),
    ]
}

pub fn match_row(m: &Match) -> Row {
    let mut values: Vec<SqlValue> = vec![
        m.match_id.into(),
        m.competition.competition_id.into(),
        m.season.season_id.into(),
        m.competition.country_name.clone().into(),
        m.season.season_name.clone().into(),
        m.match_date.clone().into(),
        m.kick_off.clone().into(),
        venue_name(&m.stadium).into(),
        venue_country(&m.stadium).into(),
        venue_name(&m.referee).into(),
        venue_country(&m.referee).into(),
    ];
    values.extend(team_values(m.home_team.as_ref()));
    values.extend(team_values(m.away_team.as_ref()));
    let result: [SqlValue; 4] = [
        m.home_score.into(),
        m.away_score.into(),
        m.match_week.into(),
        name_of(&m.competition_stage).into(),
    ];
    values.extend(result);
    Row::new(values)
}

pub fn lineup_row(lineup_id: i64, team_id: Option<i64>, team_name: Option<&str>, match_id: i64) -> Row {
    Row::new(vec![
        lineup_id.into(),
        team_id.into(),
        team_name.into(),
        match_id.into(),
    ])
}

pub fn player_row(player: &LineupPlayer) -> Row {
    Row::new(vec![
        player.player_id.into(),
        player.player_name.clone().into(),
        player.player_nickname.clone().into(),
        player.jersey_number.into(),
        name_of(&player.country).into(),
    ])
}

pub fn plays_row(player_id: i64, jersey_number: Option<i64>, lineup_id: i64) -> Row {
    Row::new(vec![
        player_id.into(),
        jersey_number.into(),
        lineup_id.into(),
    ])
}

pub fn event_row(event: &Event, match_id: i64) -> Row {
    let location = event.location.as_deref().and_then(Point::from_coords);
    let formation = event.tactics.as_ref().and_then(|t| t.formation);

    Row::new(vec![
        event.id.as_str().into(),
        event.index.into(),
        event.period.into(),
        event.timestamp.clone().into(),
        event.minute.into(),
        event.second.into(),
        event.type_label().into(),
        event.possession.into(),
        name_of(&event.possession_team).into(),
        name_of(&event.play_pattern).into(),
        name_of(&event.team).into(),
        name_of(&event.player).into(),
        name_of(&event.position).into(),
        location.into(),
        event.duration.into(),
        event.under_pressure.into(),
        event.off_camera.into(),
        event.out.into(),
        event.counterpress.into(),
        formation.into(),
        match_id.into(),
    ])
}
