//! Table schema definitions for the football event dataset

use super::types::*;

const EVENTS_SOURCE: &str = "events/{match_id}.json";

const EVENT_DETAIL_FK: &[ForeignKey] = &[ForeignKey::new(&["event_id"], "events")];

// =============================================================================
// Competitions, managers, matches
// =============================================================================

pub static COMPETITIONS: TableSchema = TableSchema {
    name: "competitions",
    source_file: "competitions.json",
    columns: &[
        Column::required("competition_id", ColumnType::Integer),
        Column::required("season_id", ColumnType::Integer),
        Column::new("competition_name", ColumnType::Text),
        Column::new("competition_gender", ColumnType::Text),
        Column::new("country_name", ColumnType::Text),
        Column::new("season_name", ColumnType::Text),
        Column::flag("competition_youth"),
        Column::flag("competition_international"),
    ],
    primary_key: &["competition_id", "season_id"],
    foreign_keys: &[],
    indexes: &[Index::on(&["competition_name", "season_name"])],
};

pub static MANAGERS: TableSchema = TableSchema {
    name: "managers",
    source_file: "matches/{competition_id}/{season_id}.json",
    columns: &[
        Column::required("manager_id", ColumnType::Integer),
        Column::new("name", ColumnType::Text),
        Column::new("nickname", ColumnType::Text),
        Column::new("dob", ColumnType::Text),
        Column::new("country_name", ColumnType::Text),
    ],
    primary_key: &["manager_id"],
    foreign_keys: &[],
    indexes: &[],
};

pub static MATCHES: TableSchema = TableSchema {
    name: "matches",
    source_file: "matches/{competition_id}/{season_id}.json",
    columns: &[
        Column::required("match_id", ColumnType::Integer),
        Column::required("competition_id", ColumnType::Integer),
        Column::required("season_id", ColumnType::Integer),
        Column::new("competition_country", ColumnType::Text),
        Column::new("season_name", ColumnType::Text),
        Column::new("match_date", ColumnType::Text),
        Column::new("kick_off", ColumnType::Text),
        Column::new("stadium", ColumnType::Text),
        Column::new("stadium_country", ColumnType::Text),
        Column::new("referee_name", ColumnType::Text),
        Column::new("referee_country", ColumnType::Text),
        Column::new("home_team_id", ColumnType::Integer),
        Column::new("home_team_name", ColumnType::Text),
        Column::new("home_team_gender", ColumnType::Text),
        Column::new("home_team_manager", ColumnType::Integer),
        Column::new("home_team_group", ColumnType::Text),
        Column::new("home_team_country", ColumnType::Text),
        Column::new("away_team_id", ColumnType::Integer),
        Column::new("away_team_name", ColumnType::Text),
        Column::new("away_team_gender", ColumnType::Text),
        Column::new("away_team_manager", ColumnType::Integer),
        Column::new("away_team_group", ColumnType::Text),
        Column::new("away_team_country", ColumnType::Text),
        Column::new("home_score", ColumnType::Integer),
        Column::new("away_score", ColumnType::Integer),
        Column::new("match_week", ColumnType::Integer),
        Column::new("competition_stage", ColumnType::Text),
    ],
    primary_key: &["match_id"],
    foreign_keys: &[
        ForeignKey::new(&["competition_id", "season_id"], "competitions"),
        ForeignKey::to(&["home_team_manager"], "managers", &["manager_id"]),
        ForeignKey::to(&["away_team_manager"], "managers", &["manager_id"]),
    ],
    indexes: &[],
};

// =============================================================================
// Lineups and players
// =============================================================================

pub static LINEUPS: TableSchema = TableSchema {
    name: "lineups",
    source_file: "lineups/{match_id}.json",
    columns: &[
        Column::required("lineup_id", ColumnType::Integer),
        Column::new("team_id", ColumnType::Integer),
        Column::new("team_name", ColumnType::Text),
        Column::required("match_id", ColumnType::Integer),
    ],
    primary_key: &["lineup_id"],
    foreign_keys: &[ForeignKey::new(&["match_id"], "matches")],
    indexes: &[],
};

pub static PLAYERS: TableSchema = TableSchema {
    name: "players",
    source_file: "lineups/{match_id}.json",
    columns: &[
        Column::required("player_id", ColumnType::Integer),
        Column::new("player_name", ColumnType::Text),
        Column::new("player_nickname", ColumnType::Text),
        Column::new("jersey_number", ColumnType::Integer),
        Column::new("country", ColumnType::Text),
    ],
    primary_key: &["player_id"],
    foreign_keys: &[],
    indexes: &[],
};

/// Junction between players and the lineups they appeared in
pub static PLAYS: TableSchema = TableSchema {
    name: "plays",
    source_file: "lineups/{match_id}.json",
    columns: &[
        Column::required("player_id", ColumnType::Integer),
        Column::new("jersey_number", ColumnType::Integer),
        Column::required("lineup_id", ColumnType::Integer),
    ],
    primary_key: &["player_id", "lineup_id"],
    foreign_keys: &[
        ForeignKey::new(&["player_id"], "players"),
        ForeignKey::new(&["lineup_id"], "lineups"),
    ],
    indexes: &[],
};

// =============================================================================
// Events
// =============================================================================

pub static EVENTS: TableSchema = TableSchema {
    name: "events",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::required("event_id", ColumnType::Text),
        Column::required("event_index", ColumnType::Integer),
        Column::new("period", ColumnType::Integer),
        Column::new("timestamp", ColumnType::Text),
        Column::new("minute", ColumnType::Integer),
        Column::new("second", ColumnType::Integer),
        Column::required("type", ColumnType::Text),
        Column::new("possession", ColumnType::Integer),
        Column::new("possession_team", ColumnType::Text),
        Column::new("play_pattern", ColumnType::Text),
        Column::new("team", ColumnType::Text),
        Column::new("player_name", ColumnType::Text),
        Column::new("position", ColumnType::Text),
        Column::new("location", ColumnType::Point),
        Column::new("duration", ColumnType::Real),
        Column::flag("under_pressure"),
        Column::flag("off_camera"),
        Column::flag("out"),
        Column::flag("counterpress"),
        Column::new("tactics_formation", ColumnType::Integer),
        Column::required("match_id", ColumnType::Integer),
    ],
    primary_key: &["event_id"],
    foreign_keys: &[ForeignKey::new(&["match_id"], "matches")],
    indexes: &[Index::on(&["type"])],
};

// =============================================================================
// Event subtype tables (one per recognized event type)
// =============================================================================

pub static BAD_BEHAVIOUR: TableSchema = TableSchema {
    name: "bad_behaviour",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::new("card", ColumnType::Text),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static BALL_RECEIPT: TableSchema = TableSchema {
    name: "ball_receipt",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::new("outcome", ColumnType::Text),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static INTERCEPTION: TableSchema = TableSchema {
    name: "interception",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::new("outcome", ColumnType::Text),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static INJURY_STOPPAGE: TableSchema = TableSchema {
    name: "injury_stoppage",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::flag("in_chain"),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static MISCONTROL: TableSchema = TableSchema {
    name: "miscontrol",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::flag("aerial_won"),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static PLAYER_OFF: TableSchema = TableSchema {
    name: "player_off",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::flag("permanent"),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static CARRY: TableSchema = TableSchema {
    name: "carry",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::new("end_location", ColumnType::Point),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static PRESSURE: TableSchema = TableSchema {
    name: "pressure",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::flag("counterpress"),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static DRIBBLED_PAST: TableSchema = TableSchema {
    name: "dribbled_past",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::flag("counterpress"),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static HALF_START: TableSchema = TableSchema {
    name: "half_start",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::flag("late_video_start"),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static CLEARANCE: TableSchema = TableSchema {
    name: "clearance",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::flag("aerial_won"),
        Column::new("body_part", ColumnType::Text),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static SUBSTITUTION: TableSchema = TableSchema {
    name: "substitution",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::new("replacement", ColumnType::Text),
        Column::new("outcome", ColumnType::Text),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static FIFTY_FIFTY: TableSchema = TableSchema {
    name: "fifty_fifty",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::new("outcome", ColumnType::Text),
        Column::flag("counterpress"),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static BALL_RECOVERY: TableSchema = TableSchema {
    name: "ball_recovery",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::flag("offensive"),
        Column::flag("recovery_failure"),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static FOUL_WON: TableSchema = TableSchema {
    name: "foul_won",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::flag("defensive"),
        Column::flag("advantage"),
        Column::flag("penalty"),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static DUEL: TableSchema = TableSchema {
    name: "duel",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::flag("counterpress"),
        Column::new("type", ColumnType::Text),
        Column::new("outcome", ColumnType::Text),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static HALF_END: TableSchema = TableSchema {
    name: "half_end",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::flag("early_video_end"),
        Column::flag("match_suspended"),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static DRIBBLE: TableSchema = TableSchema {
    name: "dribble",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::flag("nutmeg"),
        Column::new("outcome", ColumnType::Text),
        Column::flag("no_touch"),
        Column::flag("overrun"),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static GOALKEEPER: TableSchema = TableSchema {
    name: "goalkeeper",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::new("position", ColumnType::Text),
        Column::new("technique", ColumnType::Text),
        Column::new("body_part", ColumnType::Text),
        Column::new("type", ColumnType::Text),
        Column::new("outcome", ColumnType::Text),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static BLOCK: TableSchema = TableSchema {
    name: "block",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::flag("deflection"),
        Column::flag("offensive"),
        Column::flag("save_block"),
        Column::flag("counterpress"),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static FOUL_COMMITTED: TableSchema = TableSchema {
    name: "foul_committed",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::flag("counterpress"),
        Column::flag("offensive"),
        Column::new("type", ColumnType::Text),
        Column::flag("advantage"),
        Column::flag("penalty"),
        Column::new("card", ColumnType::Text),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static SHOT: TableSchema = TableSchema {
    name: "shot",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::new("key_pass_id", ColumnType::Text),
        Column::new("end_location", ColumnType::Point),
        Column::flag("aerial_won"),
        Column::flag("follows_dribble"),
        Column::flag("first_time"),
        Column::flag("open_goal"),
        Column::new("expected_goals", ColumnType::Real),
        Column::flag("deflected"),
        Column::new("technique", ColumnType::Text),
        Column::new("body_part", ColumnType::Text),
        Column::new("type", ColumnType::Text),
        Column::new("outcome", ColumnType::Text),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

pub static PASS: TableSchema = TableSchema {
    name: "pass",
    source_file: EVENTS_SOURCE,
    columns: &[
        Column::new("recipient", ColumnType::Text),
        Column::new("length", ColumnType::Real),
        Column::new("angle", ColumnType::Real),
        Column::new("height", ColumnType::Text),
        Column::new("end_location", ColumnType::Point),
        Column::new("assisted_shot_id", ColumnType::Text),
        Column::flag("backheel"),
        Column::flag("deflected"),
        Column::flag("miscommunication"),
        Column::flag("crossed"),
        Column::flag("cutback"),
        Column::flag("switch"),
        Column::flag("shot_assist"),
        Column::flag("goal_assist"),
        Column::new("body_part", ColumnType::Text),
        Column::new("type", ColumnType::Text),
        Column::new("outcome", ColumnType::Text),
        Column::new("technique", ColumnType::Text),
        Column::required("event_id", ColumnType::Text),
    ],
    primary_key: &["event_id"],
    foreign_keys: EVENT_DETAIL_FK,
    indexes: &[],
};

// =============================================================================
// Schema Registry
// =============================================================================

/// All table schemas in dependency order
pub static ALL_TABLES: &[&TableSchema] = &[
    &COMPETITIONS,
    &MANAGERS,
    &MATCHES,
    &LINEUPS,
    &PLAYERS,
    &PLAYS,
    &EVENTS,
    &BAD_BEHAVIOUR,
    &BALL_RECEIPT,
    &INTERCEPTION,
    &INJURY_STOPPAGE,
    &MISCONTROL,
    &PLAYER_OFF,
    &CARRY,
    &PRESSURE,
    &DRIBBLED_PAST,
    &HALF_START,
    &CLEARANCE,
    &SUBSTITUTION,
    &FIFTY_FIFTY,
    &BALL_RECOVERY,
    &FOUL_WON,
    &DUEL,
    &HALF_END,
    &DRIBBLE,
    &GOALKEEPER,
    &BLOCK,
    &FOUL_COMMITTED,
    &SHOT,
    &PASS,
];

/// Get table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names_unique() {
        let mut names: Vec<_> = ALL_TABLES.iter().map(|t| t.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_keys_reference_declared_columns() {
        for table in ALL_TABLES {
            for key in table.primary_key {
                assert!(table.column_index(key).is_some(), "{}.{}", table.name, key);
            }
            for fk in table.foreign_keys {
                let parent = get_table(fk.references_table).unwrap();
                assert_eq!(fk.columns.len(), fk.references_columns.len());
                for (col, parent_col) in fk.columns.iter().zip(fk.references_columns) {
                    assert!(table.column_index(col).is_some(), "{}.{}", table.name, col);
                    assert!(parent.column_index(parent_col).is_some());
                }
            }
        }
    }

    #[test]
    fn test_subtype_tables_hang_off_events() {
        let subtypes: Vec<_> = ALL_TABLES
            .iter()
            .filter(|t| t.source_file == EVENTS_SOURCE && t.name != "events")
            .collect();
        assert_eq!(subtypes.len(), 23);
        for table in subtypes {
            assert_eq!(table.columns.last().unwrap().name, "event_id");
            assert!(table.dependencies().contains("events"));
        }
    }
}
