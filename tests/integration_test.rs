//! End-to-end tests over a small fixture dataset laid out like the public
//! open-data tree.
//!
//! These tests:
//! 1. Write competitions, matches, lineups and events into a temp directory
//! 2. Load them into a fresh SQLite database
//! 3. Export a snapshot and run the analytical queries against it

use rusqlite::Connection;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use football_events_sqlite::config::QueryConfig;
use football_events_sqlite::filter::CompetitionFilter;
use football_events_sqlite::ingest::{run_ingest, IngestSummary};
use football_events_sqlite::query::{QueryRunner, QUERIES};
use football_events_sqlite::schema::tables::ALL_TABLES;
use football_events_sqlite::source::DataLayout;
use football_events_sqlite::writer::Database;

// =============================================================================
// Fixture Dataset
// =============================================================================

struct Fixture {
    dir: TempDir,
    layout: DataLayout,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let layout = DataLayout::new(dir.path().join("data"));

        write_json(
            &layout.competitions(),
            json!([
                competition(11, 90, "La Liga", "2020/2021"),
                competition(2, 44, "Premier League", "2003/2004"),
                competition(16, 4, "Champions League", "2018/2019"),
            ]),
        );

        let koeman = json!({"id": 5, "name": "Ronald Koeman", "country": {"name": "Netherlands"}});
        let machin = json!({"id": 7, "name": "Pablo Machín"});
        let wenger = json!({"id": 9, "name": "Arsène Wenger", "nickname": "Le Professeur"});

        write_json(
            &layout.matches(11, 90),
            json!([
                fixture_match(100, (11, 90), team("home", 217, "Barcelona", Some(&koeman)), team("away", 206, "Alavés", Some(&machin))),
                fixture_match(101, (11, 90), team("home", 220, "Celta", None), team("away", 217, "Barcelona", Some(&koeman))),
            ]),
        );
        write_json(
            &layout.matches(2, 44),
            json!([fixture_match(200, (2, 44), team("home", 1, "Arsenal", Some(&wenger)), team("away", 40, "Leicester City", None))]),
        );

        let messi = player(5503, "Lionel Messi", 10);
        let pedri = player(30486, "Pedri", 16);
        let barcelona = json!({"team_id": 217, "team_name": "Barcelona", "lineup": [messi, pedri]});
        write_json(
            &layout.lineups(100),
            json!([barcelona, {"team_id": 206, "team_name": "Alavés", "lineup": [player(6581, "Pere Pons", 8)]}]),
        );
        write_json(
            &layout.lineups(101),
            json!([{"team_id": 220, "team_name": "Celta", "lineup": []}, barcelona]),
        );
        write_json(
            &layout.lineups(200),
            json!([
                {"team_id": 1, "team_name": "Arsenal", "lineup": [
                    player(15515, "Thierry Henry", 14),
                    player(15516, "Robert Pirès", 7),
                    player(15517, "Patrick Vieira", 4),
                ]},
                {"team_id": 40, "team_name": "Leicester City", "lineup": []}
            ]),
        );

        write_json(
            &layout.events(100),
            json!([
                event("100-1", 1, "Starting XI", "Barcelona", None, json!({"tactics": {"formation": 433}})),
                event("100-2", 2, "Pass", "Barcelona", Some("Lionel Messi"), json!({
                    "location": [10.5, 20.3],
                    "pass": {"recipient": {"name": "Pedri"}, "length": 21.4, "technique": {"name": "Through Ball"}}
                })),
                event("100-3", 3, "Ball Receipt*", "Barcelona", Some("Pedri"), json!({})),
                event("100-4", 4, "Shot", "Barcelona", Some("Lionel Messi"), json!({
                    "shot": {"statsbomb_xg": 0.25, "first_time": true, "end_location": [120.0, 38.1, 1.2]}
                })),
                event("100-5", 5, "Dribble", "Barcelona", Some("Lionel Messi"), json!({
                    "dribble": {"outcome": {"name": "Complete"}, "nutmeg": true}
                })),
                event("100-6", 6, "Dribbled Past", "Alavés", Some("Pere Pons"), json!({"counterpress": true})),
            ]),
        );
        write_json(
            &layout.events(101),
            json!([
                event("101-1", 1, "Shot", "Barcelona", Some("Lionel Messi"), json!({"shot": {"statsbomb_xg": 0.75}})),
                event("101-2", 2, "Pass", "Barcelona", Some("Pedri"), json!({"pass": {"recipient": {"name": "Lionel Messi"}}})),
            ]),
        );
        write_json(
            &layout.events(200),
            json!([
                event("200-1", 1, "Pass", "Arsenal", Some("Thierry Henry"), json!({"pass": {"recipient": {"name": "Robert Pirès"}}})),
                event("200-2", 2, "Pass", "Arsenal", Some("Patrick Vieira"), json!({"pass": {"recipient": {"name": "Thierry Henry"}}})),
                event("200-3", 3, "Pass", "Arsenal", Some("Robert Pirès"), json!({"pass": {"recipient": {"name": "Thierry Henry"}}})),
                event("200-4", 4, "Shot", "Arsenal", Some("Thierry Henry"), json!({"shot": {"statsbomb_xg": 0.1}})),
            ]),
        );

        Self { dir, layout }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Load the fixture into a fresh database file
    fn load(&self, db_name: &str) -> (Database, IngestSummary) {
        let mut db = Database::create(&self.path(db_name)).expect("Failed to create database");
        db.bootstrap(None).expect("Failed to bootstrap schema");
        let summary = run_ingest(&mut db, &self.layout, &CompetitionFilter::default())
            .expect("Load failed");
        (db, summary)
    }
}

fn write_json(path: &Path, value: Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_vec_pretty(&value).unwrap()).unwrap();
}

fn competition(id: i64, season: i64, name: &str, season_name: &str) -> Value {
    json!({
        "competition_id": id,
        "season_id": season,
        "competition_name": name,
        "season_name": season_name,
        "country_name": "Europe",
        "competition_gender": "male",
    })
}

fn team(side: &str, id: i64, name: &str, manager: Option<&Value>) -> Value {
    let mut team = json!({
        format!("{side}_team_id"): id,
        format!("{side}_team_name"): name,
        format!("{side}_team_gender"): "male",
    });
    if let Some(manager) = manager {
        team["managers"] = json!([manager]);
    }
    team
}

fn fixture_match(id: i64, (competition_id, season_id): (i64, i64), home: Value, away: Value) -> Value {
    json!({
        "match_id": id,
        "match_date": "2021-01-01",
        "kick_off": "21:00:00.000",
        "competition": {"competition_id": competition_id, "competition_name": "fixture"},
        "season": {"season_id": season_id},
        "home_team": home,
        "away_team": away,
        "home_score": 2,
        "away_score": 1,
    })
}

fn player(id: i64, name: &str, jersey: i64) -> Value {
    json!({"player_id": id, "player_name": name, "jersey_number": jersey, "country": {"name": "Spain"}})
}

fn event(id: &str, index: i64, label: &str, team: &str, player: Option<&str>, extra: Value) -> Value {
    let mut event = json!({
        "id": id,
        "index": index,
        "period": 1,
        "timestamp": "00:00:01.000",
        "minute": 0,
        "second": index,
        "type": {"name": label},
        "team": {"name": team},
    });
    if let Some(player) = player {
        event["player"] = json!({"name": player});
    }
    if let (Some(target), Value::Object(extra)) = (event.as_object_mut(), extra) {
        target.extend(extra);
    }
    event
}

fn table_counts(db: &Database) -> Vec<(&'static str, u64)> {
    ALL_TABLES
        .iter()
        .map(|table| (table.name, db.row_count(table.name).unwrap()))
        .collect()
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_load_counts() {
    let fixture = Fixture::new();
    let (db, summary) = fixture.load("load.db");

    assert!(summary.failed_steps.is_empty(), "{:?}", summary.failed_steps);
    // every competition is stored, even outside the whitelist
    assert_eq!(db.row_count("competitions").unwrap(), 3);
    assert_eq!(db.row_count("matches").unwrap(), 3);
    assert_eq!(db.row_count("managers").unwrap(), 3);
    assert_eq!(db.row_count("lineups").unwrap(), 6);
    assert_eq!(db.row_count("players").unwrap(), 6);
    assert_eq!(db.row_count("plays").unwrap(), 8);
    assert_eq!(db.row_count("events").unwrap(), 12);
    assert_eq!(db.row_count("pass").unwrap(), 5);
    assert_eq!(db.row_count("shot").unwrap(), 3);
    assert_eq!(summary.count("events"), 12);
    assert_eq!(summary.unrecognized_types.get("Starting XI"), Some(&1));
}

#[test]
fn test_subtype_row_iff_recognized() {
    let fixture = Fixture::new();
    let (db, _) = fixture.load("load.db");

    let subtype_total: u64 = ALL_TABLES
        .iter()
        .filter(|table| table.dependencies().contains("events"))
        .map(|table| db.row_count(table.name).unwrap())
        .sum();
    assert_eq!(subtype_total, 11);

    let orphans: i64 = db
        .connection()
        .query_row(
            "SELECT count(*) FROM events e WHERE e.type = 'Starting XI'
               AND EXISTS (SELECT 1 FROM pass p WHERE p.event_id = e.event_id)",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(orphans, 0);
}

#[test]
fn test_mapped_values() {
    let fixture = Fixture::new();
    let (db, _) = fixture.load("load.db");
    let conn = db.connection();

    let location: String = conn
        .query_row("SELECT location FROM events WHERE event_id = '100-2'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(location, "(10.5,20.3)");

    let (home, away): (Option<i64>, Option<i64>) = conn
        .query_row(
            "SELECT home_team_manager, away_team_manager FROM matches WHERE match_id = 101",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(home, None);
    assert_eq!(away, Some(5));

    // counterpress lives on the event, not under "dribbled_past"
    let counterpress: bool = conn
        .query_row("SELECT counterpress FROM dribbled_past WHERE event_id = '100-6'", [], |row| row.get(0))
        .unwrap();
    assert!(counterpress);

    let receipt_type: String = conn
        .query_row("SELECT type FROM events WHERE event_id = '100-3'", [], |row| row.get(0))
        .unwrap();
    // the trailing marker is stripped from stored labels
    assert_eq!(receipt_type, "Ball Receipt");
}

#[test]
fn test_reload_is_identical() {
    let fixture = Fixture::new();
    let (first, _) = fixture.load("first.db");
    let (second, _) = fixture.load("second.db");
    assert_eq!(table_counts(&first), table_counts(&second));

    // recreating over an existing file starts from scratch
    drop(first);
    let (again, _) = fixture.load("first.db");
    assert_eq!(table_counts(&again), table_counts(&second));
}

#[test]
fn test_missing_events_file_aborts_only_that_step() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.layout.events(101)).unwrap();

    let (db, summary) = fixture.load("partial.db");
    let failed: Vec<_> = summary.failed_steps.iter().map(|(step, _)| *step).collect();
    assert_eq!(failed, vec!["events"]);
    assert_eq!(db.row_count("events").unwrap(), 0);
    // earlier steps are untouched
    assert_eq!(db.row_count("matches").unwrap(), 3);
    assert_eq!(db.row_count("plays").unwrap(), 8);
}

#[test]
fn test_repeated_player_and_null_fields_load_cleanly() {
    let fixture = Fixture::new();
    write_json(
        &fixture.layout.lineups(200),
        json!([
            {"team_id": 1, "team_name": "Arsenal", "lineup": [
                player(15515, "Thierry Henry", 14),
                player(15516, "Robert Pirès", 7),
                player(15517, "Patrick Vieira", 4),
                player(15515, "Thierry Henry", 12),
            ]},
            {"team_id": 40, "team_name": "Leicester City", "lineup": null}
        ]),
    );
    write_json(
        &fixture.layout.events(200),
        json!([event("200-1", 1, "Pass", "Arsenal", Some("Thierry Henry"), json!({
            "under_pressure": null,
            "pass": {"recipient": {"name": "Robert Pirès"}, "cross": null}
        }))]),
    );

    let (db, summary) = fixture.load("repeated.db");
    assert!(summary.failed_steps.is_empty());
    assert_eq!(db.row_count("plays").unwrap(), 8);

    let jersey: i64 = db
        .connection()
        .query_row(
            "SELECT p.jersey_number FROM plays p JOIN lineups l ON l.lineup_id = p.lineup_id
             WHERE p.player_id = 15515 AND l.match_id = 200",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(jersey, 14);

    let under_pressure: bool = db
        .connection()
        .query_row("SELECT under_pressure FROM events WHERE event_id = '200-1'", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert!(!under_pressure);
}

// =============================================================================
// Query Tests
// =============================================================================

fn run_queries(fixture: &Fixture) -> Vec<football_events_sqlite::query::QueryOutcome> {
    let (db, _) = fixture.load("load.db");
    let snapshot = fixture.path("snapshot.db");
    db.export_snapshot(&snapshot).unwrap();
    drop(db);

    let config = QueryConfig::new(snapshot, fixture.path("scratch.db"), fixture.path("out"));
    let queries: Vec<_> = QUERIES.iter().collect();
    QueryRunner::new(config).run(&queries).unwrap()
}

fn read_csv(fixture: &Fixture, number: u8) -> String {
    fs::read_to_string(fixture.path("out").join(format!("Q_{}.csv", number))).unwrap()
}

#[test]
fn test_query_results() {
    let fixture = Fixture::new();
    let outcomes = run_queries(&fixture);

    assert_eq!(outcomes.len(), 10);
    for outcome in &outcomes {
        assert!(outcome.timing.is_complete(), "Q{} incomplete", outcome.number);
        assert!(outcome.timing.to_string().starts_with("Execution Time: "));
    }

    assert_eq!(read_csv(&fixture, 1), "player_name,xg_score\nLionel Messi,0.5\n");
    assert_eq!(read_csv(&fixture, 2), "player_name,shots\nLionel Messi,2\n");
    assert_eq!(read_csv(&fixture, 3), "player_name,first_time_shots\nLionel Messi,1\n");
    assert_eq!(read_csv(&fixture, 4), "team,passes\nBarcelona,2\n");
    // top recipient is skipped
    assert_eq!(read_csv(&fixture, 5), "recipient,passes\nRobert Pirès,1\n");
    assert_eq!(read_csv(&fixture, 6), "team,shots\nArsenal,1\n");
    assert_eq!(read_csv(&fixture, 7), "player_name,through_balls\nLionel Messi,1\n");
    assert_eq!(read_csv(&fixture, 8), "team,through_balls\nBarcelona,1\n");
    assert_eq!(read_csv(&fixture, 9), "player_name,successful_dribbles\nLionel Messi,1\n");
    assert_eq!(read_csv(&fixture, 10), "player_name,dribbled_past\nPere Pons,1\n");
}

#[test]
fn test_scratch_database_does_not_touch_snapshot() {
    let fixture = Fixture::new();
    run_queries(&fixture);

    let snapshot = Connection::open(fixture.path("snapshot.db")).unwrap();
    let events: i64 = snapshot
        .query_row("SELECT count(*) FROM events", [], |row| row.get(0))
        .unwrap();
    assert_eq!(events, 12);
    assert!(fixture.path("scratch.db").is_file());
}
