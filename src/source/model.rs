//! Serde models for the open football event dataset.
//!
//! Only identifiers needed to link records are required; every other field
//! is optional so that sparsely populated documents still deserialize.

use serde::{Deserialize, Deserializer};

/// `{"id": .., "name": ..}` reference used throughout the dataset
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Treat an explicit `null` like a missing key
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Name of an optional reference, `None` when either level is missing
pub fn name_of(named: &Option<Named>) -> Option<String> {
    named.as_ref().and_then(|n| n.name.clone())
}

// =============================================================================
// competitions.json
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Competition {
    pub competition_id: i64,
    pub season_id: i64,
    #[serde(default)]
    pub competition_name: Option<String>,
    #[serde(default)]
    pub competition_gender: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub season_name: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub competition_youth: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub competition_international: bool,
}

// =============================================================================
// matches/<competition_id>/<season_id>.json
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Match {
    pub match_id: i64,
    #[serde(default)]
    pub match_date: Option<String>,
    #[serde(default)]
    pub kick_off: Option<String>,
    pub competition: MatchCompetition,
    pub season: MatchSeason,
    #[serde(default)]
    pub home_team: Option<Team>,
    #[serde(default)]
    pub away_team: Option<Team>,
    #[serde(default)]
    pub home_score: Option<i64>,
    #[serde(default)]
    pub away_score: Option<i64>,
    #[serde(default)]
    pub match_week: Option<i64>,
    #[serde(default)]
    pub competition_stage: Option<Named>,
    #[serde(default)]
    pub stadium: Option<Venue>,
    #[serde(default)]
    pub referee: Option<Venue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchCompetition {
    pub competition_id: i64,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub competition_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchSeason {
    pub season_id: i64,
    #[serde(default)]
    pub season_name: Option<String>,
}

/// Home or away side. The dataset prefixes keys with the side
/// (`home_team_name`, `away_team_name`), so both spellings are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Team {
    #[serde(default, alias = "home_team_id", alias = "away_team_id")]
    pub team_id: Option<i64>,
    #[serde(default, alias = "home_team_name", alias = "away_team_name")]
    pub team_name: Option<String>,
    #[serde(default, alias = "home_team_gender", alias = "away_team_gender")]
    pub team_gender: Option<String>,
    #[serde(default, alias = "home_team_group", alias = "away_team_group")]
    pub team_group: Option<String>,
    #[serde(default)]
    pub country: Option<Named>,
    #[serde(default, deserialize_with = "or_default")]
    pub managers: Vec<Manager>,
}

impl Team {
    /// First listed manager, the one the match row references
    pub fn manager(&self) -> Option<&Manager> {
        self.managers.first()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manager {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub country: Option<Named>,
}

/// Stadium or referee: a name with a country
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Venue {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<Named>,
}

// =============================================================================
// lineups/<match_id>.json
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Lineup {
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub lineup: Vec<LineupPlayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineupPlayer {
    pub player_id: i64,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub player_nickname: Option<String>,
    #[serde(default)]
    pub jersey_number: Option<i64>,
    #[serde(default)]
    pub country: Option<Named>,
}

// =============================================================================
// events/<match_id>.json
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,
    pub index: i64,
    #[serde(default)]
    pub period: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub minute: Option<i64>,
    #[serde(default)]
    pub second: Option<i64>,
    #[serde(rename = "type")]
    pub event_type: Named,
    #[serde(default)]
    pub possession: Option<i64>,
    #[serde(default)]
    pub possession_team: Option<Named>,
    #[serde(default)]
    pub play_pattern: Option<Named>,
    #[serde(default)]
    pub team: Option<Named>,
    #[serde(default)]
    pub player: Option<Named>,
    #[serde(default)]
    pub position: Option<Named>,
    #[serde(default)]
    pub location: Option<Vec<f64>>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "or_default")]
    pub under_pressure: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub off_camera: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub out: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub counterpress: bool,
    #[serde(default)]
    pub tactics: Option<Tactics>,

    // Type-specific attribute objects; at most one is populated per event
    #[serde(default)]
    pub bad_behaviour: Option<CardDetail>,
    #[serde(default)]
    pub ball_receipt: Option<OutcomeDetail>,
    #[serde(default)]
    pub interception: Option<OutcomeDetail>,
    #[serde(default)]
    pub injury_stoppage: Option<InjuryStoppageDetail>,
    #[serde(default)]
    pub miscontrol: Option<MiscontrolDetail>,
    #[serde(default)]
    pub player_off: Option<PlayerOffDetail>,
    #[serde(default)]
    pub carry: Option<CarryDetail>,
    #[serde(default)]
    pub pressure: Option<CounterpressDetail>,
    #[serde(default)]
    pub dribbled_past: Option<CounterpressDetail>,
    #[serde(default)]
    pub half_start: Option<HalfStartDetail>,
    #[serde(default)]
    pub clearance: Option<ClearanceDetail>,
    #[serde(default)]
    pub substitution: Option<SubstitutionDetail>,
    #[serde(default, rename = "50_50")]
    pub fifty_fifty: Option<FiftyFiftyDetail>,
    #[serde(default)]
    pub ball_recovery: Option<BallRecoveryDetail>,
    #[serde(default)]
    pub foul_won: Option<FoulWonDetail>,
    #[serde(default)]
    pub duel: Option<DuelDetail>,
    #[serde(default)]
    pub half_end: Option<HalfEndDetail>,
    #[serde(default)]
    pub dribble: Option<DribbleDetail>,
    #[serde(default)]
    pub goalkeeper: Option<GoalkeeperDetail>,
    #[serde(default)]
    pub block: Option<BlockDetail>,
    #[serde(default)]
    pub foul_committed: Option<FoulCommittedDetail>,
    #[serde(default)]
    pub shot: Option<ShotDetail>,
    #[serde(default)]
    pub pass: Option<PassDetail>,
}

impl Event {
    /// Type label with the dataset's trailing `*` marker removed
    pub fn type_label(&self) -> &str {
        self.event_type
            .name
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('*')
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tactics {
    #[serde(default)]
    pub formation: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardDetail {
    #[serde(default)]
    pub card: Option<Named>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutcomeDetail {
    #[serde(default)]
    pub outcome: Option<Named>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InjuryStoppageDetail {
    #[serde(default, deserialize_with = "or_default")]
    pub in_chain: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MiscontrolDetail {
    #[serde(default, deserialize_with = "or_default")]
    pub aerial_won: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerOffDetail {
    #[serde(default, deserialize_with = "or_default")]
    pub permanent: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarryDetail {
    #[serde(default)]
    pub end_location: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CounterpressDetail {
    #[serde(default)]
    pub counterpress: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HalfStartDetail {
    #[serde(default, deserialize_with = "or_default")]
    pub late_video_start: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearanceDetail {
    #[serde(default, deserialize_with = "or_default")]
    pub aerial_won: bool,
    #[serde(default, alias = "bodypart")]
    pub body_part: Option<Named>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubstitutionDetail {
    #[serde(default)]
    pub replacement: Option<Named>,
    #[serde(default)]
    pub outcome: Option<Named>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiftyFiftyDetail {
    #[serde(default)]
    pub outcome: Option<Named>,
    #[serde(default)]
    pub counterpress: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BallRecoveryDetail {
    #[serde(default, deserialize_with = "or_default")]
    pub offensive: bool,
    #[serde(default, deserialize_with = "or_default", alias = "recover_failure")]
    pub recovery_failure: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoulWonDetail {
    #[serde(default, deserialize_with = "or_default")]
    pub defensive: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub advantage: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub penalty: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DuelDetail {
    #[serde(default)]
    pub counterpress: Option<bool>,
    #[serde(default, rename = "type")]
    pub duel_type: Option<Named>,
    #[serde(default)]
    pub outcome: Option<Named>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HalfEndDetail {
    #[serde(default, deserialize_with = "or_default")]
    pub early_video_end: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub match_suspended: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DribbleDetail {
    #[serde(default, deserialize_with = "or_default")]
    pub nutmeg: bool,
    #[serde(default)]
    pub outcome: Option<Named>,
    #[serde(default, deserialize_with = "or_default")]
    pub no_touch: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub overrun: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalkeeperDetail {
    #[serde(default)]
    pub position: Option<Named>,
    #[serde(default)]
    pub technique: Option<Named>,
    #[serde(default, alias = "bodypart")]
    pub body_part: Option<Named>,
    #[serde(default, rename = "type")]
    pub goalkeeper_type: Option<Named>,
    #[serde(default)]
    pub outcome: Option<Named>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockDetail {
    #[serde(default, deserialize_with = "or_default")]
    pub deflection: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub offensive: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub save_block: bool,
    #[serde(default)]
    pub counterpress: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoulCommittedDetail {
    #[serde(default)]
    pub counterpress: Option<bool>,
    #[serde(default, deserialize_with = "or_default")]
    pub offensive: bool,
    #[serde(default, rename = "type")]
    pub foul_type: Option<Named>,
    #[serde(default, deserialize_with = "or_default")]
    pub advantage: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub penalty: bool,
    #[serde(default)]
    pub card: Option<Named>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShotDetail {
    #[serde(default)]
    pub key_pass_id: Option<String>,
    #[serde(default)]
    pub end_location: Option<Vec<f64>>,
    #[serde(default, deserialize_with = "or_default")]
    pub aerial_won: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub follows_dribble: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub first_time: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub open_goal: bool,
    #[serde(default)]
    pub statsbomb_xg: Option<f64>,
    #[serde(default, deserialize_with = "or_default")]
    pub deflected: bool,
    #[serde(default)]
    pub technique: Option<Named>,
    #[serde(default, alias = "bodypart")]
    pub body_part: Option<Named>,
    #[serde(default, rename = "type")]
    pub shot_type: Option<Named>,
    #[serde(default)]
    pub outcome: Option<Named>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PassDetail {
    #[serde(default)]
    pub recipient: Option<Named>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub angle: Option<f64>,
    #[serde(default)]
    pub height: Option<Named>,
    #[serde(default)]
    pub end_location: Option<Vec<f64>>,
    #[serde(default)]
    pub assisted_shot_id: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub backheel: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub deflected: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub miscommunication: bool,
    #[serde(default, deserialize_with = "or_default", rename = "cross", alias = "crossed")]
    pub crossed: bool,
    #[serde(default, deserialize_with = "or_default", rename = "cut_back", alias = "cutback")]
    pub cutback: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub switch: bool,
    #[serde(default, deserialize_with = "or_default", alias = "shot-assist")]
    pub shot_assist: bool,
    #[serde(default, deserialize_with = "or_default", alias = "goal-assist")]
    pub goal_assist: bool,
    #[serde(default, alias = "bodypart")]
    pub body_part: Option<Named>,
    #[serde(default, rename = "type")]
    pub pass_type: Option<Named>,
    #[serde(default)]
    pub outcome: Option<Named>,
    #[serde(default)]
    pub technique: Option<Named>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_event_deserializes() {
        let event: Event = serde_json::from_str(
            r#"{"id": "a1", "index": 1, "type": {"id": 42, "name": "Ball Receipt*"}}"#,
        )
        .unwrap();

        assert_eq!(event.type_label(), "Ball Receipt");
        assert!(event.location.is_none());
        assert!(!event.under_pressure);
        assert!(event.ball_receipt.is_none());
    }

    #[test]
    fn test_team_accepts_side_prefixed_keys() {
        let team: Team = serde_json::from_str(
            r#"{"away_team_id": 217, "away_team_name": "Barcelona", "managers": []}"#,
        )
        .unwrap();

        assert_eq!(team.team_id, Some(217));
        assert_eq!(team.team_name.as_deref(), Some("Barcelona"));
        assert!(team.manager().is_none());
    }

    #[test]
    fn test_null_flags_and_lists_default() {
        let event: Event = serde_json::from_str(
            r#"{"id": "a", "index": 1, "type": {"name": "Pass"}, "under_pressure": null,
                "pass": {"backheel": null, "cross": null, "length": null}}"#,
        )
        .unwrap();
        assert!(!event.under_pressure);
        assert!(!event.pass.unwrap().crossed);

        let lineup: Lineup =
            serde_json::from_str(r#"{"team_id": 217, "lineup": null}"#).unwrap();
        assert!(lineup.lineup.is_empty());

        let team: Team = serde_json::from_str(r#"{"home_team_id": 217, "managers": null}"#).unwrap();
        assert!(team.manager().is_none());
    }

    #[test]
    fn test_pass_flag_spellings() {
        let pass: PassDetail =
            serde_json::from_str(r#"{"cross": true, "cutback": true, "goal_assist": true}"#).unwrap();
        assert!(pass.crossed);
        assert!(pass.cutback);
        assert!(pass.goal_assist);
        assert!(!pass.switch);
    }
}
