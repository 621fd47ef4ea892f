//! Event subtype dispatch.
//!
//! Every event carries a type label. Recognized labels map to exactly one
//! subtype table with its own attribute set; anything else becomes
//! [`EventDetail::Unrecognized`] and produces no subtype row.

use super::record::{Point, Row, SqlValue};
use crate::schema::tables::*;
use crate::schema::TableSchema;
use crate::source::model::{name_of, Event};

#[derive(Debug, Clone, PartialEq)]
pub enum EventDetail {
    BadBehaviour {
        card: Option<String>,
    },
    BallReceipt {
        outcome: Option<String>,
    },
    Interception {
        outcome: Option<String>,
    },
    InjuryStoppage {
        in_chain: bool,
    },
    Miscontrol {
        aerial_won: bool,
    },
    PlayerOff {
        permanent: bool,
    },
    Carry {
        end_location: Option<Point>,
    },
    Pressure {
        counterpress: bool,
    },
    DribbledPast {
        counterpress: bool,
    },
    HalfStart {
        late_video_start: bool,
    },
    Clearance {
        aerial_won: bool,
        body_part: Option<String>,
    },
    Substitution {
        replacement: Option<String>,
        outcome: Option<String>,
    },
    FiftyFifty {
        outcome: Option<String>,
        counterpress: bool,
    },
    BallRecovery {
        offensive: bool,
        recovery_failure: bool,
    },
    FoulWon {
        defensive: bool,
        advantage: bool,
        penalty: bool,
    },
    Duel {
        counterpress: bool,
        duel_type: Option<String>,
        outcome: Option<String>,
    },
    HalfEnd {
        early_video_end: bool,
        match_suspended: bool,
    },
    Dribble {
        nutmeg: bool,
        outcome: Option<String>,
        no_touch: bool,
        overrun: bool,
    },
    Goalkeeper {
        position: Option<String>,
        technique: Option<String>,
        body_part: Option<String>,
        goalkeeper_type: Option<String>,
        outcome: Option<String>,
    },
    Block {
        deflection: bool,
        offensive: bool,
        save_block: bool,
        counterpress: bool,
    },
    FoulCommitted {
        counterpress: bool,
        offensive: bool,
        foul_type: Option<String>,
        advantage: bool,
        penalty: bool,
        card: Option<String>,
    },
    Shot(Box<ShotAttributes>),
    Pass(Box<PassAttributes>),
    /// Label with no subtype table; carries the label for reporting
    Unrecognized(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShotAttributes {
    pub key_pass_id: Option<String>,
    pub end_location: Option<Point>,
    pub aerial_won: bool,
    pub follows_dribble: bool,
    pub first_time: bool,
    pub open_goal: bool,
    pub expected_goals: Option<f64>,
    pub deflected: bool,
    pub technique: Option<String>,
    pub body_part: Option<String>,
    pub shot_type: Option<String>,
    pub outcome: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassAttributes {
    pub recipient: Option<String>,
    pub length: Option<f64>,
    pub angle: Option<f64>,
    pub height: Option<String>,
    pub end_location: Option<Point>,
    pub assisted_shot_id: Option<String>,
    pub backheel: bool,
    pub deflected: bool,
    pub miscommunication: bool,
    pub crossed: bool,
    pub cutback: bool,
    pub switch: bool,
    pub shot_assist: bool,
    pub goal_assist: bool,
    pub body_part: Option<String>,
    pub pass_type: Option<String>,
    pub outcome: Option<String>,
    pub technique: Option<String>,
}

fn point(coords: &Option<Vec<f64>>) -> Option<Point> {
    coords.as_deref().and_then(Point::from_coords)
}

impl EventDetail {
    /// Select the subtype for an event by its type label. Missing attribute
    /// objects fall back to defaults (NULL / false).
    pub fn from_event(event: &Event) -> Self {
        // counterpress is usually recorded on the event itself
        let counterpress = |nested: Option<bool>| nested.unwrap_or(event.counterpress);

        match event.type_label() {
            "Bad Behaviour" => {
                let attrs = event.bad_behaviour.clone().unwrap_or_default();
                EventDetail::BadBehaviour {
                    card: name_of(&attrs.card),
                }
            }
            "Ball Receipt" => {
                let attrs = event.ball_receipt.clone().unwrap_or_default();
                EventDetail::BallReceipt {
                    outcome: name_of(&attrs.outcome),
                }
            }
            "Interception" => {
                let attrs = event.interception.clone().unwrap_or_default();
                EventDetail::Interception {
                    outcome: name_of(&attrs.outcome),
                }
            }
            "Injury Stoppage" => EventDetail::InjuryStoppage {
                in_chain: event.injury_stoppage.as_ref().is_some_and(|a| a.in_chain),
            },
            "Miscontrol" => EventDetail::Miscontrol {
                aerial_won: event.miscontrol.as_ref().is_some_and(|a| a.aerial_won),
            },
            "Player Off" => EventDetail::PlayerOff {
                permanent: event.player_off.as_ref().is_some_and(|a| a.permanent),
            },
            "Carry" => EventDetail::Carry {
                end_location: event.carry.as_ref().and_then(|a| point(&a.end_location)),
            },
            "Pressure" => EventDetail::Pressure {
                counterpress: counterpress(event.pressure.as_ref().and_then(|a| a.counterpress)),
            },
            "Dribbled Past" => EventDetail::DribbledPast {
                counterpress: counterpress(
                    event.dribbled_past.as_ref().and_then(|a| a.counterpress),
                ),
            },
            "Half Start" => EventDetail::HalfStart {
                late_video_start: event.half_start.as_ref().is_some_and(|a| a.late_video_start),
            },
            "Clearance" => {
                let attrs = event.clearance.clone().unwrap_or_default();
                EventDetail::Clearance {
                    aerial_won: attrs.aerial_won,
                    body_part: name_of(&attrs.body_part),
                }
            }
            "Substitution" => {
                let attrs = event.substitution.clone().unwrap_or_default();
                EventDetail::Substitution {
                    replacement: name_of(&attrs.replacement),
                    outcome: name_of(&attrs.outcome),
                }
            }
            "50/50" => {
                let attrs = event.fifty_fifty.clone().unwrap_or_default();
                EventDetail::FiftyFifty {
                    outcome: name_of(&attrs.outcome),
                    counterpress: counterpress(attrs.counterpress),
                }
            }
            "Ball Recovery" => {
                let attrs = event.ball_recovery.clone().unwrap_or_default();
                EventDetail::BallRecovery {
                    offensive: attrs.offensive,
                    recovery_failure: attrs.recovery_failure,
                }
            }
            "Foul Won" => {
                let attrs = event.foul_won.clone().unwrap_or_default();
                EventDetail::FoulWon {
                    defensive: attrs.defensive,
                    advantage: attrs.advantage,
                    penalty: attrs.penalty,
                }
            }
            "Duel" => {
                let attrs = event.duel.clone().unwrap_or_default();
                EventDetail::Duel {
                    counterpress: counterpress(attrs.counterpress),
                    duel_type: name_of(&attrs.duel_type),
                    outcome: name_of(&attrs.outcome),
                }
            }
            "Half End" => {
                let attrs = event.half_end.clone().unwrap_or_default();
                EventDetail::HalfEnd {
                    early_video_end: attrs.early_video_end,
                    match_suspended: attrs.match_suspended,
                }
            }
            "Dribble" => {
                let attrs = event.dribble.clone().unwrap_or_default();
                EventDetail::Dribble {
                    nutmeg: attrs.nutmeg,
                    outcome: name_of(&attrs.outcome),
                    no_touch: attrs.no_touch,
                    overrun: attrs.overrun,
                }
            }
            "Goal Keeper" | "Goalkeeper" => {
                let attrs = event.goalkeeper.clone().unwrap_or_default();
                EventDetail::Goalkeeper {
                    position: name_of(&attrs.position),
                    technique: name_of(&attrs.technique),
                    body_part: name_of(&attrs.body_part),
                    goalkeeper_type: name_of(&attrs.goalkeeper_type),
                    outcome: name_of(&attrs.outcome),
                }
            }
            "Block" => {
                let attrs = event.block.clone().unwrap_or_default();
                EventDetail::Block {
                    deflection: attrs.deflection,
                    offensive: attrs.offensive,
                    save_block: attrs.save_block,
                    counterpress: counterpress(attrs.counterpress),
                }
            }
            "Foul Committed" => {
                let attrs = event.foul_committed.clone().unwrap_or_default();
                EventDetail::FoulCommitted {
                    counterpress: counterpress(attrs.counterpress),
                    offensive: attrs.offensive,
                    foul_type: name_of(&attrs.foul_type),
                    advantage: attrs.advantage,
                    penalty: attrs.penalty,
                    card: name_of(&attrs.card),
                }
            }
            "Shot" => {
                let attrs = event.shot.clone().unwrap_or_default();
                EventDetail::Shot(Box::new(ShotAttributes {
                    key_pass_id: attrs.key_pass_id,
                    end_location: point(&attrs.end_location),
                    aerial_won: attrs.aerial_won,
                    follows_dribble: attrs.follows_dribble,
                    first_time: attrs.first_time,
                    open_goal: attrs.open_goal,
                    expected_goals: attrs.statsbomb_xg,
                    deflected: attrs.deflected,
                    technique: name_of(&attrs.technique),
                    body_part: name_of(&attrs.body_part),
                    shot_type: name_of(&attrs.shot_type),
                    outcome: name_of(&attrs.outcome),
                }))
            }
            "Pass" => {
                let attrs = event.pass.clone().unwrap_or_default();
                EventDetail::Pass(Box::new(PassAttributes {
                    recipient: name_of(&attrs.recipient),
                    length: attrs.length,
                    angle: attrs.angle,
                    height: name_of(&attrs.height),
                    end_location: point(&attrs.end_location),
                    assisted_shot_id: attrs.assisted_shot_id,
                    backheel: attrs.backheel,
                    deflected: attrs.deflected,
                    miscommunication: attrs.miscommunication,
                    crossed: attrs.crossed,
                    cutback: attrs.cutback,
                    switch: attrs.switch,
                    shot_assist: attrs.shot_assist,
                    goal_assist: attrs.goal_assist,
                    body_part: name_of(&attrs.body_part),
                    pass_type: name_of(&attrs.pass_type),
                    outcome: name_of(&attrs.outcome),
                    technique: name_of(&attrs.technique),
                }))
            }
            other => EventDetail::Unrecognized(other.to_string()),
        }
    }

    /// Destination table, `None` for unrecognized labels
    pub fn table(&self) -> Option<&'static TableSchema> {
        let table = match self {
            EventDetail::BadBehaviour { .. } => &BAD_BEHAVIOUR,
            EventDetail::BallReceipt { .. } => &BALL_RECEIPT,
            EventDetail::Interception { .. } => &INTERCEPTION,
            EventDetail::InjuryStoppage { .. } => &INJURY_STOPPAGE,
            EventDetail::Miscontrol { .. } => &MISCONTROL,
            EventDetail::PlayerOff { .. } => &PLAYER_OFF,
            EventDetail::Carry { .. } => &CARRY,
            EventDetail::Pressure { .. } => &PRESSURE,
            EventDetail::DribbledPast { .. } => &DRIBBLED_PAST,
            EventDetail::HalfStart { .. } => &HALF_START,
            EventDetail::Clearance { .. } => &CLEARANCE,
            EventDetail::Substitution { .. } => &SUBSTITUTION,
            EventDetail::FiftyFifty { .. } => &FIFTY_FIFTY,
            EventDetail::BallRecovery { .. } => &BALL_RECOVERY,
            EventDetail::FoulWon { .. } => &FOUL_WON,
            EventDetail::Duel { .. } => &DUEL,
            EventDetail::HalfEnd { .. } => &HALF_END,
            EventDetail::Dribble { .. } => &DRIBBLE,
            EventDetail::Goalkeeper { .. } => &GOALKEEPER,
            EventDetail::Block { .. } => &BLOCK,
            EventDetail::FoulCommitted { .. } => &FOUL_COMMITTED,
            EventDetail::Shot(_) => &SHOT,
            EventDetail::Pass(_) => &PASS,
            EventDetail::Unrecognized(_) => return None,
        };
        Some(table)
    }

    /// Attribute values in subtype-table column order, without `event_id`
    fn values(&self) -> Vec<SqlValue> {
        match self.clone() {
            EventDetail::BadBehaviour { card } => vec![card.into()],
            EventDetail::BallReceipt { outcome } | EventDetail::Interception { outcome } => {
                vec![outcome.into()]
            }
            EventDetail::InjuryStoppage { in_chain } => vec![in_chain.into()],
            EventDetail::Miscontrol { aerial_won } => vec![aerial_won.into()],
            EventDetail::PlayerOff { permanent } => vec![permanent.into()],
            EventDetail::Carry { end_location } => vec![end_location.into()],
            EventDetail::Pressure { counterpress } | EventDetail::DribbledPast { counterpress } => {
                vec![counterpress.into()]
            }
            EventDetail::HalfStart { late_video_start } => vec![late_video_start.into()],
            EventDetail::Clearance {
                aerial_won,
                body_part,
            } => vec![aerial_won.into(), body_part.into()],
            EventDetail::Substitution {
                replacement,
                outcome,
            } => vec![replacement.into(), outcome.into()],
            EventDetail::FiftyFifty {
                outcome,
                counterpress,
            } => vec![outcome.into(), counterpress.into()],
            EventDetail::BallRecovery {
                offensive,
                recovery_failure,
            } => vec![offensive.into(), recovery_failure.into()],
            EventDetail::FoulWon {
                defensive,
                advantage,
                penalty,
            } => vec![defensive.into(), advantage.into(), penalty.into()],
            EventDetail::Duel {
                counterpress,
                duel_type,
                outcome,
            } => vec![counterpress.into(), duel_type.into(), outcome.into()],
            EventDetail::HalfEnd {
                early_video_end,
                match_suspended,
            } => vec![early_video_end.into(), match_suspended.into()],
            EventDetail::Dribble {
                nutmeg,
                outcome,
                no_touch,
                overrun,
            } => vec![
                nutmeg.into(),
                outcome.into(),
                no_touch.into(),
                overrun.into(),
            ],
            EventDetail::Goalkeeper {
                position,
                technique,
                body_part,
                goalkeeper_type,
                outcome,
            } => vec![
                position.into(),
                technique.into(),
                body_part.into(),
                goalkeeper_type.into(),
                outcome.into(),
            ],
            EventDetail::Block {
                deflection,
                offensive,
                save_block,
                counterpress,
            } => vec![
                deflection.into(),
                offensive.into(),
                save_block.into(),
                counterpress.into(),
            ],
            EventDetail::FoulCommitted {
                counterpress,
                offensive,
                foul_type,
                advantage,
                penalty,
                card,
            } => vec![
                counterpress.into(),
                offensive.into(),
                foul_type.into(),
                advantage.into(),
                penalty.into(),
                card.into(),
            ],
            EventDetail::Shot(shot) => {
                let shot = *shot;
                vec![
                    shot.key_pass_id.into(),
                    shot.end_location.into(),
                    shot.aerial_won.into(),
                    shot.follows_dribble.into(),
                    shot.first_time.into(),
                    shot.open_goal.into(),
                    shot.expected_goals.into(),
                    shot.deflected.into(),
                    shot.technique.into(),
                    shot.body_part.into(),
                    shot.shot_type.into(),
                    shot.outcome.into(),
                ]
            }
            EventDetail::Pass(pass) => {
                let pass = *pass;
                vec![
                    pass.recipient.into(),
                    pass.length.into(),
                    pass.angle.into(),
                    pass.height.into(),
                    pass.end_location.into(),
                    pass.assisted_shot_id.into(),
                    pass.backheel.into(),
                    pass.deflected.into(),
                    pass.miscommunication.into(),
                    pass.crossed.into(),
                    pass.cutback.into(),
                    pass.switch.into(),
                    pass.shot_assist.into(),
                    pass.goal_assist.into(),
                    pass.body_part.into(),
                    pass.pass_type.into(),
                    pass.outcome.into(),
                    pass.technique.into(),
                ]
            }
            EventDetail::Unrecognized(_) => Vec::new(),
        }
    }

    /// Zero or one subtype row for the event
    pub fn row(&self, event_id: &str) -> Option<(&'static TableSchema, Row)> {
        let table = self.table()?;
        let mut values = self.values();
        values.push(SqlValue::Text(event_id.to_string()));
        Some((table, Row::new(values)))
    }
}
