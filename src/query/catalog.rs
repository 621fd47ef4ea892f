//! The fixed set of analytical queries, in run order.

/// A read-only analytical query; results land in `Q_<number>.csv`
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticalQuery {
    pub number: u8,
    pub title: &'static str,
    pub sql: &'static str,
}

impl AnalyticalQuery {
    pub fn csv_name(&self) -> String {
        format!("Q_{}.csv", self.number)
    }
}

pub static QUERIES: &[AnalyticalQuery] = &[
    AnalyticalQuery {
        number: 1,
        title: "Average expected goals per player, La Liga 2020/2021",
        sql: "
            SELECT events.player_name, avg(shot.expected_goals) AS xg_score
            FROM matches
            JOIN competitions ON matches.competition_id = competitions.competition_id
                AND matches.season_id = competitions.season_id
            JOIN events ON matches.match_id = events.match_id
            JOIN shot ON events.event_id = shot.event_id
            WHERE competitions.competition_name = 'La Liga'
                AND competitions.season_name = '2020/2021'
            GROUP BY events.player_name
            ORDER BY xg_score DESC",
    },
    AnalyticalQuery {
        number: 2,
        title: "Shots per player, La Liga 2020/2021",
        sql: "
            SELECT events.player_name, count(*) AS shots
            FROM matches
            JOIN competitions ON matches.competition_id = competitions.competition_id
                AND matches.season_id = competitions.season_id
            JOIN events ON matches.match_id = events.match_id
            JOIN shot ON events.event_id = shot.event_id
            WHERE competitions.competition_name = 'La Liga'
                AND competitions.season_name = '2020/2021'
            GROUP BY events.player_name
            ORDER BY shots DESC",
    },
    AnalyticalQuery {
        number: 3,
        title: "First-time shots per player, La Liga 2018/2019 to 2020/2021",
        sql: "
            SELECT events.player_name, count(*) AS first_time_shots
            FROM matches
            JOIN competitions ON matches.competition_id = competitions.competition_id
                AND matches.season_id = competitions.season_id
            JOIN events ON matches.match_id = events.match_id
            JOIN shot ON events.event_id = shot.event_id
            WHERE competitions.competition_name = 'La Liga'
                AND competitions.season_name IN ('2020/2021', '2019/2020', '2018/2019')
                AND shot.first_time
            GROUP BY events.player_name
            ORDER BY first_time_shots DESC",
    },
    AnalyticalQuery {
        number: 4,
        title: "Passes per team, La Liga 2020/2021",
        sql: "
            SELECT events.team, count(*) AS passes
            FROM matches
            JOIN competitions ON matches.competition_id = competitions.competition_id
                AND matches.season_id = competitions.season_id
            JOIN events ON matches.match_id = events.match_id
            JOIN pass ON events.event_id = pass.event_id
            WHERE competitions.competition_name = 'La Liga'
                AND competitions.season_name = '2020/2021'
            GROUP BY events.team
            ORDER BY passes DESC",
    },
    AnalyticalQuery {
        number: 5,
        title: "Most frequent pass recipients after the top one, Premier League 2003/2004",
        sql: "
            SELECT pass.recipient, count(*) AS passes
            FROM matches
            JOIN competitions ON matches.competition_id = competitions.competition_id
                AND matches.season_id = competitions.season_id
            JOIN events ON matches.match_id = events.match_id
            JOIN pass ON events.event_id = pass.event_id
            WHERE competitions.competition_name = 'Premier League'
                AND competitions.season_name = '2003/2004'
            GROUP BY pass.recipient
            ORDER BY passes DESC
            LIMIT -1 OFFSET 1",
    },
    AnalyticalQuery {
        number: 6,
        title: "Shots per team, Premier League 2003/2004",
        sql: "
            SELECT events.team, count(*) AS shots
            FROM matches
            JOIN competitions ON matches.competition_id = competitions.competition_id
                AND matches.season_id = competitions.season_id
            JOIN events ON matches.match_id = events.match_id
            JOIN shot ON events.event_id = shot.event_id
            WHERE competitions.competition_name = 'Premier League'
                AND competitions.season_name = '2003/2004'
            GROUP BY events.team
            ORDER BY shots DESC",
    },
    AnalyticalQuery {
        number: 7,
        title: "Through balls per player, La Liga 2020/2021",
        sql: "
            SELECT events.player_name, count(*) AS through_balls
            FROM matches
            JOIN competitions ON matches.competition_id = competitions.competition_id
                AND matches.season_id = competitions.season_id
            JOIN events ON matches.match_id = events.match_id
            JOIN pass ON events.event_id = pass.event_id
            WHERE competitions.competition_name = 'La Liga'
                AND competitions.season_name = '2020/2021'
                AND pass.technique = 'Through Ball'
            GROUP BY events.player_name
            ORDER BY through_balls DESC",
    },
    AnalyticalQuery {
        number: 8,
        title: "Through balls per team, La Liga 2020/2021",
        sql: "
            SELECT events.team, count(*) AS through_balls
            FROM matches
            JOIN competitions ON matches.competition_id = competitions.competition_id
                AND matches.season_id = competitions.season_id
            JOIN events ON matches.match_id = events.match_id
            JOIN pass ON events.event_id = pass.event_id
            WHERE competitions.competition_name = 'La Liga'
                AND competitions.season_name = '2020/2021'
                AND pass.technique = 'Through Ball'
            GROUP BY events.team
            ORDER BY through_balls DESC",
    },
    AnalyticalQuery {
        number: 9,
        title: "Successful dribbles per player, La Liga 2018/2019 to 2020/2021",
        sql: "
            SELECT events.player_name, count(*) AS successful_dribbles
            FROM matches
            JOIN competitions ON matches.competition_id = competitions.competition_id
                AND matches.season_id = competitions.season_id
            JOIN events ON matches.match_id = events.match_id
            JOIN dribble ON events.event_id = dribble.event_id
            WHERE competitions.competition_name = 'La Liga'
                AND competitions.season_name IN ('2020/2021', '2019/2020', '2018/2019')
                AND dribble.outcome = 'Complete'
            GROUP BY events.player_name
            ORDER BY successful_dribbles DESC",
    },
    AnalyticalQuery {
        number: 10,
        title: "Times dribbled past per player, La Liga 2020/2021",
        sql: "
            SELECT events.player_name, count(*) AS dribbled_past
            FROM matches
            JOIN competitions ON matches.competition_id = competitions.competition_id
                AND matches.season_id = competitions.season_id
            JOIN events ON matches.match_id = events.match_id
            JOIN dribbled_past ON events.event_id = dribbled_past.event_id
            WHERE competitions.competition_name = 'La Liga'
                AND competitions.season_name = '2020/2021'
            GROUP BY events.player_name
            ORDER BY dribbled_past ASC",
    },
];

pub fn get_query(number: u8) -> Option<&'static AnalyticalQuery> {
    QUERIES.iter().find(|q| q.number == number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::Database;

    #[test]
    fn test_numbered_in_order() {
        let numbers: Vec<u8> = QUERIES.iter().map(|q| q.number).collect();
        assert_eq!(numbers, (1..=10).collect::<Vec<u8>>());
        assert_eq!(get_query(5).unwrap().csv_name(), "Q_5.csv");
        assert!(get_query(0).is_none());
    }

    #[test]
    fn test_queries_prepare_against_schema() {
        let db = Database::open_in_memory().unwrap();
        db.bootstrap(None).unwrap();

        for query in QUERIES {
            db.connection()
                .prepare(query.sql)
                .unwrap_or_else(|e| panic!("Q{} failed to prepare: {}", query.number, e));
        }
    }
}
