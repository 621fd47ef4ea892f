use crate::query::{get_query, AnalyticalQuery, QUERIES};
use crate::source::model::Competition;
use anyhow::{bail, Result};
use tracing::info;

pub const DEFAULT_COMPETITIONS: &[&str] = &["La Liga", "Premier League"];
pub const DEFAULT_SEASONS: &[&str] = &["2020/2021", "2019/2020", "2018/2019", "2003/2004"];

/// Whitelist deciding which (competition, season) pairs have their matches
/// loaded. A record must match both a competition name and a season name.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitionFilter {
    pub competitions: Vec<String>,
    pub seasons: Vec<String>,
}

impl CompetitionFilter {
    /// Default whitelist, with either list replaced when given
    pub fn with_overrides(competitions: Option<Vec<String>>, seasons: Option<Vec<String>>) -> Self {
        let owned = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
        Self {
            competitions: competitions.unwrap_or_else(|| owned(DEFAULT_COMPETITIONS)),
            seasons: seasons.unwrap_or_else(|| owned(DEFAULT_SEASONS)),
        }
    }

    pub fn accepts(&self, competition: &Competition) -> bool {
        let listed = |list: &[String], value: &Option<String>| {
            value
                .as_deref()
                .is_some_and(|v| list.iter().any(|item| item == v))
        };
        listed(&self.competitions, &competition.competition_name)
            && listed(&self.seasons, &competition.season_name)
    }
}

impl Default for CompetitionFilter {
    fn default() -> Self {
        Self::with_overrides(None, None)
    }
}

/// Resolves which analytical queries to run based on include/exclude filters
pub fn resolve_queries(
    include: Option<Vec<u8>>,
    exclude: Option<Vec<u8>>,
) -> Result<Vec<&'static AnalyticalQuery>> {
    let validate = |numbers: &[u8]| -> Result<()> {
        for number in numbers {
            if get_query(*number).is_none() {
                bail!("Unknown query: {}", number);
            }
        }
        Ok(())
    };

    match (include, exclude) {
        (Some(_), Some(_)) => {
            bail!("Cannot use both --only and --skip at the same time");
        }
        (Some(include_list), None) => {
            validate(&include_list)?;
            let queries: Vec<_> = QUERIES
                .iter()
                .filter(|q| include_list.contains(&q.number))
                .collect();
            info!(count = queries.len(), "running selected queries");
            Ok(queries)
        }
        (None, Some(exclude_list)) => {
            validate(&exclude_list)?;
            let queries: Vec<_> = QUERIES
                .iter()
                .filter(|q| !exclude_list.contains(&q.number))
                .collect();
            info!(count = queries.len(), "running queries after exclusions");
            Ok(queries)
        }
        (None, None) => Ok(QUERIES.iter().collect()),
    }
}
