use std::path::PathBuf;

use crate::filter::CompetitionFilter;

/// Settings for one ingestion run
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Root of the dataset (`competitions.json`, `matches/`, `lineups/`, `events/`)
    pub data_dir: PathBuf,
    pub output_db: PathBuf,
    /// Custom bootstrap script; the generated schema is used when absent
    pub schema_script: Option<PathBuf>,
    pub filter: CompetitionFilter,
    /// Export a snapshot right after loading
    pub snapshot: Option<PathBuf>,
}

/// When the scratch database is restored from the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProvisionMode {
    /// Fresh copy before every query, so no query sees another's side effects
    #[default]
    EveryQuery,
    Once,
}

/// Settings for one query/report run
#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub snapshot: PathBuf,
    pub scratch_db: PathBuf,
    pub output_dir: PathBuf,
    pub provision: ProvisionMode,
}

impl QueryConfig {
    pub fn new(snapshot: PathBuf, scratch_db: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            snapshot,
            scratch_db,
            output_dir,
            provision: ProvisionMode::default(),
        }
    }

    pub fn provision_once(mut self, once: bool) -> Self {
        self.provision = if once {
            ProvisionMode::Once
        } else {
            ProvisionMode::EveryQuery
        };
        self
    }
}
