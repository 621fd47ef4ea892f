use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{LoadConfig, QueryConfig};
use crate::filter::CompetitionFilter;

#[derive(Parser, Debug)]
#[command(name = "football-events-sqlite")]
#[command(version, about = "Load open football event data into SQLite and run analytical queries")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the schema and load competitions, matches, lineups and events
    Load {
        /// Output SQLite database path (replaced if it exists)
        output_db: PathBuf,

        /// Dataset root containing competitions.json
        #[arg(short, long, env = "FOOTBALL_DATA_DIR", default_value = "open-data/data")]
        data_dir: PathBuf,

        /// SQL script to create the tables instead of the built-in schema
        #[arg(long)]
        schema_script: Option<PathBuf>,

        /// Competition names whose matches are loaded (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        competition: Option<Vec<String>>,

        /// Season names whose matches are loaded (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        season: Option<Vec<String>>,

        /// Also export a snapshot after loading
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Read every source document the load would touch, without writing
    Check {
        #[arg(short, long, env = "FOOTBALL_DATA_DIR", default_value = "open-data/data")]
        data_dir: PathBuf,

        #[arg(short, long, value_delimiter = ',')]
        competition: Option<Vec<String>>,

        #[arg(short, long, value_delimiter = ',')]
        season: Option<Vec<String>>,
    },

    /// Export a loaded database to a snapshot file
    Snapshot {
        /// Loaded SQLite database
        db: PathBuf,

        /// Snapshot file to write
        out: PathBuf,
    },

    /// Run the analytical queries against a copy provisioned from a snapshot
    Query {
        /// Snapshot to provision from
        #[arg(long)]
        snapshot: PathBuf,

        /// Disposable database the snapshot is restored into
        #[arg(long, default_value = "query_scratch.db")]
        scratch_db: PathBuf,

        /// Directory for the Q_<n>.csv files
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Provision once per run instead of before every query
        #[arg(long)]
        provision_once: bool,

        /// Only run these query numbers (comma-separated)
        #[arg(long, value_delimiter = ',')]
        only: Option<Vec<u8>>,

        /// Skip these query numbers (comma-separated)
        #[arg(long, value_delimiter = ',')]
        skip: Option<Vec<u8>>,
    },

    /// Print the bootstrap SQL script
    Schema {
        /// Only these tables plus the tables they reference (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        include: Option<Vec<String>>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List all destination tables in dependency order
    ListTables,

    /// List the analytical queries
    ListQueries,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

impl Commands {
    /// Load settings, when this is the `load` command
    pub fn load_config(&self) -> Option<LoadConfig> {
        match self {
            Commands::Load {
                output_db,
                data_dir,
                schema_script,
                competition,
                season,
                snapshot,
            } => Some(LoadConfig {
                data_dir: data_dir.clone(),
                output_db: output_db.clone(),
                schema_script: schema_script.clone(),
                filter: CompetitionFilter::with_overrides(competition.clone(), season.clone()),
                snapshot: snapshot.clone(),
            }),
            _ => None,
        }
    }

    /// Query settings, when this is the `query` command
    pub fn query_config(&self) -> Option<QueryConfig> {
        match self {
            Commands::Query {
                snapshot,
                scratch_db,
                out_dir,
                provision_once,
                ..
            } => Some(
                QueryConfig::new(snapshot.clone(), scratch_db.clone(), out_dir.clone())
                    .provision_once(*provision_once),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvisionMode;

    #[test]
    fn test_load_overrides_whitelist() {
        let cli = Cli::parse_from([
            "football-events-sqlite",
            "load",
            "out.db",
            "--data-dir",
            "data",
            "--competition",
            "FIFA World Cup",
            "--season",
            "2018,2022",
        ]);
        let config = cli.command.load_config().unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.filter.competitions, vec!["FIFA World Cup"]);
        assert_eq!(config.filter.seasons, vec!["2018", "2022"]);
        assert!(config.snapshot.is_none());
    }

    #[test]
    fn test_query_defaults() {
        let cli = Cli::parse_from([
            "football-events-sqlite",
            "query",
            "--snapshot",
            "dump.db",
            "--only",
            "1,5",
        ]);
        let config = cli.command.query_config().unwrap();
        assert_eq!(config.provision, ProvisionMode::EveryQuery);
        assert_eq!(config.scratch_db, PathBuf::from("query_scratch.db"));
        match cli.command {
            Commands::Query { only, skip, .. } => {
                assert_eq!(only, Some(vec![1, 5]));
                assert!(skip.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
