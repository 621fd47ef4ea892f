use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Fixed on-disk layout of the dataset, rooted at its `data` directory
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn competitions(&self) -> PathBuf {
        self.root.join("competitions.json")
    }

    pub fn matches(&self, competition_id: i64, season_id: i64) -> PathBuf {
        self.root
            .join("matches")
            .join(competition_id.to_string())
            .join(format!("{}.json", season_id))
    }

    pub fn lineups(&self, match_id: i64) -> PathBuf {
        self.root.join("lineups").join(format!("{}.json", match_id))
    }

    pub fn events(&self, match_id: i64) -> PathBuf {
        self.root.join("events").join(format!("{}.json", match_id))
    }
}

/// Read and deserialize one JSON document. The file handle is dropped
/// before returning on every path.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open: {:?}", path))?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).with_context(|| format!("Failed to parse JSON: {:?}", path))
}
