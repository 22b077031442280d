use crate::record::{BestSellerRecord, RecordList};
use crate::state::{CrawlCursor, CrawlState};
use crate::storage::traits::{StateError, StateResult, StateStore};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// On-disk shape of the harvest state
///
/// Cursors are bookkeeping and live under underscore-prefixed keys next to
/// the public collections. An absent cursor key means the resource was never
/// crawled; an empty string means it was crawled to exhaustion. Fields are
/// declared in key order so the file is stable across saves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(
        rename = "_audio_best_sellers_cursor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub audio_cursor: Option<String>,

    #[serde(
        rename = "_number_ones_cursor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub number_ones_cursor: Option<String>,

    #[serde(default)]
    pub audio_best_sellers: Vec<BestSellerRecord>,

    #[serde(default)]
    pub number_ones: Vec<BestSellerRecord>,

    #[serde(default)]
    pub reading_list: Vec<BestSellerRecord>,
}

impl From<&CrawlState> for PersistedState {
    fn from(state: &CrawlState) -> Self {
        Self {
            audio_cursor: state.audio_cursor.to_persisted(),
            number_ones_cursor: state.number_ones_cursor.to_persisted(),
            audio_best_sellers: state.audio_best_sellers.as_slice().to_vec(),
            number_ones: state.number_ones.as_slice().to_vec(),
            reading_list: state.reading_list.clone(),
        }
    }
}

impl From<PersistedState> for CrawlState {
    fn from(persisted: PersistedState) -> Self {
        Self {
            number_ones: RecordList::from_records(persisted.number_ones),
            audio_best_sellers: RecordList::from_records(persisted.audio_best_sellers),
            reading_list: persisted.reading_list,
            number_ones_cursor: CrawlCursor::from_persisted(persisted.number_ones_cursor),
            audio_cursor: CrawlCursor::from_persisted(persisted.audio_cursor),
        }
    }
}

/// State store backed by a single pretty-printed JSON file
///
/// Every save writes a temporary file next to the target and renames it into
/// place, so a crash mid-save leaves the previous checkpoint intact.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> StateResult<CrawlState> {
        if !self.path.exists() {
            tracing::info!(
                "No state file at {}, starting with empty state",
                self.path.display()
            );
            return Ok(CrawlState::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let persisted: PersistedState = serde_json::from_str(&content)?;
        tracing::info!(
            "Loaded state from {}: {} number ones, {} audio best sellers",
            self.path.display(),
            persisted.number_ones.len(),
            persisted.audio_best_sellers.len()
        );
        Ok(persisted.into())
    }

    fn save(&mut self, state: &CrawlState) -> StateResult<()> {
        let content = serde_json::to_string_pretty(&PersistedState::from(state))?;

        let dir = self.parent_dir();
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StateError::Persist {
            path: self.path.display().to_string(),
            source: e.error,
        })?;

        tracing::trace!("Checkpointed state to {}", self.path.display());
        Ok(())
    }
}
