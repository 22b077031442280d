use crate::state::CrawlState;
use crate::storage::traits::{StateResult, StateStore};

/// In-memory state store
///
/// Keeps every snapshot it is handed, so callers can inspect exactly which
/// checkpoints a run produced.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    initial: CrawlState,
    snapshots: Vec<CrawlState>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose first load returns the given state
    pub fn with_state(initial: CrawlState) -> Self {
        Self {
            initial,
            snapshots: Vec::new(),
        }
    }

    /// Every state saved so far, oldest first
    pub fn snapshots(&self) -> &[CrawlState] {
        &self.snapshots
    }

    pub fn save_count(&self) -> usize {
        self.snapshots.len()
    }

    /// The most recently saved state
    pub fn latest(&self) -> Option<&CrawlState> {
        self.snapshots.last()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> StateResult<CrawlState> {
        Ok(self.latest().unwrap_or(&self.initial).clone())
    }

    fn save(&mut self, state: &CrawlState) -> StateResult<()> {
        self.snapshots.push(state.clone());
        Ok(())
    }
}
