use crate::SyncError;
use std::path::{Path, PathBuf};
use tracekeep_core::SyncState;
use tracing::{debug, warn};

/// Location of one pipeline's state file
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable state starts the run from scratch
    pub fn load(&self) -> SyncState {
        match tracekeep_store::read_json::<SyncState>(&self.path) {
            Ok(Some(state)) => {
                debug!("Loaded {} state records from {}", state.len(), self.path.display());
                state
            }
            Ok(None) => SyncState::new(),
            Err(e) => {
                warn!("Failed to load state file {}: {}", self.path.display(), e);
                SyncState::new()
            }
        }
    }

    pub fn save(&self, state: &SyncState) -> Result<(), SyncError> {
        tracekeep_store::write_json(&self.path, state).map_err(|source| SyncError::State {
            path: self.path.clone(),
            source,
        })
    }
}
