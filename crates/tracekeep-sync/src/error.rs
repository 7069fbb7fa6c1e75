use std::path::PathBuf;
use thiserror::Error;
use tracekeep_core::NormalizeError;
use tracekeep_distill::DistillError;

/// Run-terminating failures
///
/// Per-unit problems (a malformed session, one failed summary) are logged
/// and skipped instead of surfacing here.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to persist sync state to {path}: {source}")]
    State {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {filename}: {source}")]
    Output {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("distiller not ready: {0}")]
    NotReady(#[source] DistillError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}
