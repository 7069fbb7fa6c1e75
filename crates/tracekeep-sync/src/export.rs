//! Export loading shared by the conversation and summary pipelines

use std::path::Path;
use tracekeep_core::{load_export, InteractionEntry, NormalizeError};
use tracing::warn;

/// Unparseable export → zero entries; an unreadable file is still an error
pub(crate) fn load_entries(takeout: &Path) -> Result<Vec<InteractionEntry>, NormalizeError> {
    match load_export(takeout) {
        Err(NormalizeError::Json(e)) => {
            warn!("Ignoring export {}: {}", takeout.display(), e);
            Ok(Vec::new())
        }
        other => other,
    }
}
