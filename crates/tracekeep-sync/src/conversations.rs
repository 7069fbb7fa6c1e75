//! Export + crawl cache → one document per reconciled conversation

use crate::export::load_entries;
use crate::{DocumentSink, RenderedDocument, RunReport, StateStore, SyncEngine, SyncError};
use chrono::Duration;
use std::path::Path;
use tracekeep_core::{reconcile, ConversationIndex, GeminiConfig};
use tracekeep_render::{conversation_filename, render_conversation};
use tracing::{info, warn};

/// Missing cache → empty index; unreadable cache → empty index with a warning
pub fn load_conversation_index(path: &Path) -> ConversationIndex {
    match tracekeep_store::read_json::<ConversationIndex>(path) {
        Ok(Some(index)) => {
            info!(
                "Loaded crawl cache: {} conversations, {} prompts",
                index.conversations.len(),
                index.prompts.len()
            );
            index
        }
        Ok(None) => {
            info!("No crawl cache at {}, all entries will be time-grouped", path.display());
            ConversationIndex::default()
        }
        Err(e) => {
            warn!("Failed to load crawl cache {}: {}", path.display(), e);
            ConversationIndex::default()
        }
    }
}

pub fn sync_conversations<S: DocumentSink>(
    takeout: &Path,
    config: &GeminiConfig,
    sink: S,
) -> Result<RunReport, SyncError> {
    let entries = load_entries(takeout)?;
    if entries.is_empty() {
        warn!("No entries found in {}", takeout.display());
        return Ok(RunReport::default());
    }

    let index = load_conversation_index(&config.crawl_cache);
    let window = Duration::minutes(config.time_window_minutes);
    let (matched, unmatched) = reconcile(&entries, &index, window);

    let mut engine = SyncEngine::open(StateStore::new(&config.state_file), sink);
    for conversation in matched.iter().chain(unmatched.iter()) {
        engine.process_hashed(RenderedDocument {
            key: conversation.conversation_id.clone(),
            filename: conversation_filename(conversation),
            content: render_conversation(conversation),
        })?;
    }

    let report = engine.finish()?;
    info!(
        "Conversation sync complete: {} written ({} matched, {} unmatched groups)",
        report.written,
        matched.len(),
        unmatched.len()
    );
    Ok(report)
}
