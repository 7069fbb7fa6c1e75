use std::path::Path;
use tracekeep_core::Config;
use tracekeep_sync::{sync_conversations, DirectorySink};

pub fn run(
    config: &Config,
    takeout: &Path,
    crawl_cache: Option<&Path>,
    inbox: Option<&Path>,
    window: Option<i64>,
) -> anyhow::Result<()> {
    let mut gemini = config.gemini.clone();
    if let Some(cache) = crawl_cache {
        gemini.crawl_cache = cache.to_path_buf();
    }
    if let Some(minutes) = window {
        anyhow::ensure!(minutes > 0, "--window must be positive, got {}", minutes);
        gemini.time_window_minutes = minutes;
    }

    let inbox = inbox.unwrap_or(config.inbox.as_path());
    let report = sync_conversations(takeout, &gemini, DirectorySink::new(inbox))?;
    println!("Synced {} conversation(s) to {}", report.written, inbox.display());
    Ok(())
}
