use std::path::Path;
use tracekeep_core::Config;
use tracekeep_sync::{sync_sessions, DirectorySink};

pub fn run(config: &Config, inbox: Option<&Path>) -> anyhow::Result<()> {
    let inbox = inbox.unwrap_or(config.inbox.as_path());
    let report = sync_sessions(&config.sessions, DirectorySink::new(inbox))?;
    println!("Synced {} session(s) to {}", report.written, inbox.display());
    Ok(())
}
