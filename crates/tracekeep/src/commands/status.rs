use std::path::Path;
use tracekeep_core::Config;
use tracekeep_sync::StateStore;

fn source_status(state_file: &Path) -> serde_json::Value {
    let state = StateStore::new(state_file).load();
    serde_json::json!({
        "state_file": state_file.display().to_string(),
        "units": state.len(),
        "latest": state.keys().last(),
    })
}

fn build_status(config: &Config) -> serde_json::Value {
    serde_json::json!({
        "inbox": config.inbox.display().to_string(),
        "sessions": source_status(&config.sessions.state_file),
        "gemini": source_status(&config.gemini.state_file),
        "distill": source_status(&config.distill.state_file),
    })
}

pub fn run(config: &Config) -> anyhow::Result<()> {
    let output = build_status(config);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracekeep_core::{Fingerprint, SyncState};

    #[test]
    fn test_status_counts_units() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.distill.state_file = temp.path().join("distill.json");
        config.gemini.state_file = temp.path().join("gemini.json");
        config.sessions.state_file = temp.path().join("sessions.json");

        let mut state = SyncState::new();
        state.record_written("2026-02-10", Fingerprint::Count(2), None);
        state.record_written("2026-02-11", Fingerprint::Count(5), None);
        StateStore::new(&config.distill.state_file).save(&state).unwrap();

        let status = build_status(&config);
        assert_eq!(status["distill"]["units"], 2);
        assert_eq!(status["distill"]["latest"], "2026-02-11");
        assert_eq!(status["gemini"]["units"], 0);
        assert!(status["gemini"]["latest"].is_null());
    }
}
