//! Assistant session transcripts → one document per session file

use crate::{DocumentSink, RenderedDocument, RunReport, StateStore, SyncEngine, SyncError};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracekeep_core::{parse_session_file, SessionsConfig};
use tracekeep_render::{render_session, session_filename};
use tracing::{debug, info, warn};

/// All `*.jsonl` files below `dir`, sorted by path
pub fn discover_session_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_jsonl(dir, &mut files);
    files.sort();
    files
}

fn collect_jsonl(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            debug!("Cannot read {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_jsonl(&path, files);
        } else if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
            files.push(path);
        }
    }
}

/// Modified within `threshold` of now; such files may still be appended to
fn is_active(path: &Path, threshold: Duration, now: SystemTime) -> bool {
    let modified = match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    // A future mtime (clock skew) counts as age zero.
    now.duration_since(modified).unwrap_or(Duration::ZERO) < threshold
}

pub fn sync_sessions<S: DocumentSink>(config: &SessionsConfig, sink: S) -> Result<RunReport, SyncError> {
    let projects_dir = config.projects_dir();
    if !projects_dir.exists() {
        info!("Projects directory does not exist: {}", projects_dir.display());
        return Ok(RunReport::default());
    }

    let files = discover_session_files(&projects_dir);
    info!("Found {} session files", files.len());

    let threshold = Duration::from_secs(config.staleness_threshold_secs);
    let now = SystemTime::now();
    let mut engine = SyncEngine::open(StateStore::new(&config.state_file), sink);

    for path in &files {
        if is_active(path, threshold, now) {
            debug!("Skipping (still active): {}", path.display());
            continue;
        }

        let session = match parse_session_file(path) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                continue;
            }
        };
        if session.messages.is_empty() {
            debug!("Skipping (no messages): {}", path.display());
            continue;
        }

        engine.process_hashed(RenderedDocument {
            key: path.to_string_lossy().into_owned(),
            filename: session_filename(&session),
            content: render_session(&session),
        })?;
    }

    let report = engine.finish()?;
    info!("Session sync complete: {} written", report.written);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_session(projects: &Path, project_dir: &str, name: &str, prompt: &str) -> PathBuf {
        let dir = projects.join(project_dir);
        std::fs::create_dir_all(&dir).unwrap();
        let lines = [
            json!({"type": "user", "userType": "external", "sessionId": format!("{}-0000", name),
                   "timestamp": "2026-01-15T10:00:00Z", "message": {"content": prompt}}),
            json!({"type": "assistant", "message": {"model": "claude-sonnet",
                   "content": [{"type": "text", "text": "ok"}]}}),
        ];
        let body: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        let path = dir.join(format!("{}.jsonl", name));
        std::fs::write(&path, body.join("\n")).unwrap();
        path
    }

    fn config(root: &Path, staleness_threshold_secs: u64) -> SessionsConfig {
        SessionsConfig {
            claude_dir: root.join(".claude"),
            state_file: root.join("state.json"),
            staleness_threshold_secs,
        }
    }

    #[test]
    fn test_discover_recursive_sorted() {
        let temp = tempfile::TempDir::new().unwrap();
        write_session(temp.path(), "b", "two", "x");
        write_session(temp.path(), "a/nested", "one", "x");
        std::fs::write(temp.path().join("notes.txt"), "").unwrap();

        let files = discover_session_files(temp.path());
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a/nested/one.jsonl"));
        assert!(files[1].ends_with("b/two.jsonl"));
    }

    #[test]
    fn test_sync_then_idempotent() {
        let temp = tempfile::TempDir::new().unwrap();
        let cfg = config(temp.path(), 0);
        write_session(&cfg.projects_dir(), "-Users-me-work-demo", "abcdef12", "hello");

        let mut out: Vec<RenderedDocument> = Vec::new();
        let report = sync_sessions(&cfg, &mut out).unwrap();
        assert_eq!(report.written, 1);
        assert_eq!(out[0].filename, "CC-2026-01-15-demo-abcdef12.md");

        let report = sync_sessions(&cfg, &mut out).unwrap();
        assert_eq!(report.written, 0);
    }

    #[test]
    fn test_active_files_skipped() {
        let temp = tempfile::TempDir::new().unwrap();
        let cfg = config(temp.path(), 3600);
        write_session(&cfg.projects_dir(), "proj", "s1", "hello");

        let report = sync_sessions(&cfg, Vec::<RenderedDocument>::new()).unwrap();
        assert_eq!(report.written, 0);
    }

    #[test]
    fn test_empty_sessions_skipped() {
        let temp = tempfile::TempDir::new().unwrap();
        let cfg = config(temp.path(), 0);
        let dir = cfg.projects_dir().join("proj");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("empty.jsonl"), "{\"type\": \"progress\"}\n").unwrap();

        let report = sync_sessions(&cfg, Vec::<RenderedDocument>::new()).unwrap();
        assert_eq!(report.written, 0);
        assert_eq!(report.unchanged, 0);
    }

    #[test]
    fn test_missing_projects_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let report = sync_sessions(&config(temp.path(), 0), Vec::<RenderedDocument>::new()).unwrap();
        assert_eq!(report, RunReport::default());
    }
}
