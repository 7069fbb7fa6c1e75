#![allow(dead_code)]

use serde_json::{json, Value};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use tracekeep_core::{DayCohort, Distillation, InteractionEntry};
use tracekeep_distill::{DistillError, Distiller};

pub fn entry(prompt: &str, timestamp: &str) -> InteractionEntry {
    InteractionEntry::new(prompt, timestamp)
}

/// Export records, newest first like a real Takeout dump
pub fn sample_export() -> Value {
    json!([
        {"title": "Prompted What should I read next?", "time": "2026-02-11T21:00:00Z",
         "subtitles": [{"name": "Librarian was used in this chat."}]},
        {"title": "Prompted And the borrow checker?", "time": "2026-02-11T09:10:00Z",
         "safeHtmlItem": [{"html": "<p>It enforces <code>&amp;mut</code> exclusivity.</p>"}]},
        {"title": "Prompted Explain ownership in Rust", "time": "2026-02-11T09:00:00Z",
         "safeHtmlItem": [{"html": "<p>Each value has one owner.</p>"}]},
        {"title": "Visited https://example.com", "time": "2026-02-10T12:00:00Z"},
        {"title": "Prompted Plan a garden", "time": "2026-02-10T08:00:00Z",
         "subtitles": [{"name": "-  layout.png"}]}
    ])
}

pub fn write_export(dir: &Path, records: &Value) -> PathBuf {
    let path = dir.join("My Activity.json");
    std::fs::write(&path, records.to_string()).unwrap();
    path
}

pub fn write_session(projects_dir: &Path, project: &str, session_id: &str) -> PathBuf {
    let dir = projects_dir.join(project);
    std::fs::create_dir_all(&dir).unwrap();
    let lines = [
        json!({"type": "user", "userType": "external", "sessionId": session_id,
               "timestamp": "2026-02-11T10:00:00Z", "message": {"content": "Add a status command"}}),
        json!({"type": "assistant", "message": {"model": "claude-sonnet",
               "usage": {"input_tokens": 40, "output_tokens": 12},
               "content": [
                   {"type": "tool_use", "name": "Edit", "input": {"file_path": "/repo/src/cli.rs"}},
                   {"type": "text", "text": "Added."}
               ]}}),
    ];
    let body: Vec<String> = lines.iter().map(Value::to_string).collect();
    let path = dir.join(format!("{}.jsonl", session_id));
    std::fs::write(&path, body.join("\n")).unwrap();
    path
}

/// Offline distiller: core topics are the day's prompts
#[derive(Default)]
pub struct EchoDistiller {
    pub calls: Cell<usize>,
}

impl Distiller for EchoDistiller {
    fn model(&self) -> &str {
        "echo"
    }

    fn check_ready(&self) -> Result<(), DistillError> {
        Ok(())
    }

    fn distill(&self, cohort: &DayCohort) -> Result<Distillation, DistillError> {
        self.calls.set(self.calls.get() + 1);
        Ok(Distillation {
            core_topics: cohort.prompts.clone(),
            ..Distillation::empty(&cohort.date, "echo", cohort.prompt_count)
        })
    }
}

pub fn markdown_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|n| n.ends_with(".md"))
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
