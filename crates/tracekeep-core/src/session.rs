//! Claude Code session transcripts (`<session>.jsonl`)
//!
//! Only externally typed user turns and assistant turns are kept. Streaming
//! sends several assistant lines per turn; consecutive ones are merged.

use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

const FILE_TOOLS: &[&str] = &["Read", "Edit", "Write", "Glob", "Grep"];

#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    Thinking(String),
    ToolUse { name: String, input: Value },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub blocks: Vec<ContentBlock>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub session_id: String,
    pub project: String,
    pub model: String,
    pub started_at: String,
    pub messages: Vec<Message>,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    /// Sorted, distinct file paths touched by file tools
    pub related_files: Vec<String>,
}

impl Session {
    pub fn total_tokens(&self) -> u64 {
        self.total_input_tokens + self.total_output_tokens
    }
}

/// Short project name from the transcript's parent directory
///
/// `~/.claude/projects/-Users-me-src-tracekeep/abc.jsonl` → `tracekeep`
pub fn project_name_from_path(path: &Path) -> String {
    let parent = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("");

    parent
        .split('-')
        .filter(|part| !part.is_empty() && !part.eq_ignore_ascii_case("users"))
        .last()
        .unwrap_or(parent)
        .to_string()
}

pub fn parse_session_file(path: &Path) -> std::io::Result<Session> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_session_str(&content, &project_name_from_path(path)))
}

pub fn parse_session_str(content: &str, project: &str) -> Session {
    let mut session = Session {
        project: project.to_string(),
        ..Default::default()
    };
    let mut seen_files = BTreeSet::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let record = match serde_json::from_str::<Value>(line) {
            Ok(r) => r,
            Err(_) => continue,
        };

        match record.get("type").and_then(|t| t.as_str()) {
            Some("user") => absorb_user(&mut session, &record),
            Some("assistant") => absorb_assistant(&mut session, &record, &mut seen_files),
            _ => {}
        }
    }

    session.related_files = seen_files.into_iter().collect();
    session
}

fn str_field<'a>(record: &'a Value, key: &str) -> &'a str {
    record.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn absorb_user(session: &mut Session, record: &Value) {
    if str_field(record, "userType") != "external" {
        return;
    }

    if session.session_id.is_empty() {
        session.session_id = str_field(record, "sessionId").to_string();
    }
    let timestamp = str_field(record, "timestamp");
    if session.started_at.is_empty() {
        session.started_at = timestamp.to_string();
    }

    let blocks = match record.pointer("/message/content") {
        Some(Value::String(s)) => vec![ContentBlock::Text(s.clone())],
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| item.get("type").and_then(|t| t.as_str()) == Some("text"))
            .map(|item| ContentBlock::Text(str_field(item, "text").to_string()))
            .collect(),
        _ => Vec::new(),
    };

    if !blocks.is_empty() {
        session.messages.push(Message {
            role: Role::User,
            blocks,
            timestamp: timestamp.to_string(),
        });
    }
}

fn absorb_assistant(session: &mut Session, record: &Value, seen_files: &mut BTreeSet<String>) {
    let Some(message) = record.get("message") else {
        return;
    };

    let model = str_field(message, "model");
    if !model.is_empty() && session.model.is_empty() {
        session.model = model.to_string();
    }

    if let Some(usage) = message.get("usage") {
        session.total_input_tokens += usage.get("input_tokens").and_then(|v| v.as_u64()).unwrap_or(0);
        session.total_output_tokens += usage.get("output_tokens").and_then(|v| v.as_u64()).unwrap_or(0);
    }

    let mut blocks = Vec::new();
    for item in message.get("content").and_then(|c| c.as_array()).into_iter().flatten() {
        match str_field(item, "type") {
            "text" => blocks.push(ContentBlock::Text(str_field(item, "text").to_string())),
            "thinking" => blocks.push(ContentBlock::Thinking(str_field(item, "thinking").to_string())),
            "tool_use" => {
                let name = str_field(item, "name").to_string();
                let input = item.get("input").cloned().unwrap_or(Value::Null);
                if FILE_TOOLS.contains(&name.as_str()) {
                    let fp = str_field(&input, "file_path");
                    if !fp.is_empty() {
                        seen_files.insert(fp.to_string());
                    }
                }
                blocks.push(ContentBlock::ToolUse { name, input });
            }
            _ => {}
        }
    }
    if blocks.is_empty() {
        return;
    }

    match session.messages.last_mut() {
        Some(last) if last.role == Role::Assistant => last.blocks.extend(blocks),
        _ => session.messages.push(Message {
            role: Role::Assistant,
            blocks,
            timestamp: str_field(record, "timestamp").to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jsonl(lines: &[Value]) -> String {
        lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_project_name_from_path() {
        let path = Path::new("/home/me/.claude/projects/-Users-me-src-tracekeep/abc.jsonl");
        assert_eq!(project_name_from_path(path), "tracekeep");
    }

    #[test]
    fn test_parse_user_and_merged_assistant() {
        let content = jsonl(&[
            json!({"type": "user", "userType": "external", "sessionId": "abcd1234-ef",
                   "timestamp": "2026-01-15T10:00:00Z",
                   "message": {"content": "fix the router"}}),
            json!({"type": "assistant", "message": {"model": "claude-sonnet",
                   "usage": {"input_tokens": 10, "output_tokens": 5},
                   "content": [{"type": "thinking", "thinking": "look at router"}]}}),
            json!({"type": "assistant", "message": {
                   "usage": {"input_tokens": 3, "output_tokens": 2},
                   "content": [
                       {"type": "tool_use", "name": "Read", "input": {"file_path": "/src/router.rs"}},
                       {"type": "text", "text": "Done."}
                   ]}}),
            json!({"type": "progress"}),
        ]);

        let session = parse_session_str(&content, "proj");
        assert_eq!(session.session_id, "abcd1234-ef");
        assert_eq!(session.started_at, "2026-01-15T10:00:00Z");
        assert_eq!(session.model, "claude-sonnet");
        assert_eq!(session.total_tokens(), 20);
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[1].role, Role::Assistant);
        assert_eq!(session.messages[1].blocks.len(), 3);
        assert_eq!(session.related_files, vec!["/src/router.rs"]);
    }

    #[test]
    fn test_internal_user_turns_ignored() {
        let content = jsonl(&[
            json!({"type": "user", "userType": "internal", "message": {"content": "tool result"}}),
            json!({"type": "user", "userType": "external",
                   "message": {"content": [{"type": "text", "text": "hello"},
                                           {"type": "tool_result", "content": "x"}]}}),
        ]);
        let session = parse_session_str(&content, "p");
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].blocks, vec![ContentBlock::Text("hello".to_string())]);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let content = "not json\n\n{\"type\": \"user\", \"userType\": \"external\", \"message\": {\"content\": \"ok\"}}";
        let session = parse_session_str(content, "p");
        assert_eq!(session.messages.len(), 1);
    }

    #[test]
    fn test_parse_session_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("-Users-me-work-demo");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("s.jsonl");
        std::fs::write(&path, "").unwrap();

        let session = parse_session_file(&path).unwrap();
        assert_eq!(session.project, "demo");
        assert!(session.messages.is_empty());
    }
}
