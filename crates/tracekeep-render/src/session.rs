use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::OnceLock;
use tracekeep_core::time::parse_timestamp;
use tracekeep_core::{ContentBlock, Message, Role, Session};

static CODE_BLOCK_RE: OnceLock<Regex> = OnceLock::new();

const DETAIL_MAX_CHARS: usize = 60;

/// Replace fenced code with a one-line placeholder
fn abstract_code_blocks(text: &str) -> String {
    let re = CODE_BLOCK_RE.get_or_init(|| Regex::new(r"(?s)```(\w*)\n(.*?)```").unwrap());
    re.replace_all(text, |caps: &Captures| {
        let lang = match &caps[1] {
            "" => "text",
            lang => lang,
        };
        let body = &caps[2];
        let mut line_count = body.matches('\n').count();
        if !body.is_empty() && !body.ends_with('\n') {
            line_count += 1;
        }
        format!("[Code Block: {}, {} lines]", lang, line_count)
    })
    .into_owned()
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

fn input_str<'a>(input: &'a Value, key: &str) -> &'a str {
    input.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn tool_summary(name: &str, input: &Value) -> String {
    let detail = match name {
        "Read" | "Edit" | "Write" => {
            let path = match input_str(input, "file_path") {
                "" => "?",
                path => path,
            };
            format!("`{}`", path)
        }
        "Bash" => match input_str(input, "description") {
            "" => clip(input_str(input, "command"), DETAIL_MAX_CHARS),
            description => description.to_string(),
        },
        "Glob" | "Grep" => format!("`{}`", input_str(input, "pattern")),
        "Task" => input_str(input, "description").to_string(),
        "WebSearch" => input_str(input, "query").to_string(),
        "WebFetch" => input_str(input, "url").to_string(),
        _ => input
            .as_object()
            .and_then(|map| map.values().next())
            .map(|v| {
                let text = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                text.chars().take(DETAIL_MAX_CHARS).collect()
            })
            .unwrap_or_default(),
    };
    format!("> 🔧 Used **{}**: {}", name, detail)
}

fn render_message(lines: &mut Vec<String>, message: &Message) {
    match message.role {
        Role::User => lines.push("## 🧑 User".to_string()),
        Role::Assistant => lines.push("## 🤖 Assistant".to_string()),
    }
    lines.push(String::new());

    for block in &message.blocks {
        match block {
            ContentBlock::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                lines.push(abstract_code_blocks(text));
            }
            ContentBlock::Thinking(text) if message.role == Role::Assistant => {
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                lines.push("> [!thinking]- Thinking".to_string());
                lines.extend(text.lines().map(|line| format!("> {}", line)));
            }
            ContentBlock::ToolUse { name, input } if message.role == Role::Assistant => {
                lines.push(tool_summary(name, input));
            }
            _ => continue,
        }
        lines.push(String::new());
    }
}

/// Normalized `created` value; `unknown` when the session has no timestamp
fn created_timestamp(started_at: &str) -> String {
    if started_at.is_empty() {
        return "unknown".to_string();
    }
    match parse_timestamp(started_at) {
        Some(ts) => ts.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        None => started_at.to_string(),
    }
}

pub fn render_session(session: &Session) -> String {
    let created = created_timestamp(&session.started_at);

    let mut lines = vec![
        "---".to_string(),
        format!("created: {}", created),
        "tags:".to_string(),
        "  - log/claude".to_string(),
        "  - type/thought_trace".to_string(),
        "status: auto_generated".to_string(),
        format!("tokens: {}", session.total_tokens()),
        format!("model: {}", session.model),
        format!("project: {}", session.project),
    ];
    if !session.related_files.is_empty() {
        lines.push("related_files:".to_string());
        lines.extend(session.related_files.iter().map(|fp| format!("  - {}", fp)));
    }
    lines.push("---".to_string());
    lines.push(String::new());

    let date = if created.chars().count() >= 10 {
        created.chars().take(10).collect()
    } else {
        "unknown".to_string()
    };
    lines.push(format!("# Session: {} ({})", session.project, date));
    lines.push(String::new());

    for message in &session.messages {
        render_message(&mut lines, message);
    }

    lines.join("\n")
}

/// `CC-<date>-<project>-<session8>.md`
pub fn session_filename(session: &Session) -> String {
    let date = match session.started_at.get(..10) {
        Some(date) => date,
        None if session.started_at.is_empty() => "unknown",
        None => session.started_at.as_str(),
    };
    let project = if session.project.is_empty() {
        "unknown"
    } else {
        session.project.as_str()
    };
    let short_id: String = if session.session_id.is_empty() {
        "unknown".to_string()
    } else {
        session.session_id.chars().take(8).collect()
    };
    format!("CC-{}-{}-{}.md", date, project, short_id)
}
