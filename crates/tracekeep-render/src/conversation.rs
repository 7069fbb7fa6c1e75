use crate::html_to_markdown;
use tracekeep_core::{Conversation, Provenance};

pub fn render_conversation(conversation: &Conversation) -> String {
    let mut lines = vec![
        "---".to_string(),
        format!("created: {}", conversation.created_at()),
        "tags:".to_string(),
        "  - log/gemini".to_string(),
        "  - type/thought_trace".to_string(),
        "status: auto_generated".to_string(),
        format!("conversation_id: {}", conversation.conversation_id),
        "source: gemini_takeout".to_string(),
        format!("turns: {}", conversation.turn_count()),
        "---".to_string(),
        String::new(),
        format!(
            "# Gemini: {} ({})",
            conversation.title,
            conversation.created_date()
        ),
        String::new(),
    ];

    for entry in &conversation.entries {
        lines.push("## User".to_string());
        lines.push(entry.prompt_text.clone());
        lines.push(String::new());

        lines.push("## Gemini".to_string());
        if entry.response_html.is_empty() {
            lines.push("*No response*".to_string());
        } else {
            lines.push(html_to_markdown(&entry.response_html));
        }
        lines.push(String::new());

        if let Some(gem) = &entry.gem_name {
            lines.push(format!("> [!note] Used Gem: {}", gem));
            lines.push(String::new());
        }

        if !entry.attached_files.is_empty() {
            lines.push(format!(
                "> [!info] Attached files: {}",
                entry.attached_files.join(", ")
            ));
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

/// `GEM-<date>-<id8>.md`, or `GEM-<date>-unmatched-<NNNN>.md` for synthesized groups
pub fn conversation_filename(conversation: &Conversation) -> String {
    let date = conversation.created_date();
    match conversation.provenance {
        Provenance::Matched => {
            let short_id: String = conversation.conversation_id.chars().take(8).collect();
            format!("GEM-{}-{}.md", date, short_id)
        }
        Provenance::Synthesized => {
            let group = conversation
                .conversation_id
                .rsplit('-')
                .next()
                .unwrap_or_default();
            format!("GEM-{}-unmatched-{}.md", date, group)
        }
    }
}
