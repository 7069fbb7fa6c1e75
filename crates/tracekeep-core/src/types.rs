//! Entry, cohort and conversation types

use crate::time::{date_prefix, parse_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One prompt/response pair extracted from an activity export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEntry {
    pub prompt_text: String,
    /// First response payload, raw HTML
    pub response_html: String,
    /// ISO-8601 as found in the export; may be empty or malformed
    pub timestamp: String,
    /// Named sub-agent ("gem") the prompt was issued to
    #[serde(default)]
    pub gem_name: Option<String>,
    #[serde(default)]
    pub attached_files: Vec<String>,
    #[serde(default)]
    pub regenerated_responses: Vec<String>,
}

impl InteractionEntry {
    pub fn new(prompt_text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            response_html: String::new(),
            timestamp: timestamp.into(),
            gem_name: None,
            attached_files: Vec::new(),
            regenerated_responses: Vec::new(),
        }
    }

    pub fn parsed_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }

    pub fn date(&self) -> Option<&str> {
        date_prefix(&self.timestamp)
    }
}

/// All entries of one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCohort {
    /// `YYYY-MM-DD`
    pub date: String,
    pub prompts: Vec<String>,
    pub prompt_count: usize,
    /// Sorted, distinct
    pub gem_names: Vec<String>,
}

/// A prompt seen by the crawler, with its conversation context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedPrompt {
    pub conversation_id: String,
    #[serde(default)]
    pub conversation_title: String,
    /// First ~100 characters of the prompt
    #[serde(default)]
    pub text_preview: String,
    #[serde(default)]
    pub order_in_conversation: u32,
}

/// Externally crawled conversation structure (the crawl cache)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationIndex {
    /// conversation id -> title
    #[serde(default)]
    pub conversations: HashMap<String, String>,
    #[serde(default)]
    pub prompts: Vec<IndexedPrompt>,
}

impl ConversationIndex {
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub fn title_of(&self, conversation_id: &str) -> Option<&str> {
        self.conversations.get(conversation_id).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Id and title come from the conversation index
    Matched,
    /// Grouped by temporal proximity; id encodes date and group number
    Synthesized,
}

/// A reconciled group of entries believed to form one dialogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: String,
    pub title: String,
    pub provenance: Provenance,
    pub entries: Vec<InteractionEntry>,
}

impl Conversation {
    /// Timestamp of the first entry, empty when there are none
    pub fn created_at(&self) -> &str {
        self.entries
            .first()
            .map(|e| e.timestamp.as_str())
            .unwrap_or("")
    }

    /// `YYYY-MM-DD` of the first entry, or `unknown`
    pub fn created_date(&self) -> &str {
        let created = self.created_at();
        if created.is_empty() {
            return "unknown";
        }
        created.get(..10).unwrap_or(created)
    }

    pub fn turn_count(&self) -> usize {
        self.entries.len()
    }
}
