//! Reconcile export entries with crawled conversation structure
//!
//! Entries are first matched to known conversations by text prefix; whatever
//! is left is clustered into synthesized conversations by time proximity.

use crate::types::{Conversation, ConversationIndex, InteractionEntry, Provenance};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::info;

/// Maximum gap between prompts of the same synthesized conversation
pub const DEFAULT_TIME_WINDOW_MINUTES: i64 = 30;

/// Title used when the index has no title for a matched id
pub const UNTITLED: &str = "Untitled";

const TITLE_MAX_CHARS: usize = 50;

fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Ordered preview → conversation id lookup
///
/// Previews are tested longest first so that when several previews are
/// prefixes of one another the most specific wins; equal lengths keep index
/// order. A preview repeated in the index maps to its last conversation id.
#[derive(Debug, Clone, Default)]
pub struct PreviewLookup {
    previews: Vec<(String, String)>,
}

impl PreviewLookup {
    pub fn from_index(index: &ConversationIndex) -> Self {
        let mut previews: Vec<(String, String)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for prompt in &index.prompts {
            let key = normalize_text(&prompt.text_preview);
            if key.is_empty() {
                continue;
            }
            match positions.get(&key) {
                Some(&pos) => previews[pos].1 = prompt.conversation_id.clone(),
                None => {
                    positions.insert(key.clone(), previews.len());
                    previews.push((key, prompt.conversation_id.clone()));
                }
            }
        }

        previews.sort_by_key(|(key, _)| std::cmp::Reverse(key.chars().count()));
        Self { previews }
    }

    pub fn len(&self) -> usize {
        self.previews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previews.is_empty()
    }

    /// Conversation id whose preview is a prefix of `text` or vice versa
    pub fn find(&self, text: &str) -> Option<&str> {
        let text = normalize_text(text);
        if text.is_empty() {
            return None;
        }

        self.previews
            .iter()
            .find(|(preview, _)| text.starts_with(preview.as_str()) || preview.starts_with(&text))
            .map(|(_, id)| id.as_str())
    }
}

/// Split entries into (matched, synthesized) conversations
pub fn reconcile(
    entries: &[InteractionEntry],
    index: &ConversationIndex,
    window: Duration,
) -> (Vec<Conversation>, Vec<Conversation>) {
    if entries.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let lookup = PreviewLookup::from_index(index);

    let mut matched: Vec<Conversation> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut unmatched_entries: Vec<InteractionEntry> = Vec::new();

    for entry in entries {
        let Some(conv_id) = lookup.find(&entry.prompt_text) else {
            unmatched_entries.push(entry.clone());
            continue;
        };

        let slot = *slots.entry(conv_id.to_string()).or_insert_with(|| {
            matched.push(Conversation {
                conversation_id: conv_id.to_string(),
                title: index.title_of(conv_id).unwrap_or(UNTITLED).to_string(),
                provenance: Provenance::Matched,
                entries: Vec::new(),
            });
            matched.len() - 1
        });
        matched[slot].entries.push(entry.clone());
    }

    let unmatched_count = unmatched_entries.len();
    let unmatched = group_by_time(unmatched_entries, window);

    info!(
        "Matched {} conversations ({} entries), {} unmatched groups ({} entries)",
        matched.len(),
        entries.len() - unmatched_count,
        unmatched.len(),
        unmatched_count
    );

    (matched, unmatched)
}

/// Greedy time-proximity clustering
///
/// Entries are ordered by instant, unparseable ones first. Consecutive
/// entries at most `window` apart share a group. An entry with an
/// unparseable timestamp always opens a new group and clears the last-seen
/// time, so the next entry joins that group regardless of its time.
fn group_by_time(mut entries: Vec<InteractionEntry>, window: Duration) -> Vec<Conversation> {
    if entries.is_empty() {
        return Vec::new();
    }

    entries.sort_by_cached_key(|e| e.parsed_time());

    let mut groups: Vec<Vec<InteractionEntry>> = Vec::new();
    let mut current: Vec<InteractionEntry> = Vec::new();
    let mut last_time: Option<DateTime<Utc>> = None;

    for entry in entries {
        let Some(entry_time) = entry.parsed_time() else {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
            current.push(entry);
            last_time = None;
            continue;
        };

        let within_window = last_time.map_or(true, |last| entry_time - last <= window);
        if !within_window && !current.is_empty() {
            groups.push(std::mem::take(&mut current));
        }
        current.push(entry);
        last_time = Some(entry_time);
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(i, group)| synthesize(i, group))
        .collect()
}

fn synthesize(index: usize, entries: Vec<InteractionEntry>) -> Conversation {
    let first = &entries[0];
    let date = if first.timestamp.is_empty() {
        "unknown"
    } else {
        first.timestamp.get(..10).unwrap_or(&first.timestamp)
    };
    let conversation_id = format!("unmatched-{}-{:04}", date, index);
    let title = truncate_title(&first.prompt_text);

    Conversation {
        conversation_id,
        title,
        provenance: Provenance::Synthesized,
        entries,
    }
}

fn truncate_title(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IndexedPrompt;

    fn entry(prompt: &str, ts: &str) -> InteractionEntry {
        InteractionEntry::new(prompt, ts)
    }

    fn index(conversations: &[(&str, &str)], prompts: &[(&str, &str)]) -> ConversationIndex {
        ConversationIndex {
            conversations: conversations
                .iter()
                .map(|(id, title)| (id.to_string(), title.to_string()))
                .collect(),
            prompts: prompts
                .iter()
                .enumerate()
                .map(|(i, (id, preview))| IndexedPrompt {
                    conversation_id: id.to_string(),
                    conversation_title: String::new(),
                    text_preview: preview.to_string(),
                    order_in_conversation: i as u32,
                })
                .collect(),
        }
    }

    fn window() -> Duration {
        Duration::minutes(DEFAULT_TIME_WINDOW_MINUTES)
    }

    #[test]
    fn test_empty_entries() {
        let (matched, unmatched) = reconcile(&[], &ConversationIndex::default(), window());
        assert!(matched.is_empty());
        assert!(unmatched.is_empty());
    }

    #[test]
    fn test_empty_index_everything_unmatched() {
        let entries = vec![entry("Hello world", "2026-01-15T10:00:00.000Z")];
        let (matched, unmatched) = reconcile(&entries, &ConversationIndex::default(), window());
        assert!(matched.is_empty());
        assert_eq!(unmatched.len(), 1);
        assert_eq!(unmatched[0].entries[0].prompt_text, "Hello world");
        assert_eq!(unmatched[0].provenance, Provenance::Synthesized);
    }

    #[test]
    fn test_case_folded_prefix_match() {
        let entries = vec![entry("Hello World, how are you?", "2026-01-15T10:00:00Z")];
        let idx = index(&[("conv1", "Greetings")], &[("conv1", "hello world")]);
        let (matched, unmatched) = reconcile(&entries, &idx, window());
        assert_eq!(matched.len(), 1);
        assert!(unmatched.is_empty());
        assert_eq!(matched[0].conversation_id, "conv1");
        assert_eq!(matched[0].title, "Greetings");
        assert_eq!(matched[0].provenance, Provenance::Matched);
    }

    #[test]
    fn test_preview_longer_than_prompt_matches() {
        let entries = vec![entry("  Short  ", "2026-01-15T10:00:00Z")];
        let idx = index(&[], &[("conv1", "short question that the crawler saw")]);
        let (matched, _) = reconcile(&entries, &idx, window());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, UNTITLED);
    }

    #[test]
    fn test_longest_preview_wins() {
        let idx = index(
            &[("generic", "G"), ("specific", "S")],
            &[("generic", "how do i"), ("specific", "how do i write a parser")],
        );
        let lookup = PreviewLookup::from_index(&idx);
        assert_eq!(lookup.find("How do I write a parser in Rust?"), Some("specific"));
        assert_eq!(lookup.find("How do I cook rice?"), Some("generic"));
    }

    #[test]
    fn test_repeated_preview_last_wins() {
        let idx = index(&[], &[("old", "same text"), ("new", "same text")]);
        let lookup = PreviewLookup::from_index(&idx);
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.find("same text"), Some("new"));
    }

    #[test]
    fn test_empty_text_never_matches() {
        let idx = index(&[], &[("c", "anything")]);
        let lookup = PreviewLookup::from_index(&idx);
        assert_eq!(lookup.find("   "), None);
        let blank_preview = index(&[], &[("c", "   ")]);
        assert!(PreviewLookup::from_index(&blank_preview).is_empty());
    }

    #[test]
    fn test_entries_grouped_per_conversation_in_encounter_order() {
        let entries = vec![
            entry("First question about Python", "2026-01-15T10:00:00Z"),
            entry("Rust borrow checker", "2026-01-15T10:01:00Z"),
            entry("Second question about Python", "2026-01-15T10:05:00Z"),
        ];
        let idx = index(
            &[("py", "Python"), ("rs", "Rust")],
            &[
                ("py", "first question about python"),
                ("rs", "rust borrow"),
                ("py", "second question about python"),
            ],
        );
        let (matched, unmatched) = reconcile(&entries, &idx, window());
        assert!(unmatched.is_empty());
        let ids: Vec<_> = matched.iter().map(|c| c.conversation_id.as_str()).collect();
        assert_eq!(ids, vec!["py", "rs"]);
        assert_eq!(matched[0].entries.len(), 2);
        assert_eq!(matched[0].entries[1].prompt_text, "Second question about Python");
    }

    #[test]
    fn test_matching_monotonicity() {
        let entries = vec![
            entry("known prompt one", "2026-01-15T10:00:00Z"),
            entry("stray", "2026-01-15T10:10:00Z"),
            entry("another stray", "2026-01-15T18:00:00Z"),
        ];
        let idx = index(&[("k", "Known")], &[("k", "known prompt")]);
        let (matched, unmatched) = reconcile(&entries, &idx, window());

        for conv in &matched {
            assert!(idx.prompts.iter().any(|p| p.conversation_id == conv.conversation_id));
        }
        let synthesized: usize = unmatched.iter().map(|c| c.entries.len()).sum();
        assert_eq!(synthesized, 2);
        assert_eq!(matched.iter().map(|c| c.entries.len()).sum::<usize>(), 1);
    }

    #[test]
    fn test_temporal_clustering_two_and_one() {
        let entries = vec![
            entry("morning question", "2026-01-15T10:00:00.000Z"),
            entry("follow up", "2026-01-15T10:05:00.000Z"),
            entry("afternoon", "2026-01-15T14:05:00.000Z"),
        ];
        let (_, unmatched) = reconcile(&entries, &ConversationIndex::default(), window());
        let sizes: Vec<_> = unmatched.iter().map(|c| c.entries.len()).collect();
        assert_eq!(sizes, vec![2, 1]);
        assert_eq!(unmatched[0].conversation_id, "unmatched-2026-01-15-0000");
        assert_eq!(unmatched[1].conversation_id, "unmatched-2026-01-15-0001");
    }

    #[test]
    fn test_window_boundary_inclusive() {
        let exact = vec![
            entry("a", "2026-01-15T10:00:00Z"),
            entry("b", "2026-01-15T10:30:00Z"),
        ];
        let (_, groups) = reconcile(&exact, &ConversationIndex::default(), window());
        assert_eq!(groups.len(), 1);

        let over = vec![
            entry("a", "2026-01-15T10:00:00Z"),
            entry("b", "2026-01-15T10:30:01Z"),
        ];
        let (_, groups) = reconcile(&over, &ConversationIndex::default(), window());
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_unparseable_timestamp_starts_new_group() {
        let entries = vec![
            entry("a", "2026-01-15T10:00:00Z"),
            entry("b", "2026-01-15T12:00:00Zjunk"),
            entry("c", "2026-01-15T23:00:00Z"),
        ];
        let (_, groups) = reconcile(&entries, &ConversationIndex::default(), window());
        let sizes: Vec<_> = groups.iter().map(|c| c.entries.len()).collect();
        assert_eq!(sizes, vec![2, 1]);
        assert_eq!(groups[0].entries[0].prompt_text, "b");
        assert_eq!(groups[0].entries[1].prompt_text, "a");
    }

    #[test]
    fn test_mixed_offsets_grouped_by_instant() {
        // 01:00Z and 05:00Z; string order puts them the other way round
        let entries = vec![
            entry("tokyo morning", "2026-01-15T10:00:00+09:00"),
            entry("utc morning", "2026-01-15T05:00:00Z"),
        ];
        let (_, groups) = reconcile(&entries, &ConversationIndex::default(), window());
        let sizes: Vec<_> = groups.iter().map(|c| c.entries.len()).collect();
        assert_eq!(sizes, vec![1, 1]);
        assert_eq!(groups[0].entries[0].prompt_text, "tokyo morning");
    }

    #[test]
    fn test_unknown_date_for_empty_timestamp() {
        let entries = vec![entry("orphan", "")];
        let (_, groups) = reconcile(&entries, &ConversationIndex::default(), window());
        assert_eq!(groups[0].conversation_id, "unmatched-unknown-0000");
    }

    #[test]
    fn test_title_truncation() {
        let long = "x".repeat(60);
        let entries = vec![entry(&long, "2026-01-15T10:00:00Z")];
        let (_, groups) = reconcile(&entries, &ConversationIndex::default(), window());
        assert_eq!(groups[0].title, format!("{}...", "x".repeat(50)));

        let exact = "y".repeat(50);
        assert_eq!(truncate_title(&exact), exact);
        assert_eq!(truncate_title("short"), "short");
    }
}
