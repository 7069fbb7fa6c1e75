//! Activity export → chronological interaction entries
//!
//! The export is a JSON array of heterogeneous activity records, newest
//! first. Only records whose title starts with [`PROMPTED_PREFIX`] are user
//! prompts; everything else (feedback, "Created", "Used") is ignored.

use crate::error::NormalizeError;
use crate::types::InteractionEntry;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

pub const PROMPTED_PREFIX: &str = "Prompted ";
const GEM_MARKER: &str = " was used in this chat.";
const ATTACHMENT_PREFIX: &str = "-  ";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    safe_html_item: Vec<HtmlItem>,
    #[serde(default, deserialize_with = "lenient_list")]
    subtitles: Vec<Subtitle>,
    #[serde(default)]
    image_file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct HtmlItem {
    #[serde(default)]
    html: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Subtitle {
    #[serde(default)]
    name: Option<String>,
}

/// Side lists never sink the record: a non-array is empty, a bad item is default
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

/// Read and normalize an export file
pub fn load_export(path: &Path) -> Result<Vec<InteractionEntry>, NormalizeError> {
    let contents = std::fs::read_to_string(path).map_err(|source| NormalizeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_export(&contents)?;
    info!("Parsed {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Normalize export JSON text
pub fn parse_export(contents: &str) -> Result<Vec<InteractionEntry>, NormalizeError> {
    let value: Value = serde_json::from_str(contents)?;
    Ok(normalize_export(&value))
}

/// Normalize an already-parsed export document
///
/// Output is chronological: the newest-first source order is reversed, then
/// entries are stably ordered by parsed timestamp with unparseable ones
/// first.
pub fn normalize_export(value: &Value) -> Vec<InteractionEntry> {
    let Some(items) = value.as_array() else {
        warn!("Expected JSON array, got {}", json_kind(value));
        return Vec::new();
    };

    let mut entries: Vec<InteractionEntry> = items.iter().filter_map(normalize_record).collect();

    entries.reverse();
    entries.sort_by_cached_key(|e| e.parsed_time());
    entries
}

fn normalize_record(item: &Value) -> Option<InteractionEntry> {
    let record: ActivityRecord = match serde_json::from_value(item.clone()) {
        Ok(r) => r,
        Err(e) => {
            debug!("Skipping malformed activity record: {}", e);
            return None;
        }
    };

    let title = record.title.unwrap_or_default();
    let prompt_text = title.strip_prefix(PROMPTED_PREFIX)?.to_string();

    let mut html_items = record
        .safe_html_item
        .into_iter()
        .map(|h| h.html.unwrap_or_default());
    let response_html = html_items.next().unwrap_or_default();
    let regenerated_responses: Vec<String> = html_items.filter(|h| !h.is_empty()).collect();

    let mut gem_name = None;
    let mut attached_files = Vec::new();
    for subtitle in record.subtitles {
        let name = subtitle.name.unwrap_or_default();
        if let Some((gem, _)) = name.split_once(GEM_MARKER) {
            gem_name = Some(gem.to_string());
        } else if let Some(file) = name.strip_prefix(ATTACHMENT_PREFIX) {
            attached_files.push(file.to_string());
        }
    }

    if let Some(image) = record.image_file.filter(|f| !f.is_empty()) {
        if !attached_files.contains(&image) {
            attached_files.push(image);
        }
    }

    Some(InteractionEntry {
        prompt_text,
        response_html,
        timestamp: record.time.unwrap_or_default(),
        gem_name,
        attached_files,
        regenerated_responses,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
