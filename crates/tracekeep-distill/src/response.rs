//! Lenient parsing of the model's reply into a [`Distillation`]

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracekeep_core::{Distillation, EnergyLevel};
use tracing::warn;

static FENCED_JSON_RE: OnceLock<Regex> = OnceLock::new();
static BRACE_JSON_RE: OnceLock<Regex> = OnceLock::new();

/// Parse a raw reply, falling back to an empty summary
///
/// Tried in order: the whole reply as a JSON object, a ```` ```json ````
/// fenced block, then the outermost `{...}` span.
pub fn parse_distillation_response(
    raw: &str,
    date: &str,
    model: &str,
    prompt_count: usize,
) -> Distillation {
    let data = try_parse_object(raw)
        .or_else(|| try_fenced(raw))
        .or_else(|| try_braces(raw));

    let Some(data) = data else {
        warn!("Failed to parse distillation response for {}", date);
        return Distillation::empty(date, model, prompt_count);
    };

    Distillation {
        date: date.to_string(),
        core_topics: list_field(&data, "core_topics"),
        interests: list_field(&data, "interests"),
        mood_tension: data.get("mood_tension").map(stringify).unwrap_or_default(),
        energy_level: data
            .get("energy_level")
            .and_then(|v| EnergyLevel::parse(&stringify(v))),
        key_questions: list_field(&data, "key_questions"),
        domain_tags: list_field(&data, "domain_tags"),
        prompt_count,
        model: model.to_string(),
    }
}

fn try_parse_object(raw: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn try_fenced(raw: &str) -> Option<Map<String, Value>> {
    let re = FENCED_JSON_RE.get_or_init(|| Regex::new(r"(?s)```json\s*\n(.*?)```").unwrap());
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| try_parse_object(m.as_str()))
}

fn try_braces(raw: &str) -> Option<Map<String, Value>> {
    let re = BRACE_JSON_RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").unwrap());
    re.find(raw).and_then(|m| try_parse_object(m.as_str()))
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// Non-array values are dropped rather than coerced.
fn list_field(data: &Map<String, Value>, key: &str) -> Vec<String> {
    match data.get(key) {
        Some(Value::Array(items)) => items.iter().map(stringify).collect(),
        _ => Vec::new(),
    }
}
