//! Per-day summary produced by the distillation backend

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal energy classification of a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    High,
    Medium,
    Low,
    Scattered,
}

impl EnergyLevel {
    /// Case-insensitive parse; anything outside the four levels is `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            "scattered" => Some(Self::Scattered),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Scattered => "scattered",
        }
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thinking patterns extracted for a single day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distillation {
    pub date: String,
    /// Primary topics, 3-7 expected
    #[serde(default)]
    pub core_topics: Vec<String>,
    /// Broader interests, 2-5 expected
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub mood_tension: String,
    #[serde(default, deserialize_with = "lenient_energy")]
    pub energy_level: Option<EnergyLevel>,
    #[serde(default)]
    pub key_questions: Vec<String>,
    #[serde(default)]
    pub domain_tags: Vec<String>,
    #[serde(default)]
    pub prompt_count: usize,
    #[serde(default)]
    pub model: String,
}

impl Distillation {
    pub fn empty(date: &str, model: &str, prompt_count: usize) -> Self {
        Self {
            date: date.to_string(),
            model: model.to_string(),
            prompt_count,
            ..Default::default()
        }
    }
}

// Older state files stored the level as a plain string, "" when unknown.
fn lenient_energy<'de, D>(deserializer: D) -> Result<Option<EnergyLevel>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(EnergyLevel::parse))
}
