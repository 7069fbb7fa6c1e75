//! Incremental sync state: unit key → last written fingerprint

use crate::summary::Distillation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Bound;

/// Cheap value used to decide whether a unit changed since the last run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fingerprint {
    /// SHA-256 hex of the rendered document
    ContentHash(String),
    /// Number of entries in the unit
    Count(usize),
}

impl Fingerprint {
    pub fn of_content(content: &str) -> Self {
        Self::ContentHash(tracekeep_store::content_hash(content))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distillation: Option<Distillation>,
}

impl UnitRecord {
    fn matches(&self, fingerprint: &Fingerprint) -> bool {
        match fingerprint {
            Fingerprint::ContentHash(hash) => self.hash.as_deref() == Some(hash.as_str()),
            Fingerprint::Count(count) => self.prompt_count == Some(*count),
        }
    }
}

/// Whole-file sync state, one record per unit key
///
/// Keys are ordered so the persisted file is stable between runs. Records
/// are only ever added or overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncState {
    units: BTreeMap<String, UnitRecord>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&UnitRecord> {
        self.units.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    /// True when the stored fingerprint for `key` equals `fingerprint`
    pub fn is_unchanged(&self, key: &str, fingerprint: &Fingerprint) -> bool {
        self.units
            .get(key)
            .is_some_and(|record| record.matches(fingerprint))
    }

    /// Record a successful write
    pub fn record_written(&mut self, key: &str, fingerprint: Fingerprint, filename: Option<String>) {
        let record = self.units.entry(key.to_string()).or_default();
        match fingerprint {
            Fingerprint::ContentHash(hash) => record.hash = Some(hash),
            Fingerprint::Count(count) => record.prompt_count = Some(count),
        }
        if filename.is_some() {
            record.filename = filename;
        }
    }

    /// Attach the computed summary to a unit
    pub fn record_summary(&mut self, key: &str, summary: Distillation) {
        self.units.entry(key.to_string()).or_default().distillation = Some(summary);
    }

    /// Most recent summary stored under a key strictly before `key`
    ///
    /// Keys are `YYYY-MM-DD` dates on the cohort path, so lexicographic order
    /// is chronological.
    pub fn previous_summary(&self, key: &str) -> Option<&Distillation> {
        self.units
            .range::<str, _>((Bound::Unbounded, Bound::Excluded(key)))
            .rev()
            .find_map(|(_, record)| record.distillation.as_ref())
    }
}
