//! Day-over-day difference between two distillations
//!
//! Pure set arithmetic, no I/O. Every list is sorted so the output is
//! deterministic regardless of input order.

use crate::summary::Distillation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const PRIMARY_LABEL: &str = "core";
pub const SECONDARY_LABEL: &str = "interest";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub current_date: String,
    pub previous_date: String,
    /// Core topics not present at all the previous day
    pub new_topics: Vec<String>,
    /// Promotions first, then demotions, e.g. `"Rust: interest → core"`
    pub shifted_topics: Vec<String>,
    /// Previous core topics absent from today entirely
    pub faded_topics: Vec<String>,
    /// `"low → high"`, empty when unchanged or unknown on either side
    pub mood_shift: String,
    pub new_domains: Vec<String>,
    pub lost_domains: Vec<String>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.new_topics.is_empty()
            && self.shifted_topics.is_empty()
            && self.faded_topics.is_empty()
            && self.mood_shift.is_empty()
            && self.new_domains.is_empty()
            && self.lost_domains.is_empty()
    }
}

fn set(items: &[String]) -> BTreeSet<&str> {
    items.iter().map(String::as_str).collect()
}

fn owned<'a, 'b: 'a>(items: impl Iterator<Item = &'a &'b str>) -> Vec<String> {
    items.map(|s| s.to_string()).collect()
}

pub fn compute_delta(current: &Distillation, previous: &Distillation) -> Delta {
    let cur_topics = set(&current.core_topics);
    let prev_topics = set(&previous.core_topics);
    let cur_interests = set(&current.interests);
    let prev_interests = set(&previous.interests);
    let cur_domains = set(&current.domain_tags);
    let prev_domains = set(&previous.domain_tags);

    let prev_all: BTreeSet<&str> = prev_topics.union(&prev_interests).copied().collect();
    let cur_all: BTreeSet<&str> = cur_topics.union(&cur_interests).copied().collect();

    let new_topics = owned(cur_topics.difference(&prev_all));
    let faded_topics = owned(prev_topics.difference(&cur_all));

    let promoted = cur_topics
        .intersection(&prev_interests)
        .filter(|t| !prev_topics.contains(*t));
    let demoted = cur_interests
        .intersection(&prev_topics)
        .filter(|t| !prev_interests.contains(*t));

    let mut shifted_topics: Vec<String> = promoted
        .map(|t| format!("{}: {} → {}", t, SECONDARY_LABEL, PRIMARY_LABEL))
        .collect();
    shifted_topics.extend(demoted.map(|t| format!("{}: {} → {}", t, PRIMARY_LABEL, SECONDARY_LABEL)));

    let mood_shift = match (previous.energy_level, current.energy_level) {
        (Some(before), Some(after)) if before != after => format!("{} → {}", before, after),
        _ => String::new(),
    };

    Delta {
        current_date: current.date.clone(),
        previous_date: previous.date.clone(),
        new_topics,
        shifted_topics,
        faded_topics,
        mood_shift,
        new_domains: owned(cur_domains.difference(&prev_domains)),
        lost_domains: owned(prev_domains.difference(&cur_domains)),
    }
}
