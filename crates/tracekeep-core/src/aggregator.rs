//! Group entries into per-day cohorts

use crate::types::{DayCohort, InteractionEntry};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

#[derive(Default)]
struct DayBucket {
    prompts: Vec<String>,
    gems: BTreeSet<String>,
}

/// Group chronologically ordered entries by calendar date
///
/// `date_from` / `date_to` are inclusive `YYYY-MM-DD` bounds compared
/// lexicographically against each entry's date prefix. Entries without a
/// valid date prefix are dropped. Prompt order within a day follows the
/// input order.
pub fn aggregate_by_date(
    entries: &[InteractionEntry],
    date_from: Option<&str>,
    date_to: Option<&str>,
) -> Vec<DayCohort> {
    let mut by_date: BTreeMap<&str, DayBucket> = BTreeMap::new();

    for entry in entries {
        let Some(date) = entry.date() else {
            continue;
        };
        if date_from.is_some_and(|from| date < from) {
            continue;
        }
        if date_to.is_some_and(|to| date > to) {
            continue;
        }

        let bucket = by_date.entry(date).or_default();
        bucket.prompts.push(entry.prompt_text.clone());
        if let Some(gem) = entry.gem_name.as_deref().filter(|g| !g.is_empty()) {
            bucket.gems.insert(gem.to_string());
        }
    }

    let cohorts: Vec<DayCohort> = by_date
        .into_iter()
        .map(|(date, bucket)| DayCohort {
            date: date.to_string(),
            prompt_count: bucket.prompts.len(),
            prompts: bucket.prompts,
            gem_names: bucket.gems.into_iter().collect(),
        })
        .collect();

    info!(
        "Grouped {} entries into {} day(s)",
        entries.len(),
        cohorts.len()
    );
    cohorts
}
