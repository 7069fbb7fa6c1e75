//! Export → per-day summaries with day-over-day deltas

use crate::export::load_entries;
use crate::{DocumentSink, RenderedDocument, RunReport, StateStore, SyncEngine, SyncError};
use std::path::Path;
use tracekeep_core::{aggregate_by_date, compute_delta};
use tracekeep_distill::Distiller;
use tracekeep_render::{distillation_filename, render_distillation};
use tracing::{info, warn};

/// Inclusive `YYYY-MM-DD` bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange<'a> {
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
}

pub fn sync_distillations<D, S>(
    takeout: &Path,
    range: DateRange<'_>,
    state_file: &Path,
    distiller: &D,
    sink: S,
) -> Result<RunReport, SyncError>
where
    D: Distiller + ?Sized,
    S: DocumentSink,
{
    info!("Checking summary backend (model: {})", distiller.model());
    distiller.check_ready().map_err(SyncError::NotReady)?;

    let entries = load_entries(takeout)?;
    if entries.is_empty() {
        warn!("No entries found in {}", takeout.display());
        return Ok(RunReport::default());
    }

    let cohorts = aggregate_by_date(&entries, range.from, range.to);
    if cohorts.is_empty() {
        warn!("No days in date range");
        return Ok(RunReport::default());
    }

    let mut engine = SyncEngine::open(StateStore::new(state_file), sink);
    for cohort in &cohorts {
        engine.process_counted(&cohort.date, cohort.prompt_count, |state| {
            info!("Distilling {} ({} prompts)", cohort.date, cohort.prompt_count);
            let summary = distiller.distill(cohort)?;
            let delta = state
                .previous_summary(&cohort.date)
                .map(|previous| compute_delta(&summary, previous));
            let document = RenderedDocument {
                key: cohort.date.clone(),
                filename: distillation_filename(&cohort.date),
                content: render_distillation(&summary, delta.as_ref()),
            };
            Ok((document, summary))
        })?;
    }

    let report = engine.finish()?;
    info!(
        "Distillation complete: {} written, {} unchanged, {} failed",
        report.written, report.unchanged, report.failed
    );
    Ok(report)
}
