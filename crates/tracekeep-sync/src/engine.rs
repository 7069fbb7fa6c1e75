//! Per-unit skip/write decisions with at-most-one write per run

use crate::{DocumentSink, RenderedDocument, StateStore, SyncError};
use std::collections::HashSet;
use tracekeep_core::{Distillation, Fingerprint, SyncState};
use tracekeep_distill::DistillError;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    Written,
    /// Fingerprint equals the stored one
    Unchanged,
    /// Key already handled earlier in this run
    Duplicate,
    /// Summary backend failed; state untouched so the next run retries
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub written: usize,
    pub unchanged: usize,
    pub duplicates: usize,
    pub failed: usize,
}

impl RunReport {
    fn tally(&mut self, outcome: UnitOutcome) {
        match outcome {
            UnitOutcome::Written => self.written += 1,
            UnitOutcome::Unchanged => self.unchanged += 1,
            UnitOutcome::Duplicate => self.duplicates += 1,
            UnitOutcome::Failed => self.failed += 1,
        }
    }
}

/// Drives one run against a loaded state
///
/// State is checkpointed after every written unit, so a crash loses at
/// most the unit in flight.
pub struct SyncEngine<S> {
    store: StateStore,
    state: SyncState,
    sink: S,
    seen: HashSet<String>,
    report: RunReport,
}

impl<S: DocumentSink> SyncEngine<S> {
    /// Load state from `store` and start a run
    pub fn open(store: StateStore, sink: S) -> Self {
        let state = store.load();
        Self::with_state(store, state, sink)
    }

    pub fn with_state(store: StateStore, state: SyncState, sink: S) -> Self {
        Self {
            store,
            state,
            sink,
            seen: HashSet::new(),
            report: RunReport::default(),
        }
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn report(&self) -> RunReport {
        self.report
    }

    fn claim(&mut self, key: &str) -> bool {
        if self.seen.insert(key.to_string()) {
            return true;
        }
        warn!("Unit {} appeared twice in one run, keeping the first", key);
        false
    }

    fn emit(&mut self, document: &RenderedDocument, fingerprint: Fingerprint) -> Result<(), SyncError> {
        self.sink
            .write(document)
            .map_err(|source| SyncError::Output {
                filename: document.filename.clone(),
                source,
            })?;
        self.state
            .record_written(&document.key, fingerprint, Some(document.filename.clone()));
        Ok(())
    }

    /// Content-hash strategy: write when the rendered document changed
    pub fn process_hashed(&mut self, document: RenderedDocument) -> Result<UnitOutcome, SyncError> {
        let outcome = self.hashed(document)?;
        self.report.tally(outcome);
        Ok(outcome)
    }

    fn hashed(&mut self, document: RenderedDocument) -> Result<UnitOutcome, SyncError> {
        if !self.claim(&document.key) {
            return Ok(UnitOutcome::Duplicate);
        }

        let fingerprint = Fingerprint::of_content(&document.content);
        if self.state.is_unchanged(&document.key, &fingerprint) {
            debug!("Skipping unchanged: {}", document.filename);
            return Ok(UnitOutcome::Unchanged);
        }

        self.emit(&document, fingerprint)?;
        self.store.save(&self.state)?;
        Ok(UnitOutcome::Written)
    }

    /// Count strategy: only compute when the unit's entry count changed
    ///
    /// `compute` sees the state as it stands before this unit is recorded,
    /// so it can look up earlier summaries.
    pub fn process_counted<F>(
        &mut self,
        key: &str,
        count: usize,
        compute: F,
    ) -> Result<UnitOutcome, SyncError>
    where
        F: FnOnce(&SyncState) -> Result<(RenderedDocument, Distillation), DistillError>,
    {
        let outcome = self.counted(key, count, compute)?;
        self.report.tally(outcome);
        Ok(outcome)
    }

    fn counted<F>(&mut self, key: &str, count: usize, compute: F) -> Result<UnitOutcome, SyncError>
    where
        F: FnOnce(&SyncState) -> Result<(RenderedDocument, Distillation), DistillError>,
    {
        if !self.claim(key) {
            return Ok(UnitOutcome::Duplicate);
        }

        let fingerprint = Fingerprint::Count(count);
        if self.state.is_unchanged(key, &fingerprint) {
            debug!("Skipping {}: count unchanged ({})", key, count);
            return Ok(UnitOutcome::Unchanged);
        }

        let (document, summary) = match compute(&self.state) {
            Ok(computed) => computed,
            Err(e) => {
                match &e {
                    DistillError::Unreachable { .. } | DistillError::Http(_) => {
                        error!("Summary backend failed for {}, will retry next run: {}", key, e)
                    }
                    DistillError::EmptyResponse | DistillError::InvalidResponse(_) => {
                        error!("Unusable summary for {}: {}", key, e)
                    }
                    _ => error!("Failed to summarize {}: {}", key, e),
                }
                return Ok(UnitOutcome::Failed);
            }
        };

        self.emit(&document, fingerprint)?;
        self.state.record_summary(key, summary);
        self.store.save(&self.state)?;
        Ok(UnitOutcome::Written)
    }

    /// Persist state and hand back the tallies
    pub fn finish(self) -> Result<RunReport, SyncError> {
        self.store.save(&self.state)?;
        Ok(self.report)
    }
}
