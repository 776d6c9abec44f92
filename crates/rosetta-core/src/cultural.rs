// ─────────────────────────────────────────────────────────────────────
// Rosetta Shape Core — Cultural Validator
// ─────────────────────────────────────────────────────────────────────
//! Compares computed coherence with an externally supplied cultural
//! expectation and keeps a bounded history of recent validations.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use rosetta_types::{
    CoherenceReport, CulturalExpectation, FieldState, ResonanceConfig, ValidationRecord,
};

use crate::coherence::CoherenceEngine;
use crate::store::PatternLookup;

/// Cultural alignment checker.
///
/// Thread-safe: history mutations are guarded by a `parking_lot::Mutex`.
pub struct CulturalValidator {
    engine: CoherenceEngine,
    history: Mutex<VecDeque<ValidationRecord>>,
}

impl CulturalValidator {
    pub fn new(config: ResonanceConfig, store: Arc<dyn PatternLookup>) -> Self {
        let capacity = config.history_window;
        Self {
            engine: CoherenceEngine::new(config, store),
            history: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn engine(&self) -> &CoherenceEngine {
        &self.engine
    }

    fn config(&self) -> &ResonanceConfig {
        self.engine.resonance().config()
    }

    /// Score the field state (caching the report on it), compare with
    /// `expectation`, and record the outcome.
    pub fn validate(
        &self,
        field: &mut FieldState,
        active: &[&str],
        expectation: &CulturalExpectation,
    ) -> ValidationRecord {
        let report = self.engine.calculate_coherence(field, active);
        let record = self.assess(&report, expectation);

        let mut history = self.history.lock();
        history.push_back(record.clone());
        while history.len() > self.config().history_window {
            history.pop_front();
        }
        record
    }

    /// Compare an existing coherence report with `expectation`.
    ///
    /// Alignment starts unassessed and is set by the coherence range
    /// check alone. The emotional check only adds a note.
    pub fn assess(
        &self,
        report: &CoherenceReport,
        expectation: &CulturalExpectation,
    ) -> ValidationRecord {
        let config = self.config();
        let mut record = ValidationRecord {
            computational_coherence: *report,
            cultural_alignment: config.alignment_unassessed,
            confirmation: Vec::new(),
            mismatches: Vec::new(),
        };

        if let Some((low, high)) = expectation.expected_coherence_range {
            let cd = report.cross_dimensional;
            if (low..=high).contains(&cd) {
                record.cultural_alignment = config.alignment_confirmed;
                record.confirmation.push(format!(
                    "cross-dimensional coherence {cd:.2} within expected range [{low:.2}, {high:.2}]"
                ));
                log::info!("Cultural expectation confirmed: coherence {cd:.2}");
            } else {
                record.cultural_alignment = config.alignment_mismatch;
                record.mismatches.push(format!(
                    "cross-dimensional coherence {cd:.2} outside expected range [{low:.2}, {high:.2}]"
                ));
                log::warn!(
                    "Cultural mismatch: coherence {cd:.2} outside [{low:.2}, {high:.2}]"
                );
            }
        }

        if let Some(expected) = expectation.expected_emotional_state {
            let actual = report.emotional;
            if (actual - expected).abs() <= config.emotional_tolerance {
                record.confirmation.push(format!(
                    "emotional coherence {actual:.2} matches expected {expected:.2}"
                ));
            } else {
                record.mismatches.push(format!(
                    "emotional coherence {actual:.2} differs from expected {expected:.2}"
                ));
            }
        }

        record
    }

    /// Number of validations currently held.
    pub fn history_len(&self) -> usize {
        self.history.lock().len()
    }

    /// Retained validations, oldest first.
    pub fn recent(&self) -> Vec<ValidationRecord> {
        self.history.lock().iter().cloned().collect()
    }
}
