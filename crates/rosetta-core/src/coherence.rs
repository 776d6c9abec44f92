// ─────────────────────────────────────────────────────────────────────
// Rosetta Shape Core — Coherence Engine
// ─────────────────────────────────────────────────────────────────────
//! Per-dimension coherence of a field state and the cross-dimensional
//! verdict.
//!
//! Each dimension score is clamped to [0, 1]. The cross-dimensional
//! score comes from a mean/deviation decision table over the five:
//!
//! | condition            | verdict | reading                 |
//! |----------------------|---------|-------------------------|
//! | μ > 0.7 ∧ σ < 0.15   | 0.9     | aligned                 |
//! | μ < 0.4 ∧ σ < 0.15   | 0.3     | consistently low        |
//! | σ > 0.3 ∧ μ > 0.5    | 0.6     | productive tension      |
//! | σ > 0.3 ∧ μ ≤ 0.5    | 0.2     | chaos / interference    |
//! | otherwise            | μ       |                         |

use std::collections::HashSet;
use std::f64::consts::{PI, TAU};
use std::sync::Arc;

use rosetta_types::score::clamp_score;
use rosetta_types::{
    CoherenceReport, DetectionMode, Dimension, EnergyPattern, FieldGrid, FieldState,
    ResonanceConfig,
};

use crate::context::DimensionalContext;
use crate::harmonics::{is_natural_ratio, natural_ratio_score};
use crate::resonance::ResonanceCalculator;
use crate::store::PatternLookup;

/// Score for any dimension with nothing to measure.
const NEUTRAL: f64 = 0.5;
/// Signature or energy value assumed when the field state has none.
const DEFAULT_READING: f64 = 0.5;
const CYCLE_BONUS: f64 = 0.1;
const FLAT_DEVIATION: f64 = 1e-12;

/// Mean and population standard deviation.
fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Merge five dimension scores into one cross-dimensional verdict.
pub fn cross_dimensional(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return NEUTRAL;
    }
    let (mean, std) = mean_std(scores);
    if mean > 0.7 && std < 0.15 {
        0.9
    } else if mean < 0.4 && std < 0.15 {
        0.3
    } else if std > 0.3 && mean > 0.5 {
        0.6
    } else if std > 0.3 {
        0.2
    } else {
        clamp_score(mean, 0.0, 1.0)
    }
}

/// Discrete derivative at `i` along an axis of length `len`: central
/// differences inside, one-sided at the edges, zero on a single sample.
fn axis_gradient(len: usize, i: usize, at: impl Fn(usize) -> f64) -> f64 {
    if len < 2 {
        0.0
    } else if i == 0 {
        at(1) - at(0)
    } else if i == len - 1 {
        at(i) - at(i - 1)
    } else {
        (at(i + 1) - at(i - 1)) / 2.0
    }
}

/// Smoothness and natural variation of the geometric sample grid.
///
/// `0.4 · smoothness + 0.6 · pattern_alignment`, or 0.5 on an empty grid.
pub fn geometric_coherence(grid: &FieldGrid) -> f64 {
    if grid.is_empty() {
        return NEUTRAL;
    }
    let (rows, cols) = (grid.rows(), grid.cols());

    let mut magnitude_sum = 0.0;
    for r in 0..rows {
        for c in 0..cols {
            let dy = axis_gradient(rows, r, |k| grid.get(k, c));
            let dx = axis_gradient(cols, c, |k| grid.get(r, k));
            magnitude_sum += dx.hypot(dy);
        }
    }
    let n = grid.values().len() as f64;
    let smoothness = 1.0 - clamp_score(magnitude_sum / n, 0.0, 1.0);

    let (_, std) = mean_std(grid.values());
    let pattern_alignment = if std < FLAT_DEVIATION {
        0.3
    } else {
        let mean_abs = grid.values().iter().map(|v| v.abs()).sum::<f64>() / n;
        natural_ratio_score(std / mean_abs)
    };

    clamp_score(0.4 * smoothness + 0.6 * pattern_alignment, 0.0, 1.0)
}

/// How well an energy reading fits the declared energy pattern.
///
/// Raw credit: out-of-range readings may push it outside [0, 1], and only
/// the dimension average is clamped. `None` for an unrecognised pattern,
/// which is then left uncounted.
pub fn energy_contribution(pattern: EnergyPattern, value: f64) -> Option<f64> {
    let score = match pattern {
        EnergyPattern::Accumulating => {
            if value > 0.6 {
                1.0
            } else {
                value / 0.6
            }
        }
        EnergyPattern::Dissipating => {
            if value < 0.4 {
                1.0
            } else {
                (1.0 - value) / 0.6
            }
        }
        EnergyPattern::Oscillating => 1.0 - (value - 0.5).abs(),
        EnergyPattern::Conserved => 1.0 - 2.0 * (value - 0.5).abs(),
        EnergyPattern::Transforming => 0.7,
        EnergyPattern::Unrecognized => return None,
    };
    Some(score)
}

/// How well an emotional signature fits the sensor's detection mode.
///
/// Raw credit, unclamped like `energy_contribution`. `None` for an
/// unrecognised mode, which is then left uncounted.
pub fn emotional_contribution(mode: DetectionMode, value: f64) -> Option<f64> {
    let score = match mode {
        DetectionMode::ResonanceIncrease => value,
        DetectionMode::ResonanceDecrease => 1.0 - value,
        DetectionMode::InterferencePattern => 1.0 - (value - 0.5).abs(),
        DetectionMode::FieldCoherence => 0.7,
        DetectionMode::MissingData => {
            if value < 0.3 {
                1.0 - value
            } else {
                0.3
            }
        }
        DetectionMode::Unrecognized => return None,
    };
    Some(score)
}

fn average_or_neutral(total: f64, count: usize) -> f64 {
    if count == 0 {
        NEUTRAL
    } else {
        clamp_score(total / count as f64, 0.0, 1.0)
    }
}

/// Computes per-dimension and cross-dimensional coherence.
pub struct CoherenceEngine {
    resonance: ResonanceCalculator,
}

impl CoherenceEngine {
    pub fn new(config: ResonanceConfig, store: Arc<dyn PatternLookup>) -> Self {
        Self {
            resonance: ResonanceCalculator::new(config, store),
        }
    }

    pub fn resonance(&self) -> &ResonanceCalculator {
        &self.resonance
    }

    fn store(&self) -> &dyn PatternLookup {
        self.resonance.store().as_ref()
    }

    /// Score the field state and cache the report on it.
    pub fn calculate_coherence(&self, field: &mut FieldState, active: &[&str]) -> CoherenceReport {
        let report = self.evaluate(field, active);
        field.coherence_metrics = Some(report);
        report
    }

    /// Score the field state without touching its cache.
    pub fn evaluate(&self, field: &FieldState, active: &[&str]) -> CoherenceReport {
        let mut report = CoherenceReport {
            geometric: geometric_coherence(&field.geometric_field),
            energetic: self.energetic_coherence(field, active),
            temporal: self.temporal_coherence(field, active),
            relational: self.relational_coherence(field, active),
            emotional: self.emotional_coherence(field, active),
            cross_dimensional: NEUTRAL,
        };
        report.cross_dimensional = cross_dimensional(&report.dimensions());
        log::debug!(
            "Coherence over {} active patterns: {:?}",
            active.len(),
            report
        );
        report
    }

    /// Average fit of each active pattern's energy reading to its
    /// declared energy pattern.
    pub fn energetic_coherence(&self, field: &FieldState, active: &[&str]) -> f64 {
        let (mut total, mut count) = (0.0, 0usize);
        for id in active {
            let Some(pattern) = self.store().get(id) else {
                continue;
            };
            let Some(energy) = pattern.layers.mathematical.energy_pattern else {
                continue;
            };
            let value = field
                .energy_distribution
                .get(*id)
                .copied()
                .unwrap_or(DEFAULT_READING);
            if let Some(score) = energy_contribution(energy, value) {
                total += score;
                count += 1;
            }
        }
        average_or_neutral(total, count)
    }

    /// 0.5 plus 0.1 per cycling active pattern when the temporal phase,
    /// read as a multiple of π, is a natural ratio.
    pub fn temporal_coherence(&self, field: &FieldState, active: &[&str]) -> f64 {
        let phase_ratio = field.temporal_phase * TAU / PI;
        if !is_natural_ratio(phase_ratio) {
            return NEUTRAL;
        }
        let cycling = active
            .iter()
            .filter_map(|id| self.store().get(id))
            .filter(|p| p.behavioral_dynamics.cycles)
            .count();
        clamp_score(NEUTRAL + CYCLE_BONUS * cycling as f64, 0.0, 1.0)
    }

    /// Average edge credit over relational edges leaving active patterns.
    pub fn relational_coherence(&self, field: &FieldState, active: &[&str]) -> f64 {
        let active_set: HashSet<&str> = active.iter().copied().collect();
        let (mut total, mut edges) = (0.0, 0usize);
        for (source, targets) in &field.relational_graph {
            if !active_set.contains(source.as_str()) {
                continue;
            }
            for target in targets {
                let r = self.resonance.resonance(source, target);
                total += if r > 0.6 {
                    1.0
                } else if r > 0.4 {
                    0.5
                } else {
                    0.2
                };
                edges += 1;
            }
        }
        average_or_neutral(total, edges)
    }

    /// Average fit of each active pattern's emotional signature to its
    /// sensor's detection mode.
    pub fn emotional_coherence(&self, field: &FieldState, active: &[&str]) -> f64 {
        let (mut total, mut count) = (0.0, 0usize);
        for id in active {
            let Some(pattern) = self.store().get(id) else {
                continue;
            };
            let value = field
                .emotional_signatures
                .get(*id)
                .copied()
                .unwrap_or(DEFAULT_READING);
            if let Some(score) = emotional_contribution(pattern.layers.emotional.detection_mode, value)
            {
                total += score;
                count += 1;
            }
        }
        average_or_neutral(total, count)
    }

    /// Aggregate a dimensional context: mean per-pattern coherence per
    /// dimension, clamped to [0, 1], plus the cross-dimensional verdict.
    pub fn context_coherence(&self, ctx: &DimensionalContext) -> CoherenceReport {
        let score = |dim: Dimension| {
            let values = ctx.coherences(dim);
            average_or_neutral(values.iter().sum(), values.len())
        };
        let mut report = CoherenceReport {
            geometric: score(Dimension::Geometric),
            energetic: score(Dimension::Energetic),
            temporal: score(Dimension::Temporal),
            relational: score(Dimension::Relational),
            emotional: score(Dimension::Emotional),
            cross_dimensional: NEUTRAL,
        };
        report.cross_dimensional = cross_dimensional(&report.dimensions());
        report
    }
}
