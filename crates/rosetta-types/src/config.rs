// ─────────────────────────────────────────────────────────────────────
// Rosetta Shape Core — Kernel Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{ResonanceError, ResonanceResult};

/// Runtime configuration for the resonance kernel.
///
/// Holds the tunable weights and fallbacks. The harmonic constant tables
/// and the cross-dimensional decision table are fixed and live with the
/// engine code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResonanceConfig {
    /// Resonance returned when either pattern id is unknown.
    /// Default: 0.5.
    pub neutral_resonance: f64,

    /// Starting point of the heuristic tier before weighted sub-scores.
    /// Default: 0.5.
    pub heuristic_baseline: f64,

    /// Weight for natural co-occurrence. Default: 0.2.
    pub w_natural: f64,

    /// Weight for mathematical harmony. Default: 0.15.
    pub w_mathematical: f64,

    /// Weight for behavioral complementarity. Default: 0.15.
    pub w_behavioral: f64,

    /// Weight for geometric alignment. Default: 0.0 (disabled).
    pub w_geometric: f64,

    /// Seed coherence of every dimensional context entry.
    /// Default: 0.7.
    pub initial_dimension_coherence: f64,

    /// Cultural alignment when cross-dimensional coherence is in range.
    /// Default: 0.9.
    pub alignment_confirmed: f64,

    /// Cultural alignment when cross-dimensional coherence is out of range.
    /// Default: 0.3.
    pub alignment_mismatch: f64,

    /// Cultural alignment when no coherence range was supplied.
    /// Default: 0.5.
    pub alignment_unassessed: f64,

    /// Maximum absolute distance between emotional coherence and the
    /// expected emotional state to count as a confirmation.
    /// Default: 0.2.
    pub emotional_tolerance: f64,

    /// Number of validation records kept by the cultural validator.
    /// Default: 5.
    pub history_window: usize,
}

impl Default for ResonanceConfig {
    fn default() -> Self {
        Self {
            neutral_resonance: 0.5,
            heuristic_baseline: 0.5,
            w_natural: 0.2,
            w_mathematical: 0.15,
            w_behavioral: 0.15,
            w_geometric: 0.0,
            initial_dimension_coherence: 0.7,
            alignment_confirmed: 0.9,
            alignment_mismatch: 0.3,
            alignment_unassessed: 0.5,
            emotional_tolerance: 0.2,
            history_window: 5,
        }
    }
}

impl ResonanceConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> ResonanceResult<()> {
        let unit_fields = [
            ("neutral_resonance", self.neutral_resonance),
            ("heuristic_baseline", self.heuristic_baseline),
            ("initial_dimension_coherence", self.initial_dimension_coherence),
            ("alignment_confirmed", self.alignment_confirmed),
            ("alignment_mismatch", self.alignment_mismatch),
            ("alignment_unassessed", self.alignment_unassessed),
            ("emotional_tolerance", self.emotional_tolerance),
        ];
        for (name, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ResonanceError::Config(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }

        let weights = [
            ("w_natural", self.w_natural),
            ("w_mathematical", self.w_mathematical),
            ("w_behavioral", self.w_behavioral),
            ("w_geometric", self.w_geometric),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ResonanceError::Config(format!(
                    "{name} must be a finite value >= 0, got {value}"
                )));
            }
        }

        if self.history_window < 1 {
            return Err(ResonanceError::Config(format!(
                "history_window must be >= 1, got {}",
                self.history_window
            )));
        }
        Ok(())
    }

    /// Load from JSON string and validate. Missing keys take their defaults.
    pub fn from_json(json: &str) -> ResonanceResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ResonanceError::Config(format!("JSON parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
