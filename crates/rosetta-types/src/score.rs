// ─────────────────────────────────────────────────────────────────────
// Rosetta Shape Core — Score and Report Types
// ─────────────────────────────────────────────────────────────────────

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Clamp a value to [lo, hi], mapping NaN to lo and Inf to nearest bound.
#[inline]
pub fn clamp_score(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_score: NaN detected, clamping to {lo:.4}");
        return lo;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { hi } else { lo };
        log::warn!("clamp_score: Inf detected, clamping to {boundary:.4}");
        return boundary;
    }
    value.clamp(lo, hi)
}

/// The five independent coherence dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Geometric,
    Energetic,
    Temporal,
    Relational,
    Emotional,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Geometric,
        Dimension::Energetic,
        Dimension::Temporal,
        Dimension::Relational,
        Dimension::Emotional,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Geometric => "geometric",
            Dimension::Energetic => "energetic",
            Dimension::Temporal => "temporal",
            Dimension::Relational => "relational",
            Dimension::Emotional => "emotional",
        }
    }
}

/// Per-dimension coherence plus the cross-dimensional verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoherenceReport {
    pub geometric: f64,
    pub energetic: f64,
    pub temporal: f64,
    pub relational: f64,
    pub emotional: f64,
    pub cross_dimensional: f64,
}

impl CoherenceReport {
    pub fn dimension(&self, dim: Dimension) -> f64 {
        match dim {
            Dimension::Geometric => self.geometric,
            Dimension::Energetic => self.energetic,
            Dimension::Temporal => self.temporal,
            Dimension::Relational => self.relational,
            Dimension::Emotional => self.emotional,
        }
    }

    /// The five dimension scores, in `Dimension::ALL` order.
    pub fn dimensions(&self) -> [f64; 5] {
        Dimension::ALL.map(|d| self.dimension(d))
    }

    /// Flat name → score mapping, including `cross_dimensional`.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        let mut map: BTreeMap<String, f64> = Dimension::ALL
            .iter()
            .map(|d| (d.name().to_string(), self.dimension(*d)))
            .collect();
        map.insert("cross_dimensional".to_string(), self.cross_dimensional);
        map
    }
}

/// Which rule decided a pairwise resonance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResonanceTier {
    UnknownPattern,
    StrongAffinity,
    Complementary,
    Interference,
    Heuristic,
}

/// Pairwise resonance with the sub-scores that produced it.
///
/// Sub-scores are `None` when an explicit tier decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResonanceBreakdown {
    pub pattern_a: String,
    pub pattern_b: String,
    pub tier: ResonanceTier,
    pub score: f64,
    pub natural: Option<f64>,
    pub mathematical: Option<f64>,
    pub behavioral: Option<f64>,
    pub geometric: Option<f64>,
}

/// A declared emergent combination whose required patterns are all active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergenceRecord {
    /// Pattern whose table declared the combination.
    pub declared_by: String,
    pub source_patterns: Vec<String>,
    pub creates: String,
    pub condition: String,
}

/// Externally supplied cultural expectation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CulturalExpectation {
    /// Inclusive `(low, high)` range for cross-dimensional coherence.
    pub expected_coherence_range: Option<(f64, f64)>,
    /// Expected emotional coherence.
    pub expected_emotional_state: Option<f64>,
}

/// Outcome of comparing computed coherence with a cultural expectation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub computational_coherence: CoherenceReport,
    pub cultural_alignment: f64,
    pub confirmation: Vec<String>,
    pub mismatches: Vec<String>,
}
