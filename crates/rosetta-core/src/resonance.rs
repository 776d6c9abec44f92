// ─────────────────────────────────────────────────────────────────────
// Rosetta Shape Core — Resonance Calculator
// ─────────────────────────────────────────────────────────────────────
//! Directional pairwise resonance between two pattern records.
//!
//! Tiers, first match wins:
//! 1. `strong_affinity` entry on A for B
//! 2. `complementary` entry on A for B
//! 3. `interference` entry on A for B
//! 4. heuristic: `baseline + Σ wᵢ · subscoreᵢ`, clamped to [0, 1]
//!
//! Only A's tables are consulted. A declaration on B for A does not
//! make the pair symmetric.

use std::collections::HashSet;
use std::sync::Arc;

use rosetta_types::score::clamp_score;
use rosetta_types::{
    BehavioralTrait, PatternRecord, ResonanceBreakdown, ResonanceConfig, ResonanceTier,
    ScoreClass,
};

use crate::harmonics::{near_simple_fraction, HARMONIC_RATIOS};
use crate::store::PatternLookup;

/// Ordered trait pairs that complement each other across two patterns.
const COMPLEMENTARY_TRAITS: [(BehavioralTrait, BehavioralTrait); 4] = [
    (BehavioralTrait::Initiates, BehavioralTrait::Stabilizes),
    (BehavioralTrait::Amplifies, BehavioralTrait::Dampens),
    (BehavioralTrait::Transforms, BehavioralTrait::Stabilizes),
    (BehavioralTrait::Connects, BehavioralTrait::Stabilizes),
];

/// Unordered topology pairs that fit together.
const COMPLEMENTARY_TOPOLOGIES: [(&str, &str); 3] = [
    ("spiral", "radial"),
    ("branching", "networked"),
    ("linear", "cyclic"),
];

/// Whether two topology tags form a complementary pair, in either order.
pub fn complementary_topologies(a: &str, b: &str) -> bool {
    COMPLEMENTARY_TOPOLOGIES
        .iter()
        .any(|&(x, y)| (a == x && b == y) || (a == y && b == x))
}

/// 0.9 on a declared co-occurrence in either direction, otherwise
/// 0.15 per shared observation site, capped at 0.6.
pub fn natural_co_occurrence(a: &PatternRecord, b: &PatternRecord) -> f64 {
    let na = &a.layers.natural;
    let nb = &b.layers.natural;
    if na.co_occurs_with.iter().any(|id| *id == b.pattern_id)
        || nb.co_occurs_with.iter().any(|id| *id == a.pattern_id)
    {
        return 0.9;
    }
    let sites: HashSet<&str> = na.observed_in.iter().map(String::as_str).collect();
    let shared: HashSet<&str> = nb
        .observed_in
        .iter()
        .map(String::as_str)
        .filter(|s| sites.contains(s))
        .collect();
    (0.15 * shared.len() as f64).min(0.6)
}

/// Harmony of two primary constants, judged on signed larger/smaller.
///
/// 0.95 for a recognised harmonic ratio, 0.7 for a simple fraction,
/// 0.3 otherwise or when the smaller constant is zero. Mixed signs give
/// a negative ratio, which never matches.
pub fn mathematical_harmony(a: f64, b: f64) -> f64 {
    let (hi, lo) = (a.max(b), a.min(b));
    if lo == 0.0 || !hi.is_finite() || !lo.is_finite() {
        return 0.3;
    }
    let ratio = hi / lo;
    if HARMONIC_RATIOS
        .iter()
        .any(|&(harmonic, tol)| (ratio - harmonic).abs() < tol)
    {
        0.95
    } else if near_simple_fraction(ratio, 0.01) {
        0.7
    } else {
        0.3
    }
}

/// 0.25 per complementary trait pairing in either direction, capped at 1.0.
pub fn behavioral_complementarity(a: &PatternRecord, b: &PatternRecord) -> f64 {
    let da = &a.behavioral_dynamics;
    let db = &b.behavioral_dynamics;
    let mut sum = 0.0;
    for (first, second) in COMPLEMENTARY_TRAITS {
        if da.has(first) && db.has(second) {
            sum += 0.25;
        }
        if da.has(second) && db.has(first) {
            sum += 0.25;
        }
    }
    f64::min(sum, 1.0)
}

/// 0.3 base, +0.4 for matching symmetry, +0.3 for complementary topology.
pub fn geometric_alignment(a: &PatternRecord, b: &PatternRecord) -> f64 {
    let ga = &a.layers.geometric;
    let gb = &b.layers.geometric;
    let mut score: f64 = 0.3;
    if ga.symmetry == gb.symmetry {
        score += 0.4;
    }
    if complementary_topologies(&ga.topology, &gb.topology) {
        score += 0.3;
    }
    score.min(1.0)
}

/// Pairwise resonance scorer over a shared pattern table.
pub struct ResonanceCalculator {
    config: ResonanceConfig,
    store: Arc<dyn PatternLookup>,
}

impl ResonanceCalculator {
    pub fn new(config: ResonanceConfig, store: Arc<dyn PatternLookup>) -> Self {
        Self { config, store }
    }

    /// Resonance of `a` toward `b` in [0, 1].
    ///
    /// Returns `neutral_resonance` if either id is unknown.
    pub fn resonance(&self, a: &str, b: &str) -> f64 {
        self.explain(a, b).score
    }

    /// Resonance together with the tier and sub-scores that decided it.
    pub fn explain(&self, a: &str, b: &str) -> ResonanceBreakdown {
        let mut breakdown = ResonanceBreakdown {
            pattern_a: a.to_string(),
            pattern_b: b.to_string(),
            tier: ResonanceTier::UnknownPattern,
            score: self.config.neutral_resonance,
            natural: None,
            mathematical: None,
            behavioral: None,
            geometric: None,
        };

        let (Some(pa), Some(pb)) = (self.store.get(a), self.store.get(b)) else {
            log::debug!("Unknown pattern in resonance({a}, {b}), returning neutral");
            return breakdown;
        };

        for class in ScoreClass::PRECEDENCE {
            if let Some(rel) = pa.resonance_mappings.find(class, b) {
                breakdown.tier = match class {
                    ScoreClass::StrongAffinity => ResonanceTier::StrongAffinity,
                    ScoreClass::Complementary => ResonanceTier::Complementary,
                    ScoreClass::Interference => ResonanceTier::Interference,
                };
                breakdown.score = rel.resonance_score;
                return breakdown;
            }
        }

        let natural = natural_co_occurrence(pa, pb);
        let mathematical = mathematical_harmony(
            pa.layers.mathematical.primary_constant,
            pb.layers.mathematical.primary_constant,
        );
        let behavioral = behavioral_complementarity(pa, pb);
        let geometric = geometric_alignment(pa, pb);

        let weighted = self.config.w_natural * natural
            + self.config.w_mathematical * mathematical
            + self.config.w_behavioral * behavioral
            + self.config.w_geometric * geometric;

        breakdown.tier = ResonanceTier::Heuristic;
        breakdown.score = clamp_score(self.config.heuristic_baseline + weighted, 0.0, 1.0);
        breakdown.natural = Some(natural);
        breakdown.mathematical = Some(mathematical);
        breakdown.behavioral = Some(behavioral);
        breakdown.geometric = Some(geometric);
        breakdown
    }

    /// Read-only access to config.
    pub fn config(&self) -> &ResonanceConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn PatternLookup> {
        &self.store
    }
}
