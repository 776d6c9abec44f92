// ─────────────────────────────────────────────────────────────────────
// Rosetta Shape Core — Field Context Builder
// ─────────────────────────────────────────────────────────────────────
//! Projects an active pattern set into five independent per-pattern
//! dimension maps, and lets pairwise interactions nudge the per-pattern
//! coherence values.
//!
//! Interaction updates accumulate without bounds. Clamping is left to
//! `CoherenceEngine::context_coherence`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use rosetta_types::{
    DetectionMode, Dimension, EnergyPattern, PatternRecord, ResonanceConfig, ScoreClass,
};

use crate::resonance::complementary_topologies;
use crate::store::PatternLookup;

const SYMMETRY_BONUS: f64 = 0.1;
const TOPOLOGY_BONUS: f64 = 0.05;
const AFFINITY_BONUS: f64 = 0.15;
const EMOTIONAL_GAIN: f64 = 0.5;
const EMOTIONAL_LOSS: f64 = 0.3;

/// Entry types that carry a per-pattern coherence value.
pub trait Coherent {
    fn coherence(&self) -> f64;
    fn coherence_mut(&mut self) -> &mut f64;
}

macro_rules! impl_coherent {
    ($($ty:ty),* $(,)?) => {
        $(impl Coherent for $ty {
            fn coherence(&self) -> f64 {
                self.coherence
            }
            fn coherence_mut(&mut self) -> &mut f64 {
                &mut self.coherence
            }
        })*
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometricEntry {
    pub coherence: f64,
    pub topology: String,
    pub symmetry: String,
    pub dimensionality: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergeticEntry {
    pub coherence: f64,
    pub constant: f64,
    pub energy_pattern: Option<EnergyPattern>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalEntry {
    pub coherence: f64,
    pub cycles: bool,
    pub transforms: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationalEntry {
    pub coherence: f64,
    pub affinities: Vec<String>,
    pub complementary: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalEntry {
    pub coherence: f64,
    pub sensor_type: String,
    pub detection_mode: DetectionMode,
    pub coherence_delta: f64,
}

impl_coherent!(
    GeometricEntry,
    EnergeticEntry,
    TemporalEntry,
    RelationalEntry,
    EmotionalEntry,
);

/// Five per-pattern dimension maps built from one active pattern set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionalContext {
    pub geometric: BTreeMap<String, GeometricEntry>,
    pub energetic: BTreeMap<String, EnergeticEntry>,
    pub temporal: BTreeMap<String, TemporalEntry>,
    pub relational: BTreeMap<String, RelationalEntry>,
    pub emotional_sensory: BTreeMap<String, EmotionalEntry>,
}

fn coherences<E: Coherent>(map: &BTreeMap<String, E>) -> Vec<f64> {
    map.values().map(Coherent::coherence).collect()
}

fn nudge<E: Coherent>(map: &mut BTreeMap<String, E>, ids: &[&str], delta: f64) {
    for id in ids {
        if let Some(entry) = map.get_mut(*id) {
            *entry.coherence_mut() += delta;
        }
    }
}

impl DimensionalContext {
    /// Per-pattern coherence values of one dimension, in id order.
    pub fn coherences(&self, dim: Dimension) -> Vec<f64> {
        match dim {
            Dimension::Geometric => coherences(&self.geometric),
            Dimension::Energetic => coherences(&self.energetic),
            Dimension::Temporal => coherences(&self.temporal),
            Dimension::Relational => coherences(&self.relational),
            Dimension::Emotional => coherences(&self.emotional_sensory),
        }
    }

    /// Number of patterns projected into the context.
    pub fn pattern_count(&self) -> usize {
        self.geometric.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern_count() == 0
    }
}

/// Builds and updates dimensional contexts against a pattern table.
pub struct FieldContextBuilder {
    config: ResonanceConfig,
    store: Arc<dyn PatternLookup>,
}

impl FieldContextBuilder {
    pub fn new(config: ResonanceConfig, store: Arc<dyn PatternLookup>) -> Self {
        Self { config, store }
    }

    /// Project every known active pattern into the five dimension maps.
    ///
    /// Unknown ids contribute nothing.
    pub fn build(&self, active: &[&str]) -> DimensionalContext {
        let mut ctx = DimensionalContext::default();
        for id in active {
            match self.store.get(id) {
                Some(pattern) => self.project(&mut ctx, pattern),
                None => log::debug!("Skipping unknown pattern {id} in context build"),
            }
        }
        ctx
    }

    fn project(&self, ctx: &mut DimensionalContext, pattern: &PatternRecord) {
        let seed = self.config.initial_dimension_coherence;
        let id = pattern.pattern_id.clone();
        let layers = &pattern.layers;
        let dynamics = &pattern.behavioral_dynamics;

        ctx.geometric.insert(
            id.clone(),
            GeometricEntry {
                coherence: seed,
                topology: layers.geometric.topology.clone(),
                symmetry: layers.geometric.symmetry.clone(),
                dimensionality: layers.geometric.dimensionality.clone(),
            },
        );
        ctx.energetic.insert(
            id.clone(),
            EnergeticEntry {
                coherence: seed,
                constant: layers.mathematical.primary_constant,
                energy_pattern: layers.mathematical.energy_pattern,
            },
        );
        ctx.temporal.insert(
            id.clone(),
            TemporalEntry {
                coherence: seed,
                cycles: dynamics.cycles,
                transforms: dynamics.transforms,
            },
        );
        ctx.relational.insert(
            id.clone(),
            RelationalEntry {
                coherence: seed,
                affinities: pattern
                    .resonance_mappings
                    .target_ids(ScoreClass::StrongAffinity),
                complementary: pattern
                    .resonance_mappings
                    .target_ids(ScoreClass::Complementary),
            },
        );
        ctx.emotional_sensory.insert(
            id,
            EmotionalEntry {
                coherence: seed,
                sensor_type: layers.emotional.sensor_type.clone(),
                detection_mode: layers.emotional.detection_mode,
                coherence_delta: layers.emotional.field_effects.coherence_delta,
            },
        );
    }

    /// Apply the interaction of `a` and `b` to the context.
    ///
    /// Three independent additive nudges (geometric, emotional,
    /// relational); results are left unclamped. A self-interaction
    /// (`a == b`) nudges the single entry once.
    pub fn update<'c>(
        &self,
        ctx: &'c mut DimensionalContext,
        a: &str,
        b: &str,
    ) -> &'c mut DimensionalContext {
        let both = [a, b];
        let pair: &[&str] = if a == b { &both[..1] } else { &both };

        if let (Some(ga), Some(gb)) = (ctx.geometric.get(a), ctx.geometric.get(b)) {
            let mut bonus = 0.0;
            if ga.symmetry == gb.symmetry {
                bonus += SYMMETRY_BONUS;
            }
            if complementary_topologies(&ga.topology, &gb.topology) {
                bonus += TOPOLOGY_BONUS;
            }
            nudge(&mut ctx.geometric, pair, bonus);
        }

        if let (Some(ea), Some(eb)) = (ctx.emotional_sensory.get(a), ctx.emotional_sensory.get(b))
        {
            let combined = ea.coherence_delta + eb.coherence_delta;
            let delta = if combined > 0.0 {
                EMOTIONAL_GAIN * combined.abs()
            } else {
                -EMOTIONAL_LOSS * combined.abs()
            };
            nudge(&mut ctx.emotional_sensory, pair, delta);
        }

        let a_favours_b = ctx
            .relational
            .get(a)
            .is_some_and(|entry| entry.affinities.iter().any(|id| id == b));
        if a_favours_b {
            nudge(&mut ctx.relational, pair, AFFINITY_BONUS);
        }

        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{pattern, store};

    fn builder(records: Vec<PatternRecord>) -> FieldContextBuilder {
        FieldContextBuilder::new(ResonanceConfig::default(), store(records))
    }

    #[test]
    fn test_build_projects_every_dimension() {
        let b = builder(vec![
            pattern("A")
                .geometry("spiral", "rotational")
                .energy(EnergyPattern::Accumulating)
                .emotion(DetectionMode::ResonanceIncrease, 0.2)
                .affinity("B", 0.9)
                .dynamics(|d| d.cycles = true)
                .build(),
            pattern("B").build(),
        ]);
        let ctx = b.build(&["A", "B", "GHOST"]);
        assert_eq!(ctx.pattern_count(), 2);
        assert_eq!(ctx.geometric["A"].topology, "spiral");
        assert_eq!(ctx.energetic["A"].energy_pattern, Some(EnergyPattern::Accumulating));
        assert!(ctx.temporal["A"].cycles);
        assert_eq!(ctx.relational["A"].affinities, vec!["B"]);
        assert!((ctx.emotional_sensory["A"].coherence_delta - 0.2).abs() < 1e-9);
        for dim in Dimension::ALL {
            assert_eq!(ctx.coherences(dim), vec![0.7, 0.7], "{dim:?}");
        }
        assert!(!ctx.geometric.contains_key("GHOST"));
    }

    #[test]
    fn test_build_empty() {
        let ctx = builder(vec![]).build(&["X"]);
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_update_geometric_stacks_bonuses() {
        let b = builder(vec![
            pattern("A").geometry("spiral", "rotational").build(),
            pattern("B").geometry("radial", "rotational").build(),
        ]);
        let mut ctx = b.build(&["A", "B"]);
        b.update(&mut ctx, "A", "B");
        assert!((ctx.geometric["A"].coherence - 0.85).abs() < 1e-9);
        assert!((ctx.geometric["B"].coherence - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_update_emotional_positive_and_negative() {
        let b = builder(vec![
            pattern("A").emotion(DetectionMode::FieldCoherence, 0.2).build(),
            pattern("B").emotion(DetectionMode::FieldCoherence, 0.1).build(),
            pattern("C").emotion(DetectionMode::FieldCoherence, -0.5).build(),
        ]);
        let mut ctx = b.build(&["A", "B", "C"]);
        b.update(&mut ctx, "A", "B");
        // +0.5 * 0.3
        assert!((ctx.emotional_sensory["A"].coherence - 0.85).abs() < 1e-9);
        assert!((ctx.emotional_sensory["B"].coherence - 0.85).abs() < 1e-9);

        b.update(&mut ctx, "B", "C");
        // -0.3 * |0.1 - 0.5|
        assert!((ctx.emotional_sensory["B"].coherence - 0.73).abs() < 1e-9);
        assert!((ctx.emotional_sensory["C"].coherence - 0.58).abs() < 1e-9);
    }

    #[test]
    fn test_update_zero_delta_no_change() {
        let b = builder(vec![pattern("A").build(), pattern("B").build()]);
        let mut ctx = b.build(&["A", "B"]);
        b.update(&mut ctx, "A", "B");
        assert!((ctx.emotional_sensory["A"].coherence - 0.7).abs() < 1e-9);
        // Matching symmetry "none" still counts
        assert!((ctx.geometric["A"].coherence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_update_relational_affinity() {
        let b = builder(vec![
            pattern("A").affinity("B", 0.9).build(),
            pattern("B").build(),
        ]);
        let mut ctx = b.build(&["A", "B"]);
        b.update(&mut ctx, "A", "B");
        assert!((ctx.relational["A"].coherence - 0.85).abs() < 1e-9);
        assert!((ctx.relational["B"].coherence - 0.85).abs() < 1e-9);

        // Reverse direction: B declares nothing toward A
        let mut ctx = b.build(&["A", "B"]);
        b.update(&mut ctx, "B", "A");
        assert!((ctx.relational["A"].coherence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_update_relational_partner_absent() {
        let b = builder(vec![pattern("A").affinity("B", 0.9).build()]);
        let mut ctx = b.build(&["A"]);
        b.update(&mut ctx, "A", "B");
        assert!((ctx.relational["A"].coherence - 0.85).abs() < 1e-9);
        assert!(!ctx.relational.contains_key("B"));
        // Geometric and emotional need both entries
        assert!((ctx.geometric["A"].coherence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_update_self_interaction_nudges_once() {
        let b = builder(vec![pattern("A")
            .geometry("spiral", "rotational")
            .emotion(DetectionMode::FieldCoherence, 0.2)
            .affinity("A", 0.9)
            .build()]);
        let mut ctx = b.build(&["A"]);
        b.update(&mut ctx, "A", "A");
        // symmetry +0.1, no topology bonus for spiral/spiral
        assert!((ctx.geometric["A"].coherence - 0.8).abs() < 1e-9);
        // +0.5 * (0.2 + 0.2)
        assert!((ctx.emotional_sensory["A"].coherence - 0.9).abs() < 1e-9);
        assert!((ctx.relational["A"].coherence - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_update_is_unbounded() {
        let b = builder(vec![
            pattern("A").emotion(DetectionMode::FieldCoherence, 2.0).build(),
            pattern("B").emotion(DetectionMode::FieldCoherence, 2.0).build(),
        ]);
        let mut ctx = b.build(&["A", "B"]);
        let updated = b.update(&mut ctx, "A", "B");
        assert!((updated.emotional_sensory["A"].coherence - 2.7).abs() < 1e-9);
        assert_eq!(updated.coherences(Dimension::Emotional), vec![2.7, 2.7]);
    }
}
