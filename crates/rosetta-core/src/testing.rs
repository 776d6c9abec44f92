//! Fixture builders for pattern records used across the unit tests.

use std::sync::Arc;

use serde_json::Map;

use rosetta_types::pattern::{
    EmotionalLayer, FieldEffects, GeometricLayer, MathematicalLayer, NaturalLayer,
    SymbolicLayer,
};
use rosetta_types::{
    BehavioralDynamics, DetectionMode, EmergentCombination, EnergyPattern, PatternLayers,
    PatternRecord, Relationship, ResonanceMappings,
};

use crate::store::{PatternLookup, PatternStore};

pub(crate) struct PatternBuilder {
    record: PatternRecord,
}

/// A neutral record: linear topology, constant 1.0, no flags, no mappings.
pub(crate) fn pattern(id: &str) -> PatternBuilder {
    PatternBuilder {
        record: PatternRecord {
            pattern_id: id.to_string(),
            glyph: String::new(),
            layers: PatternLayers {
                symbolic: SymbolicLayer::default(),
                geometric: GeometricLayer {
                    topology: "linear".into(),
                    symmetry: "none".into(),
                    dimensionality: "1D".into(),
                    attributes: Map::new(),
                },
                natural: NaturalLayer::default(),
                emotional: EmotionalLayer {
                    sensor_type: "neutral".into(),
                    detection_mode: DetectionMode::Unrecognized,
                    field_effects: FieldEffects::default(),
                    attributes: Map::new(),
                },
                mathematical: MathematicalLayer {
                    primary_constant: 1.0,
                    energy_pattern: None,
                    attributes: Map::new(),
                },
                polyhedral: None,
            },
            resonance_mappings: ResonanceMappings::default(),
            behavioral_dynamics: BehavioralDynamics::default(),
            defense_protocols: None,
            audit_metadata: None,
        },
    }
}

fn relationship(id: &str, score: f64) -> Relationship {
    Relationship {
        pattern_id: id.to_string(),
        resonance_score: score,
        attributes: Map::new(),
    }
}

impl PatternBuilder {
    pub(crate) fn glyph(mut self, glyph: &str) -> Self {
        self.record.glyph = glyph.to_string();
        self
    }

    pub(crate) fn geometry(mut self, topology: &str, symmetry: &str) -> Self {
        self.record.layers.geometric.topology = topology.to_string();
        self.record.layers.geometric.symmetry = symmetry.to_string();
        self
    }

    pub(crate) fn constant(mut self, value: f64) -> Self {
        self.record.layers.mathematical.primary_constant = value;
        self
    }

    pub(crate) fn energy(mut self, energy: EnergyPattern) -> Self {
        self.record.layers.mathematical.energy_pattern = Some(energy);
        self
    }

    pub(crate) fn emotion(mut self, mode: DetectionMode, coherence_delta: f64) -> Self {
        self.record.layers.emotional.detection_mode = mode;
        self.record.layers.emotional.field_effects.coherence_delta = coherence_delta;
        self
    }

    pub(crate) fn co_occurs(mut self, ids: &[&str]) -> Self {
        self.record.layers.natural.co_occurs_with = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub(crate) fn observed(mut self, places: &[&str]) -> Self {
        self.record.layers.natural.observed_in = places.iter().map(|s| s.to_string()).collect();
        self
    }

    pub(crate) fn affinity(mut self, id: &str, score: f64) -> Self {
        self.record
            .resonance_mappings
            .strong_affinity
            .push(relationship(id, score));
        self
    }

    pub(crate) fn complementary(mut self, id: &str, score: f64) -> Self {
        self.record
            .resonance_mappings
            .complementary
            .push(relationship(id, score));
        self
    }

    pub(crate) fn interference(mut self, id: &str, score: f64) -> Self {
        self.record
            .resonance_mappings
            .interference
            .push(relationship(id, score));
        self
    }

    pub(crate) fn emergent(mut self, ids: &[&str], creates: &str, condition: &str) -> Self {
        self.record
            .resonance_mappings
            .emergent_combinations
            .push(EmergentCombination {
                pattern_ids: ids.iter().map(|s| s.to_string()).collect(),
                creates: creates.to_string(),
                emergence_condition: condition.to_string(),
                attributes: Map::new(),
            });
        self
    }

    pub(crate) fn dynamics(mut self, set: impl FnOnce(&mut BehavioralDynamics)) -> Self {
        set(&mut self.record.behavioral_dynamics);
        self
    }

    pub(crate) fn build(self) -> PatternRecord {
        self.record
    }
}

pub(crate) fn store(records: impl IntoIterator<Item = PatternRecord>) -> Arc<dyn PatternLookup> {
    match PatternStore::from_records(records) {
        Ok(store) => Arc::new(store),
        Err(e) => panic!("fixture store rejected: {e}"),
    }
}
