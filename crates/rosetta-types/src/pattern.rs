// ─────────────────────────────────────────────────────────────────────
// Rosetta Shape Core — Pattern Records
// ─────────────────────────────────────────────────────────────────────
//! Typed pattern records.
//!
//! Each layer carries the fields the scoring engine reads as named,
//! typed members. Every other layer attribute is kept verbatim in a
//! flattened `attributes` map so records round-trip without loss.
//! A record missing a consumed field fails at deserialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ResonanceError, ResonanceResult};

/// A named symbolic concept with five (optionally six) parallel layers.
///
/// Immutable reference data: created at load time, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub pattern_id: String,
    /// Display symbol. Used for lookup only.
    #[serde(default)]
    pub glyph: String,
    pub layers: PatternLayers,
    pub resonance_mappings: ResonanceMappings,
    pub behavioral_dynamics: BehavioralDynamics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense_protocols: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternLayers {
    pub symbolic: SymbolicLayer,
    pub geometric: GeometricLayer,
    pub natural: NaturalLayer,
    pub emotional: EmotionalLayer,
    pub mathematical: MathematicalLayer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polyhedral: Option<PolyhedralLayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolicLayer {
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometricLayer {
    pub topology: String,
    pub symmetry: String,
    #[serde(default)]
    pub dimensionality: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NaturalLayer {
    /// Pattern ids this concept is observed alongside.
    #[serde(default)]
    pub co_occurs_with: Vec<String>,
    /// Places or phenomena where this concept is observed.
    #[serde(default)]
    pub observed_in: Vec<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalLayer {
    pub sensor_type: String,
    pub detection_mode: DetectionMode,
    #[serde(default)]
    pub field_effects: FieldEffects,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldEffects {
    /// Signed push this pattern applies to emotional coherence.
    #[serde(default)]
    pub coherence_delta: f64,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// How an emotional sensor reads its signature value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    ResonanceIncrease,
    ResonanceDecrease,
    InterferencePattern,
    FieldCoherence,
    MissingData,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathematicalLayer {
    pub primary_constant: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_pattern: Option<EnergyPattern>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Expected shape of a pattern's share of the energy distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyPattern {
    Accumulating,
    Dissipating,
    Oscillating,
    Conserved,
    Transforming,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolyhedralLayer {
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Relationship classes with explicitly authored scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreClass {
    StrongAffinity,
    Complementary,
    Interference,
}

impl ScoreClass {
    /// Lookup precedence of the explicit tiers.
    pub const PRECEDENCE: [ScoreClass; 3] = [
        ScoreClass::StrongAffinity,
        ScoreClass::Complementary,
        ScoreClass::Interference,
    ];

    /// Inclusive score range a declaration of this class must lie in.
    pub fn range(self) -> (f64, f64) {
        match self {
            ScoreClass::StrongAffinity => (0.8, 1.0),
            ScoreClass::Complementary => (0.6, 0.8),
            ScoreClass::Interference => (0.0, 0.4),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScoreClass::StrongAffinity => "strong_affinity",
            ScoreClass::Complementary => "complementary",
            ScoreClass::Interference => "interference",
        }
    }
}

/// A declared relationship to another pattern (weak reference by id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub pattern_id: String,
    pub resonance_score: f64,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// A set of patterns whose co-activation creates a new pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergentCombination {
    pub pattern_ids: Vec<String>,
    #[serde(alias = "new_pattern")]
    pub creates: String,
    #[serde(default, alias = "condition")]
    pub emergence_condition: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResonanceMappings {
    #[serde(default)]
    pub strong_affinity: Vec<Relationship>,
    #[serde(default)]
    pub complementary: Vec<Relationship>,
    #[serde(default)]
    pub interference: Vec<Relationship>,
    #[serde(default)]
    pub emergent_combinations: Vec<EmergentCombination>,
}

impl ResonanceMappings {
    pub fn entries(&self, class: ScoreClass) -> &[Relationship] {
        match class {
            ScoreClass::StrongAffinity => &self.strong_affinity,
            ScoreClass::Complementary => &self.complementary,
            ScoreClass::Interference => &self.interference,
        }
    }

    /// First entry of `class` that targets `pattern_id`.
    pub fn find(&self, class: ScoreClass, pattern_id: &str) -> Option<&Relationship> {
        self.entries(class).iter().find(|r| r.pattern_id == pattern_id)
    }

    /// Target ids of `class`, in declaration order.
    pub fn target_ids(&self, class: ScoreClass) -> Vec<String> {
        self.entries(class)
            .iter()
            .map(|r| r.pattern_id.clone())
            .collect()
    }
}

/// Behavioral flags of a pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehavioralDynamics {
    #[serde(default)]
    pub initiates: bool,
    #[serde(default)]
    pub stabilizes: bool,
    #[serde(default)]
    pub transforms: bool,
    #[serde(default)]
    pub connects: bool,
    #[serde(default)]
    pub cycles: bool,
    #[serde(default)]
    pub amplifies: bool,
    #[serde(default)]
    pub dampens: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehavioralTrait {
    Initiates,
    Stabilizes,
    Transforms,
    Connects,
    Cycles,
    Amplifies,
    Dampens,
}

impl BehavioralDynamics {
    pub fn has(&self, t: BehavioralTrait) -> bool {
        match t {
            BehavioralTrait::Initiates => self.initiates,
            BehavioralTrait::Stabilizes => self.stabilizes,
            BehavioralTrait::Transforms => self.transforms,
            BehavioralTrait::Connects => self.connects,
            BehavioralTrait::Cycles => self.cycles,
            BehavioralTrait::Amplifies => self.amplifies,
            BehavioralTrait::Dampens => self.dampens,
        }
    }
}

impl PatternRecord {
    /// Parse a single record, reporting missing or ill-typed fields.
    pub fn from_json(json: &str) -> ResonanceResult<Self> {
        serde_json::from_str(json).map_err(|e| ResonanceError::MalformedRecord(e.to_string()))
    }

    /// Check record invariants that the type system cannot express.
    pub fn validate(&self) -> ResonanceResult<()> {
        if self.pattern_id.trim().is_empty() {
            return Err(ResonanceError::Validation(
                "pattern_id must not be empty".to_string(),
            ));
        }
        if !self.layers.mathematical.primary_constant.is_finite() {
            return Err(ResonanceError::Validation(format!(
                "{}: primary_constant must be finite",
                self.pattern_id
            )));
        }

        for class in ScoreClass::PRECEDENCE {
            let (lo, hi) = class.range();
            for rel in self.resonance_mappings.entries(class) {
                if !(lo..=hi).contains(&rel.resonance_score) {
                    return Err(ResonanceError::ScoreOutOfRange {
                        pattern_id: self.pattern_id.clone(),
                        class: class.name(),
                        target: rel.pattern_id.clone(),
                        score: rel.resonance_score,
                    });
                }
            }
        }

        for combo in &self.resonance_mappings.emergent_combinations {
            if combo.pattern_ids.is_empty() || combo.creates.trim().is_empty() {
                return Err(ResonanceError::Validation(format!(
                    "{}: emergent combination needs pattern_ids and a created pattern",
                    self.pattern_id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "pattern_id": "GEOMETRY:SPIRAL",
        "glyph": "🌀",
        "layers": {
            "symbolic": {"meaning": "growth"},
            "geometric": {"topology": "spiral", "symmetry": "rotational", "dimensionality": "2D"},
            "natural": {"co_occurs_with": ["LIFE:SHELL"], "observed_in": ["nautilus", "galaxy"]},
            "emotional": {
                "sensor_type": "awe",
                "detection_mode": "resonance_increase",
                "field_effects": {"coherence_delta": 0.2}
            },
            "mathematical": {"primary_constant": 1.618033988749, "energy_pattern": "accumulating"},
            "polyhedral": {"solid": "dodecahedron"}
        },
        "resonance_mappings": {
            "strong_affinity": [{"pattern_id": "LIFE:SHELL", "resonance_score": 0.92}],
            "emergent_combinations": [
                {"pattern_ids": ["GEOMETRY:SPIRAL", "LIFE:SHELL"], "creates": "PATTERN:GROWTH",
                 "emergence_condition": "both active"}
            ]
        },
        "behavioral_dynamics": {"initiates": true, "cycles": true}
    }"#;

    #[test]
    fn test_parse_full_record() {
        let rec = PatternRecord::from_json(RECORD).unwrap();
        assert_eq!(rec.pattern_id, "GEOMETRY:SPIRAL");
        assert_eq!(rec.layers.geometric.topology, "spiral");
        assert_eq!(rec.layers.emotional.detection_mode, DetectionMode::ResonanceIncrease);
        assert_eq!(
            rec.layers.mathematical.energy_pattern,
            Some(EnergyPattern::Accumulating)
        );
        assert!(rec.layers.polyhedral.is_some());
        assert!(rec.behavioral_dynamics.initiates);
        assert!(!rec.behavioral_dynamics.dampens);
        assert_eq!(
            rec.layers.symbolic.attributes.get("meaning"),
            Some(&Value::String("growth".into()))
        );
        assert!(rec.validate().is_ok());
    }

    #[test]
    fn test_missing_required_layer_is_malformed() {
        let broken = RECORD.replace("\"mathematical\"", "\"arithmetic\"");
        let err = PatternRecord::from_json(&broken).unwrap_err();
        assert!(matches!(err, ResonanceError::MalformedRecord(_)));
        assert!(err.to_string().contains("mathematical"));
    }

    #[test]
    fn test_unknown_modes_are_tolerated() {
        let odd = RECORD
            .replace("resonance_increase", "telepathy")
            .replace("accumulating", "spiralling");
        let rec = PatternRecord::from_json(&odd).unwrap();
        assert_eq!(rec.layers.emotional.detection_mode, DetectionMode::Unrecognized);
        assert_eq!(
            rec.layers.mathematical.energy_pattern,
            Some(EnergyPattern::Unrecognized)
        );
    }

    #[test]
    fn test_score_out_of_class_range() {
        let bad = RECORD.replace("0.92", "0.5");
        let rec = PatternRecord::from_json(&bad).unwrap();
        match rec.validate() {
            Err(ResonanceError::ScoreOutOfRange { class, score, .. }) => {
                assert_eq!(class, "strong_affinity");
                assert!((score - 0.5).abs() < 1e-9);
            }
            other => panic!("expected ScoreOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_find_relationship() {
        let rec = PatternRecord::from_json(RECORD).unwrap();
        let m = &rec.resonance_mappings;
        assert!(m.find(ScoreClass::StrongAffinity, "LIFE:SHELL").is_some());
        assert!(m.find(ScoreClass::Complementary, "LIFE:SHELL").is_none());
        assert_eq!(m.target_ids(ScoreClass::StrongAffinity), vec!["LIFE:SHELL"]);
    }

    #[test]
    fn test_condition_alias() {
        let json = r#"{"pattern_ids": ["A"], "new_pattern": "B", "condition": "when A"}"#;
        let combo: EmergentCombination = serde_json::from_str(json).unwrap();
        assert_eq!(combo.creates, "B");
        assert_eq!(combo.emergence_condition, "when A");
    }
}
