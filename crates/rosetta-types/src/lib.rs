// ─────────────────────────────────────────────────────────────────────
// Rosetta Shape Core — Kernel Types
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! Rosetta resonance kernel: pattern records, field state, and the
//! plain result records returned by the scoring engine.

pub mod config;
pub mod error;
pub mod field;
pub mod pattern;
pub mod score;

pub use config::ResonanceConfig;
pub use error::{ResonanceError, ResonanceResult};
pub use field::{FieldGrid, FieldState};
pub use pattern::{
    BehavioralDynamics, BehavioralTrait, DetectionMode, EmergentCombination, EnergyPattern,
    PatternLayers, PatternRecord, Relationship, ResonanceMappings, ScoreClass,
};
pub use score::{
    clamp_score, CoherenceReport, CulturalExpectation, Dimension, EmergenceRecord,
    ResonanceBreakdown, ResonanceTier, ValidationRecord,
};
