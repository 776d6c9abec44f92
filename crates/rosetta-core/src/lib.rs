// ─────────────────────────────────────────────────────────────────────
// Rosetta Shape Core — Resonance Kernel
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Resonance, coherence, and emergence scoring over a read-only table
//! of multi-layer symbolic patterns.
//!
//! Every component holds the same `Arc<dyn PatternLookup>` and never
//! mutates it. Per-inquiry state (`FieldState`, `DimensionalContext`)
//! is owned by the caller.
//!
//! # Invariants
//!
//! 1. **Scores are bounded**: every resonance, dimension, and
//!    cross-dimensional score lies in [0, 1]. Dimensional context
//!    entries may drift outside that range between updates; they are
//!    clamped on aggregation.
//!
//! 2. **Unknown ids are neutral**: a pattern reference missing from
//!    the table yields the neutral resonance and is skipped by context
//!    building and emergence detection.
//!
//! 3. **Lookup is directional**: `resonance(a, b)` consults only `a`'s
//!    relationship table.

pub mod coherence;
pub mod context;
pub mod cultural;
pub mod emergence;
pub mod harmonics;
pub mod resonance;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use coherence::CoherenceEngine;
pub use context::{DimensionalContext, FieldContextBuilder};
pub use cultural::CulturalValidator;
pub use emergence::EmergenceDetector;
pub use resonance::ResonanceCalculator;
pub use store::{PatternLookup, PatternStore};
