// ─────────────────────────────────────────────────────────────────────
// Rosetta Shape Core — Harmonic Constants
// ─────────────────────────────────────────────────────────────────────
//! Canonical natural constants and ratio recognisers shared by the
//! resonance calculator and the coherence engine.

use std::f64::consts::{E, PI, SQRT_2};

/// Golden ratio φ.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Golden angle in radians (≈ 137.5°), the optimal divergence angle.
pub const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Anchors for the natural-ratio recogniser.
pub const NATURAL_CONSTANTS: [f64; 5] = [PHI, PI, E, SQRT_2, GOLDEN_ANGLE];

/// Multiples under which a natural constant still counts as recognised.
pub const CONSTANT_FACTORS: [f64; 6] = [2.0, 3.0, 4.0, 0.5, 0.333, 0.25];

/// Harmonic ratios for mathematical harmony with their match tolerances.
/// Irrational composites get the looser 0.02 window.
pub const HARMONIC_RATIOS: [(f64, f64); 10] = [
    (PHI, 0.01),
    (PI, 0.01),
    (PI / PHI, 0.02),
    (E, 0.01),
    (PHI * PHI, 0.02),
    (2.0, 0.01),
    (1.5, 0.01),
    (4.0 / 3.0, 0.01),
    (SQRT_2, 0.01),
    (1.0, 0.01),
];

const NATURAL_TOLERANCE: f64 = 0.05;
const FRACTION_TOLERANCE: f64 = 0.02;
const MAX_FRACTION_TERM: u32 = 7;

/// True if `value` lies within `tolerance` of some p/q with p, q ∈ [1, 7].
pub fn near_simple_fraction(value: f64, tolerance: f64) -> bool {
    (1..=MAX_FRACTION_TERM).any(|p| {
        (1..=MAX_FRACTION_TERM).any(|q| (value - f64::from(p) / f64::from(q)).abs() < tolerance)
    })
}

/// Confidence that `value` is a natural ratio.
///
/// - 1.0: `value` or its reciprocal is near φ, π, e, √2 or the golden angle
/// - 0.8: near one of those constants scaled by a small factor
/// - 0.6: near a simple fraction p/q
/// - 0.3: otherwise (including non-finite input)
pub fn natural_ratio_score(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.3;
    }
    let near = |x: f64, c: f64| (x - c).abs() < NATURAL_TOLERANCE;
    let reciprocal = (value != 0.0).then(|| 1.0 / value);

    if NATURAL_CONSTANTS
        .iter()
        .any(|&c| near(value, c) || reciprocal.is_some_and(|r| near(r, c)))
    {
        return 1.0;
    }
    if NATURAL_CONSTANTS
        .iter()
        .any(|&c| CONSTANT_FACTORS.iter().any(|&f| near(value, c * f)))
    {
        return 0.8;
    }
    if near_simple_fraction(value, FRACTION_TOLERANCE) {
        return 0.6;
    }
    0.3
}

/// Whether `natural_ratio_score` recognised the value at all.
pub fn is_natural_ratio(value: f64) -> bool {
    natural_ratio_score(value) > 0.3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phi_and_reciprocal() {
        assert_eq!(natural_ratio_score(PHI), 1.0);
        assert_eq!(natural_ratio_score(1.0 / PHI), 1.0);
        assert_eq!(natural_ratio_score(1.0 / PI), 1.0);
    }

    #[test]
    fn test_sqrt2_and_golden_angle_anchors() {
        assert_eq!(natural_ratio_score(SQRT_2), 1.0);
        assert_eq!(natural_ratio_score(GOLDEN_ANGLE), 1.0);
        // 1/GA ≈ 0.4167 sits below every anchor; only the reciprocal matches
        assert_eq!(natural_ratio_score(1.0 / GOLDEN_ANGLE), 1.0);
    }

    #[test]
    fn test_scaled_constant() {
        // 2e ≈ 5.4366, far from any unscaled constant or fraction
        assert_eq!(natural_ratio_score(2.0 * E), 0.8);
    }

    #[test]
    fn test_simple_fraction() {
        // 3/1: clear of π, 2√2 and 2φ by more than the 0.05 window
        assert_eq!(natural_ratio_score(3.0), 0.6);
    }

    #[test]
    fn test_unrecognised() {
        assert_eq!(natural_ratio_score(50.0), 0.3);
        assert_eq!(natural_ratio_score(0.0), 0.3);
        assert_eq!(natural_ratio_score(f64::NAN), 0.3);
        assert!(!is_natural_ratio(0.0));
    }

    #[test]
    fn test_simple_fraction_grid() {
        assert!(near_simple_fraction(1.5, 0.01));
        assert!(near_simple_fraction(6.995, 0.01));
        assert!(!near_simple_fraction(7.5, 0.01));
    }
}
