// ─────────────────────────────────────────────────────────────────────
// Rosetta Shape Core — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all resonance kernel failures.
///
/// Scoring itself never fails: unknown references and degenerate input
/// resolve to fixed fallback values. Errors only surface at the
/// boundary (configuration, record loading, grid construction).
#[derive(Error, Debug)]
pub enum ResonanceError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// A record passed deserialization but violates a record invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// A record is missing a required field or has an ill-typed one.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// A declared relationship score lies outside its class range.
    #[error(
        "resonance score {score} for {pattern_id} -> {target} outside {class} range"
    )]
    ScoreOutOfRange {
        pattern_id: String,
        class: &'static str,
        target: String,
        score: f64,
    },

    /// Two records share the same `pattern_id`.
    #[error("duplicate pattern id: {0}")]
    DuplicatePattern(String),

    /// Pattern directory could not be read.
    #[error("io error: {0}")]
    Io(String),

    /// Geometric field rows have differing lengths.
    #[error("grid error: {0}")]
    Grid(String),
}

pub type ResonanceResult<T> = Result<T, ResonanceError>;
