// ─────────────────────────────────────────────────────────────────────
// Rosetta Shape Core — Field State
// ─────────────────────────────────────────────────────────────────────
//! Ephemeral per-inquiry snapshot consumed by the coherence engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ResonanceError, ResonanceResult};
use crate::score::CoherenceReport;

/// Rectangular 2-D sample grid, stored row-major.
///
/// Serialized as nested rows. Ragged rows are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct FieldGrid {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl FieldGrid {
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> ResonanceResult<Self> {
        if rows * cols != values.len() {
            return Err(ResonanceError::Grid(format!(
                "{rows}x{cols} grid needs {} values, got {}",
                rows * cols,
                values.len()
            )));
        }
        Ok(Self { rows, cols, values })
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> ResonanceResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(ResonanceError::Grid(format!(
                "row {bad} has {} values, expected {cols}",
                rows[bad].len()
            )));
        }
        let n_rows = if cols == 0 { 0 } else { rows.len() };
        let values = rows.into_iter().flatten().collect();
        Self::new(n_rows, cols, values)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }
}

impl TryFrom<Vec<Vec<f64>>> for FieldGrid {
    type Error = ResonanceError;

    fn try_from(rows: Vec<Vec<f64>>) -> ResonanceResult<Self> {
        Self::from_rows(rows)
    }
}

impl From<FieldGrid> for Vec<Vec<f64>> {
    fn from(grid: FieldGrid) -> Self {
        if grid.cols == 0 {
            return Vec::new();
        }
        grid.values.chunks(grid.cols).map(<[f64]>::to_vec).collect()
    }
}

/// Numeric/graph snapshot produced by one inquiry.
///
/// Owned by the caller and discarded after a single computation.
/// `coherence_metrics` is written by the coherence engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldState {
    pub geometric_field: FieldGrid,
    /// pattern_id → share of field energy, read as [0, 1].
    pub energy_distribution: BTreeMap<String, f64>,
    /// Phase in [0, 1).
    pub temporal_phase: f64,
    /// Directed adjacency; successors may be dangling references.
    pub relational_graph: BTreeMap<String, Vec<String>>,
    /// pattern_id → emotional signature, read as [0, 1].
    pub emotional_signatures: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coherence_metrics: Option<CoherenceReport>,
}

impl FieldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid(mut self, grid: FieldGrid) -> Self {
        self.geometric_field = grid;
        self
    }

    pub fn with_energy(mut self, pattern_id: &str, value: f64) -> Self {
        self.energy_distribution.insert(pattern_id.to_string(), value);
        self
    }

    pub fn with_emotion(mut self, pattern_id: &str, value: f64) -> Self {
        self.emotional_signatures.insert(pattern_id.to_string(), value);
        self
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.temporal_phase = phase;
        self
    }

    pub fn with_edge(mut self, from: &str, to: &str) -> Self {
        self.relational_graph
            .entry(from.to_string())
            .or_default()
            .push(to.to_string());
        self
    }
}
