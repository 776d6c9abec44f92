// ─────────────────────────────────────────────────────────────────────
// Rosetta Shape Core — Pattern Store
// ─────────────────────────────────────────────────────────────────────
//! Read-only pattern table shared by every scoring component.
//!
//! Built once (from records, a JSON document, or a directory of
//! one-record-per-file JSON documents) and then handed to components
//! behind `Arc<dyn PatternLookup>`. Every record is validated on entry.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rosetta_types::{PatternRecord, ResonanceError, ResonanceResult};
use serde_json::Value;

/// Trait for pattern lookup backends.
pub trait PatternLookup: Send + Sync {
    /// Record for `pattern_id`, or `None` for an unknown reference.
    fn get(&self, pattern_id: &str) -> Option<&PatternRecord>;

    /// Record whose display glyph is `glyph`.
    fn get_by_glyph(&self, glyph: &str) -> Option<&PatternRecord>;

    fn contains(&self, pattern_id: &str) -> bool {
        self.get(pattern_id).is_some()
    }
}

/// In-memory pattern table keyed by id, with a glyph index.
#[derive(Debug, Clone, Default)]
pub struct PatternStore {
    patterns: HashMap<String, PatternRecord>,
    glyphs: HashMap<String, String>,
}

impl PatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = PatternRecord>) -> ResonanceResult<Self> {
        let mut store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Parse a JSON document holding one record or an array of records.
    pub fn from_json_str(json: &str) -> ResonanceResult<Self> {
        Self::from_records(parse_records(json)?)
    }

    /// Load every `*.json` file in `dir`, in file-name order.
    pub fn load_dir(dir: impl AsRef<Path>) -> ResonanceResult<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir)
            .map_err(|e| ResonanceError::Io(format!("{}: {e}", dir.display())))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| ResonanceError::Io(format!("{}: {e}", dir.display())))?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut store = Self::new();
        for path in &paths {
            let text = fs::read_to_string(path)
                .map_err(|e| ResonanceError::Io(format!("{}: {e}", path.display())))?;
            let records = parse_records(&text).map_err(|e| match e {
                ResonanceError::MalformedRecord(msg) => {
                    ResonanceError::MalformedRecord(format!("{}: {msg}", path.display()))
                }
                other => other,
            })?;
            for record in records {
                store.insert(record)?;
            }
        }

        log::info!(
            "Loaded {} patterns from {} files in {}",
            store.len(),
            paths.len(),
            dir.display()
        );
        Ok(store)
    }

    /// Validate and add a record. Ids must be unique.
    pub fn insert(&mut self, record: PatternRecord) -> ResonanceResult<()> {
        record.validate()?;
        if self.patterns.contains_key(&record.pattern_id) {
            return Err(ResonanceError::DuplicatePattern(record.pattern_id));
        }
        if !record.glyph.is_empty() {
            if let Some(owner) = self.glyphs.get(&record.glyph) {
                log::debug!(
                    "Glyph {} already indexed for {owner}; {} reachable by id only",
                    record.glyph,
                    record.pattern_id
                );
            } else {
                self.glyphs
                    .insert(record.glyph.clone(), record.pattern_id.clone());
            }
        }
        self.patterns.insert(record.pattern_id.clone(), record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// All pattern ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.patterns.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternRecord> {
        self.patterns.values()
    }
}

impl PatternLookup for PatternStore {
    fn get(&self, pattern_id: &str) -> Option<&PatternRecord> {
        self.patterns.get(pattern_id)
    }

    fn get_by_glyph(&self, glyph: &str) -> Option<&PatternRecord> {
        self.glyphs
            .get(glyph)
            .and_then(|id| self.patterns.get(id))
    }
}

fn parse_records(json: &str) -> ResonanceResult<Vec<PatternRecord>> {
    let malformed = |e: serde_json::Error| ResonanceError::MalformedRecord(e.to_string());
    match serde_json::from_str::<Value>(json).map_err(malformed)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(malformed))
            .collect(),
        single => Ok(vec![serde_json::from_value(single).map_err(malformed)?]),
    }
}
