// ─────────────────────────────────────────────────────────────────────
// Rosetta Shape Core — Emergence Detector
// ─────────────────────────────────────────────────────────────────────
//! Finds declared emergent combinations whose required patterns are
//! all present in the active set.

use std::collections::HashSet;
use std::sync::Arc;

use rosetta_types::EmergenceRecord;

use crate::store::PatternLookup;

pub struct EmergenceDetector {
    store: Arc<dyn PatternLookup>,
}

impl EmergenceDetector {
    pub fn new(store: Arc<dyn PatternLookup>) -> Self {
        Self { store }
    }

    /// Every emergent combination declared by an active pattern whose
    /// required ids are all active.
    ///
    /// Records follow the order of `active`, then declaration order.
    /// A combination declared by several active patterns fires once
    /// per declaring pattern.
    pub fn detect(&self, active: &[&str]) -> Vec<EmergenceRecord> {
        let active_set: HashSet<&str> = active.iter().copied().collect();
        let mut seen = HashSet::with_capacity(active.len());
        let mut fired = Vec::new();

        for id in active {
            if !seen.insert(*id) {
                continue;
            }
            let Some(pattern) = self.store.get(id) else {
                continue;
            };
            for combo in &pattern.resonance_mappings.emergent_combinations {
                if combo
                    .pattern_ids
                    .iter()
                    .all(|required| active_set.contains(required.as_str()))
                {
                    log::debug!("{id} fires emergent {}", combo.creates);
                    fired.push(EmergenceRecord {
                        declared_by: pattern.pattern_id.clone(),
                        source_patterns: combo.pattern_ids.clone(),
                        creates: combo.creates.clone(),
                        condition: combo.emergence_condition.clone(),
                    });
                }
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{pattern, store};

    const TRIAD: [&str; 3] = ["GEOMETRY:SPIRAL", "LIFE:TREE", "ELEMENT:WATER"];

    fn detector(declare_twice: bool) -> EmergenceDetector {
        let spiral = pattern(TRIAD[0]).emergent(&TRIAD, "PATTERN:EVOLUTION", "sustained co-activation");
        let mut tree = pattern(TRIAD[1]);
        if declare_twice {
            tree = tree.emergent(&TRIAD, "PATTERN:EVOLUTION", "sustained co-activation");
        }
        EmergenceDetector::new(store([spiral.build(), tree.build(), pattern(TRIAD[2]).build()]))
    }

    #[test]
    fn test_full_triad_fires() {
        let fired = detector(false).detect(&TRIAD);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].creates, "PATTERN:EVOLUTION");
        assert_eq!(fired[0].declared_by, "GEOMETRY:SPIRAL");
        assert_eq!(fired[0].source_patterns, TRIAD.to_vec());
        assert_eq!(fired[0].condition, "sustained co-activation");
    }

    #[test]
    fn test_partial_set_does_not_fire() {
        assert!(detector(false).detect(&TRIAD[..2]).is_empty());
        assert!(detector(false).detect(&[]).is_empty());
    }

    #[test]
    fn test_extra_and_unknown_ids_tolerated() {
        let fired = detector(false).detect(&["GHOST", TRIAD[2], TRIAD[1], TRIAD[0], "LIFE:BEE"]);
        assert_eq!(fired.len(), 1);
    }

    #[test]
    fn test_each_declaring_pattern_fires() {
        let fired = detector(true).detect(&TRIAD);
        assert_eq!(fired.len(), 2);
        assert_eq!(fired[0].declared_by, TRIAD[0]);
        assert_eq!(fired[1].declared_by, TRIAD[1]);
    }

    #[test]
    fn test_repeated_active_id_fires_once() {
        let fired = detector(false).detect(&[TRIAD[0], TRIAD[0], TRIAD[1], TRIAD[2]]);
        assert_eq!(fired.len(), 1);
    }
}
