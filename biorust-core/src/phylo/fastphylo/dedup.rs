//! Sequence uniquification: a reference implementation of the dedup
//! contract the engine expects its caller to have already applied.
//!
//! The engine itself never calls this; spec says deduplication is an
//! external collaborator's job (pre-step contract). This module exists so
//! a caller that hasn't already deduplicated has a ready, tested
//! implementation of that contract to reach for, grounded on the
//! `uniquify_sequences` step of the original FastTree driver.

use std::collections::HashMap;

/// Collapse exact-duplicate sequences, preserving first-occurrence order.
/// For each surviving (unique) sequence, returns its representative
/// `(name, sequence)` plus the names of any other inputs that carried an
/// identical sequence (excluding the representative's own name).
pub fn uniquify(input: &[(String, String)]) -> (Vec<(String, String)>, Vec<Vec<String>>) {
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut uniques: Vec<(String, String)> = Vec::new();
    let mut duplicates: Vec<Vec<String>> = Vec::new();

    for (name, seq) in input {
        match first_seen.get(seq) {
            Some(&pos) => duplicates[pos].push(name.clone()),
            None => {
                first_seen.insert(seq.clone(), uniques.len());
                uniques.push((name.clone(), seq.clone()));
                duplicates.push(Vec::new());
            }
        }
    }

    (uniques, duplicates)
}
