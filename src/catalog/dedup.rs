//! Identifier-based deduplication of catalog items

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::models::{Boat, BoatId};

/// Counters describing one deduplication pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupStats {
    /// Items seen
    pub input: usize,
    /// Items kept
    pub unique: usize,
    /// Items dropped for lacking an identifier
    pub missing_id: usize,
    /// Items that replaced an earlier item with the same identifier
    pub replaced: usize,
}

/// Collapse items to one per identifier
///
/// Items without an identifier are dropped. When an identifier repeats,
/// the later item replaces the earlier one but keeps its position, so the
/// output follows first-seen order.
pub fn dedupe(items: impl IntoIterator<Item = Boat>) -> Vec<Boat> {
    dedupe_with_stats(items).0
}

/// [`dedupe`], also returning what was dropped
pub fn dedupe_with_stats(items: impl IntoIterator<Item = Boat>) -> (Vec<Boat>, DedupStats) {
    let mut positions: HashMap<BoatId, usize> = HashMap::new();
    let mut unique: Vec<Boat> = Vec::new();
    let mut stats = DedupStats::default();

    for item in items {
        stats.input += 1;

        let Some(id) = item.id() else {
            stats.missing_id += 1;
            continue;
        };

        match positions.entry(id) {
            Entry::Occupied(slot) => {
                unique[*slot.get()] = item;
                stats.replaced += 1;
            }
            Entry::Vacant(slot) => {
                slot.insert(unique.len());
                unique.push(item);
            }
        }
    }

    stats.unique = unique.len();
    (unique, stats)
}
