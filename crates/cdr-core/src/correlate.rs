//! Leg correlation - folds transferred call legs into one logical call
//!
//! A transferred call is stored as two rows: the A-leg, which names its
//! transfer target in `bleg_uuid`, and the B-leg, which holds the real
//! connected time. Correlation emits one record per call, taking duration and
//! billing from the B-leg and suppressing the B-leg from standalone output.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::{CallLegRecord, CorrelatedRecord};

/// Correlate a batch of call legs into the externally visible call list.
///
/// Every input row contributes to exactly one output record. The batch is
/// processed in ascending `id` order so the result does not depend on the
/// order rows arrive in; duplicated leg uuids resolve to the lowest id.
///
/// Output is sorted by `start_stamp` descending, ties by ascending `id`.
pub fn correlate(records: &[CallLegRecord]) -> Vec<CorrelatedRecord> {
    let mut ordered: Vec<&CallLegRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.id);

    // Leg uuid -> position; blank uuids never participate, first occurrence wins
    let mut by_uuid: HashMap<String, usize> = HashMap::with_capacity(ordered.len());
    for (idx, record) in ordered.iter().enumerate() {
        if let Some(key) = record.leg_key() {
            by_uuid.entry(key).or_insert(idx);
        }
    }

    let mut processed = vec![false; ordered.len()];
    let mut consumed = vec![false; ordered.len()];
    let mut peer_of: Vec<Option<usize>> = vec![None; ordered.len()];

    for idx in 0..ordered.len() {
        if processed[idx] {
            continue;
        }
        let Some(peer_key) = ordered[idx].peer_key() else {
            continue;
        };

        // Self-references and dangling references fall through to standalone
        if let Some(&peer) = by_uuid.get(&peer_key) {
            if peer != idx && !processed[peer] {
                peer_of[idx] = Some(peer);
                processed[idx] = true;
                processed[peer] = true;
                consumed[peer] = true;
            }
        }
    }

    let mut output: Vec<CorrelatedRecord> = ordered
        .iter()
        .enumerate()
        .filter(|(idx, _)| !consumed[*idx])
        .map(|(idx, record)| match peer_of[idx] {
            Some(peer) => CorrelatedRecord::paired(record, ordered[peer]),
            None => CorrelatedRecord::standalone(record),
        })
        .collect();

    output.sort_by(display_order);
    output
}

/// Newest first, then by id
fn display_order(a: &CorrelatedRecord, b: &CorrelatedRecord) -> Ordering {
    b.start_stamp
        .cmp(&a.start_stamp)
        .then_with(|| a.id.cmp(&b.id))
}
