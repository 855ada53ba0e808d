//! Broad-phase pair pruning.
//!
//! Sort-and-sweep over world AABBs: entries are sorted along x, then each
//! candidate only scans forward while x-intervals overlap. Deterministic
//! (index order in, sorted order out) so solver results are reproducible run
//! to run.

use crate::shape::Aabb;
use crate::world::BodyId;

pub(crate) struct BroadEntry {
    pub id: BodyId,
    pub aabb: Aabb,
    pub is_static: bool,
}

/// Produce candidate pairs whose AABBs overlap. Static-static pairs are
/// pruned; they can never produce a response.
pub(crate) fn potential_pairs(entries: &mut [BroadEntry]) -> Vec<(BodyId, BodyId)> {
    entries.sort_by(|a, b| a.aabb.min.x.total_cmp(&b.aabb.min.x));

    let mut pairs = Vec::new();
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            if entries[j].aabb.min.x > entries[i].aabb.max.x {
                break;
            }
            if entries[i].is_static && entries[j].is_static {
                continue;
            }
            if entries[i].aabb.overlaps(&entries[j].aabb) {
                pairs.push((entries[i].id, entries[j].id));
            }
        }
    }
    pairs
}
