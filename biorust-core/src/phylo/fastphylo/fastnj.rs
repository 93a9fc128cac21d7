//! FastNJ best-hit cache: one pointer per node to its currently best-known
//! join partner, lazily revalidated against the top-hits heuristic.

use crate::error::BioResult;

use super::tophits;
use super::tree::Tree;

/// Seed every active node's best-join pointer from its (already populated)
/// top-hits list.
pub fn fastnj_init(tree: &mut Tree) -> BioResult<()> {
    for idx in tree.active_indices() {
        fastnj_update(tree, idx)?;
    }
    Ok(())
}

/// Re-elect `idx`'s best-join pointer. Refreshes the top-hits list first
/// if it is due; if the list comes back empty, the heuristic path for this
/// node is exhausted and the caller must fall back to a brute-force scan
/// (`false` is returned rather than an error, since this is an expected,
/// recoverable condition per the engine's heuristic-exhausted policy).
pub fn fastnj_update(tree: &mut Tree, idx: usize) -> BioResult<bool> {
    tophits::ensure_fresh(tree, idx)?;
    match tophits::best_active(tree, idx) {
        Some(hit) => {
            tree.nodes[idx].best_join = Some((hit.criterion, hit.partner));
            Ok(true)
        }
        None => {
            tree.nodes[idx].best_join = None;
            Ok(false)
        }
    }
}

/// Whether `idx`'s current best-join pointer still targets an active node.
pub fn is_best_join_stale(tree: &Tree, idx: usize) -> bool {
    match tree.nodes[idx].best_join {
        Some((_, partner)) => !tree.nodes[partner].active,
        None => true,
    }
}
