//! Per-node bounded top-hits lists: the heuristic that lets join selection
//! inspect O(m) candidates per step instead of O(n).

use std::collections::BTreeSet;

use crate::error::{BioError, BioResult};

use super::criterion::nj_criterion;
use super::tree::{TopHit, Tree};

fn sort_and_truncate(entries: &mut Vec<TopHit>, m: usize) {
    entries.sort_by(|a, b| {
        a.criterion
            .total_cmp(&b.criterion)
            .then_with(|| a.partner.cmp(&b.partner))
    });
    entries.truncate(m);
}

fn active_entry_count(tree: &Tree, idx: usize) -> usize {
    tree.nodes[idx]
        .top_hits
        .entries
        .iter()
        .filter(|e| tree.nodes[e.partner].active)
        .count()
}

/// First entry in `idx`'s top-hits list whose partner is still active.
/// Stale (inactive-partner) entries ahead of it are skipped, not removed;
/// they are purged for real the next time the list is rebuilt.
pub fn best_active(tree: &Tree, idx: usize) -> Option<TopHit> {
    tree.nodes[idx]
        .top_hits
        .entries
        .iter()
        .find(|e| tree.nodes[e.partner].active)
        .copied()
}

/// Seed the very first top-hits lists: pick leaf 0 as a seed, score it
/// against every other leaf, keep its best `m` as its own list, then let
/// each of those `m` close nodes inherit from the seed's list (rescored
/// from its own perspective) instead of scanning all n leaves again. Every
/// other leaf is left with an empty list, refreshed lazily on first use.
pub fn top_hits_init(tree: &mut Tree) -> BioResult<()> {
    let m = tree.config.m;
    let n = tree.nodes.len();
    if n < 2 {
        return Ok(());
    }
    let seed = 0usize;

    let mut seed_scores: Vec<TopHit> = Vec::with_capacity(n - 1);
    for other in 1..n {
        let criterion = nj_criterion(tree, seed, other)?;
        seed_scores.push(TopHit {
            partner: other,
            criterion,
        });
    }
    sort_and_truncate(&mut seed_scores, m);
    tree.nodes[seed].top_hits.entries = seed_scores.clone();

    for hit in &seed_scores {
        let close = hit.partner;
        let mut pool: Vec<usize> = seed_scores
            .iter()
            .map(|h| h.partner)
            .filter(|&p| p != close)
            .collect();
        pool.push(seed);
        let mut rescored = Vec::with_capacity(pool.len());
        for p in pool {
            let criterion = nj_criterion(tree, close, p)?;
            rescored.push(TopHit {
                partner: p,
                criterion,
            });
        }
        sort_and_truncate(&mut rescored, m);
        tree.nodes[close].top_hits.entries = rescored;
    }

    Ok(())
}

/// The newly joined node's initial candidate set: the union of its two
/// children's top-hits, filtered to active nodes, rescored from the new
/// node's perspective and truncated to m.
pub fn tophits_new_node(tree: &mut Tree, new_idx: usize) -> BioResult<()> {
    let (left, right) = {
        let node = &tree.nodes[new_idx];
        let left = node.left.ok_or(BioError::InvariantViolation {
            node: new_idx,
            detail: "internal node missing left child".into(),
        })?;
        let right = node.right.ok_or(BioError::InvariantViolation {
            node: new_idx,
            detail: "internal node missing right child".into(),
        })?;
        (left, right)
    };
    let mut pool: BTreeSet<usize> = BTreeSet::new();
    for e in &tree.nodes[left].top_hits.entries {
        if tree.nodes[e.partner].active {
            pool.insert(e.partner);
        }
    }
    for e in &tree.nodes[right].top_hits.entries {
        if tree.nodes[e.partner].active {
            pool.insert(e.partner);
        }
    }
    pool.remove(&new_idx);

    let mut scored = Vec::with_capacity(pool.len());
    for p in pool {
        let criterion = nj_criterion(tree, new_idx, p)?;
        scored.push(TopHit {
            partner: p,
            criterion,
        });
    }
    sort_and_truncate(&mut scored, tree.config.m);
    tree.nodes[new_idx].top_hits.entries = scored;
    tree.nodes[new_idx].top_hits_age = 0;
    Ok(())
}

/// Seed `idx`'s top-hits list from scratch by scoring it against every
/// other active node, the same style of scan `top_hits_init` does for the
/// seed leaf. Used the first time a node with no list at all (an original
/// leaf that never inherited from the seed) is consulted — a two-hop
/// closure has nothing to expand from an empty list.
fn seed_from_scratch(tree: &mut Tree, idx: usize) -> BioResult<()> {
    let candidates = tree.active_indices();
    let mut scored = Vec::with_capacity(candidates.len());
    for p in candidates {
        if p == idx {
            continue;
        }
        let criterion = nj_criterion(tree, idx, p)?;
        scored.push(TopHit {
            partner: p,
            criterion,
        });
    }
    sort_and_truncate(&mut scored, tree.config.m);
    tree.nodes[idx].top_hits.entries = scored;
    tree.nodes[idx].top_hits_age = 0;
    log::trace!("seeded top-hits for node {idx} from scratch");
    Ok(())
}

/// Rebuild `idx`'s top-hits from the two-hop closure (its current list's
/// entries' own lists), rescored and truncated to m. Used when the list's
/// age or active-member count crosses the refresh threshold.
fn rebuild(tree: &mut Tree, idx: usize) -> BioResult<()> {
    let mut pool: BTreeSet<usize> = BTreeSet::new();
    for e in &tree.nodes[idx].top_hits.entries {
        if !tree.nodes[e.partner].active {
            continue;
        }
        pool.insert(e.partner);
        for e2 in &tree.nodes[e.partner].top_hits.entries {
            if e2.partner != idx && tree.nodes[e2.partner].active {
                pool.insert(e2.partner);
            }
        }
    }
    pool.remove(&idx);

    let mut scored = Vec::with_capacity(pool.len());
    for p in pool {
        let criterion = nj_criterion(tree, idx, p)?;
        scored.push(TopHit {
            partner: p,
            criterion,
        });
    }
    sort_and_truncate(&mut scored, tree.config.m);
    tree.nodes[idx].top_hits.entries = scored;
    tree.nodes[idx].top_hits_age = 0;
    log::trace!("rebuilt top-hits for node {idx}");
    Ok(())
}

/// Consult `idx`'s top-hits list, refreshing it first if its age exceeds
/// 0.8*m or fewer than 0.8*m of its entries are still active. A node whose
/// list has never been populated (spec's "first top-hits refresh on
/// demand") is seeded from scratch rather than two-hop-closure-rebuilt,
/// since there is nothing to expand from an empty list.
pub fn ensure_fresh(tree: &mut Tree, idx: usize) -> BioResult<()> {
    if tree.nodes[idx].top_hits.is_empty() {
        return seed_from_scratch(tree, idx);
    }
    let m = tree.config.m;
    let age_threshold = (0.8 * m as f64).ceil() as u32;
    let active_threshold = 0.8 * m as f64;
    let active_count = active_entry_count(tree, idx);
    let needs_refresh =
        tree.nodes[idx].top_hits_age > age_threshold || (active_count as f64) < active_threshold;
    if needs_refresh {
        rebuild(tree, idx)?;
    }
    Ok(())
}

/// Bump the age of every active node whose top-hits list references
/// either of the two nodes that were just joined (age tracks how stale a
/// list might be, not how stale an individual entry is).
pub fn bump_age_on_join(tree: &mut Tree, joined_i: usize, joined_j: usize) {
    for idx in 0..tree.nodes.len() {
        if !tree.nodes[idx].active {
            continue;
        }
        let touched = tree.nodes[idx]
            .top_hits
            .entries
            .iter()
            .any(|e| e.partner == joined_i || e.partner == joined_j);
        if touched {
            tree.nodes[idx].top_hits_age += 1;
        }
    }
}
