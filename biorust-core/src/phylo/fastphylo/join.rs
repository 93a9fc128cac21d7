//! Candidate assembly, local hill-climbing, and join creation: the engine
//! that drives `create_initial_topology`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{BioError, BioResult};

use super::criterion::nj_criterion;
use super::fastnj;
use super::tophits;
use super::tree::Tree;

/// A candidate join on the priority queue, ordered so `BinaryHeap` (a
/// max-heap) pops the lowest criterion first, ties broken by the lower
/// (first_index, second_index) pair, per the engine's determinism
/// requirement.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    criterion: f64,
    i: usize,
    j: usize,
}
impl Eq for Candidate {}
impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .criterion
            .total_cmp(&self.criterion)
            .then_with(|| other.i.cmp(&self.i))
            .then_with(|| other.j.cmp(&self.j))
    }
}

/// Compare two (criterion, i, j) keys; `true` if `a` is strictly better
/// (lower criterion, or tied and lexicographically earlier indices).
fn is_better(a: (f64, usize, usize), b: (f64, usize, usize)) -> bool {
    match a.0.total_cmp(&b.0) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => (a.1, a.2) < (b.1, b.2),
    }
}

fn ordered_pair(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Brute-force fallback: minimize the NJ criterion over every active pair.
/// Used when a node's heuristic path (top-hits + FastNJ) is exhausted.
pub fn minimize_nj_criterion(tree: &Tree) -> BioResult<(usize, usize)> {
    let active = tree.active_indices();
    if active.len() < 2 {
        return Err(BioError::InvariantViolation {
            node: active.first().copied().unwrap_or(0),
            detail: "fewer than two active nodes remain to join".into(),
        });
    }
    let mut best: Option<(f64, usize, usize)> = None;
    for (ai, &i) in active.iter().enumerate() {
        for &j in &active[ai + 1..] {
            let criterion = nj_criterion(tree, i, j)?;
            let (a, b) = ordered_pair(i, j);
            if best.map_or(true, |b_| is_better((criterion, a, b), b_)) {
                best = Some((criterion, a, b));
            }
        }
    }
    let (_, i, j) = best.expect("checked active.len() >= 2 above");
    Ok((i, j))
}

/// At most two hops of local hill-climbing around a candidate join
/// `(i, j)`: score each of `i`'s top-hits as a partner for `j` (and vice
/// versa), adopting any strict improvement, until a local minimum is
/// reached or the hop cap is hit.
fn local_hill_climb(tree: &mut Tree, start: (f64, usize, usize)) -> BioResult<(usize, usize)> {
    const MAX_HOPS: usize = 2;
    let mut best = start;

    for _ in 0..MAX_HOPS {
        let (_, i, j) = best;
        tophits::ensure_fresh(tree, i)?;
        tophits::ensure_fresh(tree, j)?;
        let mut improved = false;

        let i_candidates: Vec<usize> = tree.nodes[i]
            .top_hits
            .entries
            .iter()
            .map(|e| e.partner)
            .collect();
        for partner in i_candidates {
            if partner == j || !tree.nodes[partner].active {
                continue;
            }
            let criterion = nj_criterion(tree, j, partner)?;
            let (a, b) = ordered_pair(j, partner);
            if is_better((criterion, a, b), best) {
                best = (criterion, a, b);
                improved = true;
            }
        }

        let (_, i, j) = best;
        let j_candidates: Vec<usize> = tree.nodes[j]
            .top_hits
            .entries
            .iter()
            .map(|e| e.partner)
            .collect();
        for partner in j_candidates {
            if partner == i || !tree.nodes[partner].active {
                continue;
            }
            let criterion = nj_criterion(tree, i, partner)?;
            let (a, b) = ordered_pair(i, partner);
            if is_better((criterion, a, b), best) {
                best = (criterion, a, b);
                improved = true;
            }
        }

        if !improved {
            break;
        }
    }

    Ok((best.1, best.2))
}

/// Materialize the join of `i` and `j`: BIONJ lambda stays at its safe
/// default (see DESIGN.md), the averaged profile is built, T and the
/// up-distance sum are maintained, and the new node's top-hits/FastNJ
/// state is seeded.
fn create_join(tree: &mut Tree, i: usize, j: usize) -> BioResult<usize> {
    let new_idx = tree.commit_join(i, j)?;
    tophits::bump_age_on_join(tree, i, j);
    tophits::tophits_new_node(tree, new_idx)?;
    if !tree.nodes[new_idx].top_hits.is_empty() {
        fastnj::fastnj_update(tree, new_idx)?;
    }
    Ok(new_idx)
}

/// Run n0-1 joins, using the top-hits/FastNJ heuristic with a
/// brute-force fallback, to collapse every leaf into a single binary
/// topology.
pub fn create_initial_topology(tree: &mut Tree) -> BioResult<()> {
    let n0 = tree.nodes.len();
    for _ in 0..n0.saturating_sub(1) {
        if tree.active_count <= 1 {
            break;
        }

        let mut heap: BinaryHeap<Candidate> = BinaryHeap::new();
        let mut fallback: Option<(usize, usize)> = None;

        for idx in tree.active_indices() {
            if fastnj::is_best_join_stale(tree, idx) {
                let found = fastnj::fastnj_update(tree, idx)?;
                if !found {
                    fallback = Some(minimize_nj_criterion(tree)?);
                    break;
                }
            }
            let (criterion, partner) = tree.nodes[idx]
                .best_join
                .expect("fastnj_update populates best_join when it returns true");
            let (a, b) = ordered_pair(idx, partner);
            heap.push(Candidate {
                criterion,
                i: a,
                j: b,
            });
        }

        let (i, j) = if let Some(pair) = fallback {
            pair
        } else {
            let mut best: Option<(f64, usize, usize)> = None;
            for _ in 0..tree.config.m {
                let Some(candidate) = heap.pop() else {
                    break;
                };
                if !tree.nodes[candidate.i].active || !tree.nodes[candidate.j].active {
                    continue;
                }
                let criterion = nj_criterion(tree, candidate.i, candidate.j)?;
                let key = (criterion, candidate.i, candidate.j);
                if best.map_or(true, |b| is_better(key, b)) {
                    best = Some(key);
                }
            }
            match best {
                Some(b) => local_hill_climb(tree, b)?,
                // No active candidate survived re-scoring; brute force.
                None => minimize_nj_criterion(tree)?,
            }
        };

        if tree.config.verbose > 0 {
            log::debug!(
                "join {} + {} -> node {} ({} active remaining)",
                i,
                j,
                tree.nodes.len(),
                tree.active_count - 1
            );
        }
        create_join(tree, i, j)?;
    }
    Ok(())
}
