//! Out-distance and the neighbor-joining criterion used to rank joins.

use crate::error::BioResult;

use super::profile;
use super::tree::Tree;

/// `du(i, j) = Delta(i, j) - u(i) - u(j)` for two existing (already
/// materialized) active nodes. `u` collapses to 0 for leaves, so this is
/// also correct for leaf-leaf pairs.
pub fn uncorrected_distance(tree: &Tree, i: usize, j: usize) -> BioResult<f64> {
    let delta = profile::profile_distance(&tree.nodes[i].profile, &tree.nodes[j].profile)?;
    let u_i = tree.updistance_of_node(i)?;
    let u_j = tree.updistance_of_node(j)?;
    Ok(delta - u_i - u_j)
}

/// `du(ij, k)` for a *candidate* join of `i` and `j` that has not been
/// materialized yet, scored against an existing node `k`:
/// `Delta(ij, k) = lambda*Delta(i, k) + (1-lambda)*Delta(j, k)`,
/// `du(ij, k) = Delta(ij, k) - u(ij) - u(k)`, `u(ij) = Delta(i, j) / 2`.
/// Used by the local hill-climb step of the join engine to test a
/// candidate partner without committing the join.
pub fn uncorrected_distance_to_pair(tree: &Tree, i: usize, j: usize, k: usize) -> BioResult<f64> {
    let pi = &tree.nodes[i].profile;
    let pj = &tree.nodes[j].profile;
    let pk = &tree.nodes[k].profile;
    let delta_ik = profile::profile_distance(pi, pk)?;
    let delta_jk = profile::profile_distance(pj, pk)?;
    let delta_ijk = tree.lambda * delta_ik + (1.0 - tree.lambda) * delta_jk;
    let u_ij = profile::profile_distance(pi, pj)? / 2.0;
    let u_k = tree.updistance_of_node(k)?;
    Ok(delta_ijk - u_ij - u_k)
}

/// `r(i)`, the out-distance: average corrected distance from `i` to every
/// other currently active node, computed via the cached total profile `T`
/// so a single query costs O(L) rather than O(n*L).
pub fn out_distance(tree: &Tree, i: usize) -> BioResult<f64> {
    let n = tree.active_count as f64;
    let pi = &tree.nodes[i].profile;
    let delta_it = profile::profile_distance(pi, &tree.total_profile)?;
    let delta_ii = profile::profile_distance(pi, pi)?;
    let u_i = tree.updistance_of_node(i)?;
    // sum_j active, j != i of u(j) = (running sum over all active nodes) - u(i)
    let sum_u_j = tree.sum_up_distance() - u_i;

    let numerator = n * delta_it - delta_ii - (n - 1.0) * u_i + u_i - sum_u_j;
    if tree.active_count == 2 {
        return Ok(numerator);
    }
    Ok(numerator / (n - 2.0))
}

/// The neighbor-joining criterion minimized to pick the next join.
pub fn nj_criterion(tree: &Tree, i: usize, j: usize) -> BioResult<f64> {
    let du = uncorrected_distance(tree, i, j)?;
    let r_i = out_distance(tree, i)?;
    let r_j = out_distance(tree, j)?;
    Ok(du - r_i - r_j)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phylo::fastphylo::config::Config;
    use crate::phylo::fastphylo::tree::LeafInput;

    fn leaf(name: &str, seq: &str) -> LeafInput {
        LeafInput {
            name: name.into(),
            sequence: seq.into(),
            duplicates: Vec::new(),
        }
    }

    #[test]
    fn criterion_symmetric() {
        let leaves = vec![leaf("a", "AAAA"), leaf("b", "AAAT"), leaf("c", "TTTT")];
        let tree = Tree::from_leaves(&leaves, Config::default_for(3)).unwrap();
        let c_ab = nj_criterion(&tree, 0, 1).unwrap();
        let c_ba = nj_criterion(&tree, 1, 0).unwrap();
        assert!((c_ab - c_ba).abs() < 1e-9);
    }

    #[test]
    fn closer_pair_has_lower_criterion() {
        let leaves = vec![leaf("a", "AAAA"), leaf("b", "AAAT"), leaf("c", "TTTT")];
        let tree = Tree::from_leaves(&leaves, Config::default_for(3)).unwrap();
        let c_ab = nj_criterion(&tree, 0, 1).unwrap();
        let c_ac = nj_criterion(&tree, 0, 2).unwrap();
        assert!(c_ab < c_ac);
    }
}
