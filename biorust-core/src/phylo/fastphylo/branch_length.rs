//! Final branch-length assignment, run once after NNI has settled the
//! topology. Four formulas selected by which endpoints are leaves.

use crate::error::{BioError, BioResult};

use super::profile;
use super::tree::Tree;

fn children_of(tree: &Tree, idx: usize) -> BioResult<(usize, usize)> {
    let l = tree.nodes[idx].left.ok_or(BioError::InvariantViolation {
        node: idx,
        detail: "internal node missing left child".into(),
    })?;
    let r = tree.nodes[idx].right.ok_or(BioError::InvariantViolation {
        node: idx,
        detail: "internal node missing right child".into(),
    })?;
    Ok((l, r))
}

fn jc_distance(tree: &Tree, x: usize, y: usize) -> BioResult<f64> {
    let d = profile::profile_distance(&tree.nodes[x].profile, &tree.nodes[y].profile)?;
    Ok(profile::jc_correct(d, tree.config.max_corrected_distance))
}

/// Length shared by the two edges dropping from a common parent to its
/// children `n1` and `n2`, sharpened using grandchildren profiles when
/// either side is itself internal.
fn pair_branch_length(tree: &Tree, n1: usize, n2: usize) -> BioResult<f64> {
    let leaf1 = tree.nodes[n1].leaf;
    let leaf2 = tree.nodes[n2].leaf;

    match (leaf1, leaf2) {
        (true, true) => jc_distance(tree, n1, n2),
        (true, false) | (false, true) => {
            let (leaf, internal) = if leaf1 { (n1, n2) } else { (n2, n1) };
            let (l, r) = children_of(tree, internal)?;
            let d_leaf_l = jc_distance(tree, leaf, l)?;
            let d_leaf_r = jc_distance(tree, leaf, r)?;
            let d_lr = jc_distance(tree, l, r)?;
            Ok((d_leaf_l + d_leaf_r - d_lr) / 2.0)
        }
        (false, false) => {
            let (l1, r1) = children_of(tree, n1)?;
            let (l2, r2) = children_of(tree, n2)?;

            let cross = jc_distance(tree, l1, l2)?
                + jc_distance(tree, l1, r2)?
                + jc_distance(tree, r1, l2)?
                + jc_distance(tree, r1, r2)?;
            let within = jc_distance(tree, l1, r1)? + jc_distance(tree, l2, r2)?;
            Ok(cross / 4.0 - within / 2.0)
        }
    }
}

/// Assign a branch length to every non-root node. Each parent's two
/// children get the same computed length, since the formula jointly
/// estimates both of a parent's incident edges from the pairwise
/// relationship between its children.
pub fn assign_branch_lengths(tree: &mut Tree) -> BioResult<()> {
    for idx in 0..tree.nodes.len() {
        if tree.nodes[idx].leaf {
            continue;
        }
        let (n1, n2) = children_of(tree, idx)?;
        let length = pair_branch_length(tree, n1, n2)?;
        tree.nodes[n1].branch_length = Some(length);
        tree.nodes[n2].branch_length = Some(length);
    }
    Ok(())
}
