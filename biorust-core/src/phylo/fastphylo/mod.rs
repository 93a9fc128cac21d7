//! Profile-based neighbor-joining: the FastTree-style engine that replaces
//! an O(N^2) distance matrix with per-node probability profiles, drives
//! join selection through top-hits/FastNJ/local-hill-climb heuristics, and
//! refines the greedy topology with NNI before assigning branch lengths.
//!
//! This lives alongside [`crate::phylo::tree`]'s plain `neighbor_joining`
//! and `upgma` (which build from a precomputed [`DistanceMatrix`](
//! crate::phylo::distance::DistanceMatrix)): this engine instead works
//! from raw aligned sequences and scales to alignments too large to afford
//! an explicit pairwise distance matrix.

pub mod branch_length;
pub mod config;
pub mod criterion;
pub mod dedup;
pub mod fastnj;
pub mod join;
pub mod newick;
pub mod nni;
pub mod profile;
pub mod tophits;
pub mod tree;

pub use config::Config;
pub use newick::to_newick;
pub use profile::Profile;
pub use tree::{LeafInput, Node, Tree};

use crate::error::BioResult;

/// Run the full pipeline (top-hits/FastNJ seeding, greedy join, NNI,
/// branch lengths) and return the resulting tree. A single leaf is a
/// degenerate, valid tree and short-circuits before any join/NNI work.
pub fn infer_tree(leaves: &[LeafInput], config: Config) -> BioResult<Tree> {
    let mut tree = Tree::from_leaves(leaves, config)?;
    if tree.nodes.len() < 2 {
        return Ok(tree);
    }

    tophits::top_hits_init(&mut tree)?;
    fastnj::fastnj_init(&mut tree)?;
    join::create_initial_topology(&mut tree)?;
    nni::run_nni(&mut tree)?;
    branch_length::assign_branch_lengths(&mut tree)?;

    Ok(tree)
}

/// Run [`infer_tree`] and serialize the result to Newick.
pub fn build_newick(leaves: &[LeafInput], config: Config) -> BioResult<String> {
    let tree = infer_tree(leaves, config)?;
    to_newick(&tree)
}

#[cfg(test)]
mod tests;
