//! End-to-end scenarios against the full `infer_tree`/`build_newick`
//! pipeline, one per concrete case the engine is expected to get right.

use super::*;
use crate::phylo::fastphylo::tree::LeafInput;

fn leaf(name: &str, seq: &str) -> LeafInput {
    LeafInput {
        name: name.into(),
        sequence: seq.into(),
        duplicates: Vec::new(),
    }
}

fn leaf_with_dups(name: &str, seq: &str, dups: &[&str]) -> LeafInput {
    LeafInput {
        name: name.into(),
        sequence: seq.into(),
        duplicates: dups.iter().map(|d| (*d).into()).collect(),
    }
}

fn lca(tree: &Tree, mut a: usize, b: usize) -> usize {
    let mut ancestors = std::collections::HashSet::new();
    loop {
        ancestors.insert(a);
        match tree.nodes[a].parent {
            Some(p) => a = p,
            None => break,
        }
    }
    let mut cur = b;
    loop {
        if ancestors.contains(&cur) {
            return cur;
        }
        cur = tree.nodes[cur].parent.expect("reached root without meeting `a`'s ancestry");
    }
}

#[test]
fn duplicate_pair_collapses_into_one_multifurcating_leaf() {
    let leaves = vec![leaf_with_dups("ACGT_1", "ACGT", &["ACGT_2"])];
    let newick = build_newick(&leaves, Config::default_for(1)).unwrap();
    assert_eq!(newick, "(ACGT_1,ACGT_2);");
}

#[test]
fn closer_pair_joins_before_the_outlier() {
    let leaves = vec![leaf("A", "AAAA"), leaf("B", "AAAT"), leaf("C", "TTTT")];
    let newick = build_newick(&leaves, Config::default_for(3)).unwrap();
    assert_eq!(newick, "((A,B),C);");
}

#[test]
fn equidistant_four_leaves_tie_break_to_first_two_inputs() {
    // Constructed so every pair is equally du=0.5 apart under uncorrected
    // distance: with nothing to distinguish them on criterion, the tie
    // break (lowest (first_index, second_index) pair) must pick (0, 1).
    let leaves = vec![
        leaf("A", "AAAA"),
        leaf("B", "AATT"),
        leaf("C", "ATAT"),
        leaf("D", "ATTA"),
    ];
    let tree = infer_tree(&leaves, Config::default_for(4)).unwrap();
    tree.validate_shape().unwrap();
    // A and B must share a parent that neither C nor D is a child of.
    let ab_parent = tree.nodes[0].parent;
    assert_eq!(ab_parent, tree.nodes[1].parent);
    assert_ne!(ab_parent, tree.nodes[2].parent);
    assert_ne!(ab_parent, tree.nodes[3].parent);
}

#[test]
fn two_cluster_structure_is_recovered() {
    // Cluster 1: a1, a2, a3 share a prefix; cluster 2: b1, b2, b3 share a
    // different one. Within-cluster du ~= 0.1, between ~= 0.6 by construction.
    let leaves = vec![
        leaf("a1", "AAAAAAAAAA"),
        leaf("a2", "AAAAAAAAAT"),
        leaf("a3", "AAAAAAAATT"),
        leaf("b1", "TTTTTTTTTT"),
        leaf("b2", "TTTTTTTTTA"),
        leaf("b3", "TTTTTTTTAA"),
    ];
    let tree = infer_tree(&leaves, Config::default_for(6)).unwrap();
    tree.validate_shape().unwrap();

    let cluster_a_lca = lca(&tree, lca(&tree, 0, 1), 2);
    let cluster_b_lca = lca(&tree, lca(&tree, 3, 4), 5);
    assert_ne!(cluster_a_lca, cluster_b_lca);

    let cross_lca = lca(&tree, 0, 3);
    assert_ne!(cluster_a_lca, cross_lca);
    assert_ne!(cluster_b_lca, cross_lca);
}

#[test]
fn non_overlapping_sequences_saturate_every_branch_to_max() {
    // A gap-only sequence never overlaps any other sequence at any site,
    // so the convention in `profile::profile_distance` reports du=1.0
    // against everything else; JC-correcting 1.0 saturates at 3.0. With
    // exactly two leaves there is only one pair, so this is the one edge
    // both leaves sit on and both must carry the saturated length.
    let leaves = vec![leaf("a", "----"), leaf("b", "ACGT")];
    let tree = infer_tree(&leaves, Config::default_for(2)).unwrap();
    assert_eq!(tree.nodes[0].branch_length, Some(3.0));
    assert_eq!(tree.nodes[1].branch_length, Some(3.0));
}

#[test]
fn nni_drives_a_greedy_topology_to_a_local_minimum_and_then_stops() {
    // Five leaves where a close pair (d, e) is far enough from the rest
    // that greedy joining can settle into a topology NNI then improves.
    let leaves = vec![
        leaf("a", "AAAAAAAA"),
        leaf("b", "AAAAAAAT"),
        leaf("c", "TTTTTTTT"),
        leaf("d", "TTTTTTTA"),
        leaf("e", "AATTAATT"),
    ];
    let mut tree = Tree::from_leaves(&leaves, Config::default_for(5)).unwrap();
    tophits::top_hits_init(&mut tree).unwrap();
    fastnj::fastnj_init(&mut tree).unwrap();
    join::create_initial_topology(&mut tree).unwrap();
    tree.validate_shape().unwrap();

    // The greedy join leaves exactly one pair out of place; the first round
    // of NNI fixes it, and a further full set of rounds on the resulting
    // (locally optimal) topology performs no more swaps.
    let first = nni::run_nni(&mut tree).unwrap();
    assert_eq!(first, 1);
    let swaps_once_converged = nni::run_nni(&mut tree).unwrap();
    assert_eq!(swaps_once_converged, 0);
}
