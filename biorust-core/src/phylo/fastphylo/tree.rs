//! Node arena and tree-wide state: total profile T, BIONJ lambda, the
//! per-node top-hits/FastNJ heuristic state.

use crate::error::{BioError, BioResult};

use super::config::Config;
use super::profile::{self, Profile};

/// A single candidate partner in a node's top-hits list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopHit {
    pub partner: usize,
    pub criterion: f64,
}

/// Bounded list of a node's best-scoring join candidates, kept sorted
/// ascending by criterion. Stale entries (pointing at nodes that became
/// inactive after insertion) are tolerated and filtered lazily.
#[derive(Debug, Clone, Default)]
pub struct TopHits {
    pub entries: Vec<TopHit>,
}

impl TopHits {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: Box<str>,
    pub profile: Profile,
    pub leaf: bool,
    pub active: bool,
    pub parent: Option<usize>,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub branch_length: Option<f64>,
    pub top_hits: TopHits,
    pub best_join: Option<(f64, usize)>,
    /// Names of other input sequences identical to this leaf's sequence
    /// (excluding this leaf's own name), attached as a multifurcation at
    /// Newick emission time. Always empty for internal nodes.
    pub duplicates: Vec<Box<str>>,
    pub top_hits_age: u32,
}

impl Node {
    fn new_leaf(name: Box<str>, profile: Profile, duplicates: Vec<Box<str>>) -> Self {
        Self {
            name,
            profile,
            leaf: true,
            active: true,
            parent: None,
            left: None,
            right: None,
            branch_length: None,
            top_hits: TopHits::default(),
            best_join: None,
            duplicates,
            top_hits_age: 0,
        }
    }

    fn new_internal(name: Box<str>, profile: Profile, left: usize, right: usize) -> Self {
        Self {
            name,
            profile,
            leaf: false,
            active: true,
            parent: None,
            left: Some(left),
            right: Some(right),
            branch_length: None,
            top_hits: TopHits::default(),
            best_join: None,
            duplicates: Vec::new(),
            top_hits_age: 0,
        }
    }
}

/// One input leaf: a name, its aligned sequence, and the names of any
/// other input sequences that were found identical to it upstream (the
/// deduplication collaborator's contract, see `dedup::uniquify`).
pub struct LeafInput {
    pub name: Box<str>,
    pub sequence: Box<str>,
    pub duplicates: Vec<Box<str>>,
}

#[derive(Debug, Clone)]
pub struct Tree {
    pub nodes: Vec<Node>,
    pub active_count: usize,
    pub total_profile: Profile,
    pub lambda: f64,
    pub config: Config,
    sum_profile: Profile,
    sum_up_distance: f64,
    joins_since_refresh: usize,
}

impl Tree {
    pub fn from_leaves(leaves: &[LeafInput], config: Config) -> BioResult<Self> {
        if leaves.is_empty() {
            return Err(BioError::EmptyInput);
        }
        let expected_len = leaves[0].sequence.len();
        let mut nodes = Vec::with_capacity(leaves.len());
        let mut sum_profile = Profile::zero(expected_len);
        for (idx, leaf) in leaves.iter().enumerate() {
            if leaf.sequence.len() != expected_len {
                return Err(BioError::SequenceLengthMismatch {
                    index: idx,
                    len: leaf.sequence.len(),
                    expected: expected_len,
                });
            }
            let profile = Profile::from_sequence(leaf.sequence.as_bytes())?;
            sum_profile.add_in_place(&profile)?;
            nodes.push(Node::new_leaf(
                leaf.name.clone(),
                profile,
                leaf.duplicates.clone(),
            ));
        }
        let n = nodes.len();
        let total_profile = sum_profile.scaled(1.0 / n as f64);
        Ok(Self {
            nodes,
            active_count: n,
            total_profile,
            lambda: 0.5,
            config,
            sum_profile,
            sum_up_distance: 0.0,
            joins_since_refresh: 0,
        })
    }

    pub fn sum_up_distance(&self) -> f64 {
        self.sum_up_distance
    }

    pub fn active_indices(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.active)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn root_index(&self) -> BioResult<usize> {
        self.nodes
            .iter()
            .position(|n| n.parent.is_none())
            .ok_or(BioError::InvariantViolation {
                node: 0,
                detail: "no root: every node has a parent".into(),
            })
    }

    /// `u(i)`: 0 for a leaf, half the profile distance between its two
    /// children for an internal node.
    pub fn updistance_of_node(&self, idx: usize) -> BioResult<f64> {
        let node = &self.nodes[idx];
        if node.leaf {
            return Ok(0.0);
        }
        let l = node.left.ok_or(BioError::InvariantViolation {
            node: idx,
            detail: "internal node missing left child".into(),
        })?;
        let r = node.right.ok_or(BioError::InvariantViolation {
            node: idx,
            detail: "internal node missing right child".into(),
        })?;
        Ok(profile::profile_distance(&self.nodes[l].profile, &self.nodes[r].profile)? / 2.0)
    }

    /// Commit a join: append the new internal node, re-parent `i` and `j`,
    /// maintain the total profile and the running sum of up-distances.
    /// Returns the new node's index.
    pub fn commit_join(&mut self, i: usize, j: usize) -> BioResult<usize> {
        if !self.nodes[i].active || !self.nodes[j].active {
            return Err(BioError::InvariantViolation {
                node: i,
                detail: "join attempted on an inactive node".into(),
            });
        }
        let u_i = self.updistance_of_node(i)?;
        let u_j = self.updistance_of_node(j)?;

        let new_profile = profile::average(&self.nodes[i].profile, &self.nodes[j].profile, self.lambda)?;
        let u_new =
            profile::profile_distance(&self.nodes[i].profile, &self.nodes[j].profile)? / 2.0;

        let new_idx = self.nodes.len();
        let name = format!("({}{}{})", self.nodes[i].name, '&', self.nodes[j].name).into_boxed_str();
        let new_node = Node::new_internal(name, new_profile, i, j);

        self.nodes[i].parent = Some(new_idx);
        self.nodes[j].parent = Some(new_idx);
        self.nodes[i].active = false;
        self.nodes[j].active = false;
        self.nodes.push(new_node);

        // I1: active count drops by exactly one per join (two leave, one joins).
        self.active_count -= 1;

        self.sum_up_distance += u_new - u_i - u_j;
        self.joins_since_refresh += 1;
        if self.joins_since_refresh >= self.config.t_refresh_period {
            self.refresh_total_profile()?;
            self.refresh_sum_up_distance()?;
            self.joins_since_refresh = 0;
        } else {
            let new_profile_ref = self.nodes[new_idx].profile.clone();
            self.sum_profile.subtract_in_place(&self.nodes[i].profile)?;
            self.sum_profile.subtract_in_place(&self.nodes[j].profile)?;
            self.sum_profile.add_in_place(&new_profile_ref)?;
            self.total_profile = self.sum_profile.scaled(1.0 / self.active_count as f64);
        }

        Ok(new_idx)
    }

    fn refresh_total_profile(&mut self) -> BioResult<()> {
        let sites = self.total_profile.sites();
        let mut sum = Profile::zero(sites);
        for node in &self.nodes {
            if node.active {
                sum.add_in_place(&node.profile)?;
            }
        }
        self.total_profile = sum.scaled(1.0 / self.active_count as f64);
        self.sum_profile = sum;
        Ok(())
    }

    fn refresh_sum_up_distance(&mut self) -> BioResult<()> {
        let mut total = 0.0;
        for idx in 0..self.nodes.len() {
            if self.nodes[idx].active {
                total += self.updistance_of_node(idx)?;
            }
        }
        self.sum_up_distance = total;
        Ok(())
    }

    /// Shape invariant check (spec section 8): n0-1 internal nodes, every
    /// internal node has exactly two children, every non-root node's
    /// parent lists it back as a child.
    pub fn validate_shape(&self) -> BioResult<()> {
        for (idx, node) in self.nodes.iter().enumerate() {
            if !node.leaf && (node.left.is_none() || node.right.is_none()) {
                return Err(BioError::InvariantViolation {
                    node: idx,
                    detail: "internal node without two children".into(),
                });
            }
            if let Some(parent) = node.parent {
                let parent_node = &self.nodes[parent];
                if parent_node.left != Some(idx) && parent_node.right != Some(idx) {
                    return Err(BioError::InvariantViolation {
                        node: idx,
                        detail: "parent does not list this node as a child".into(),
                    });
                }
            }
        }
        Ok(())
    }
}
