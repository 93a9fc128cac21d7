#![allow(clippy::useless_conversion)]

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyModule;

use biorust_core::phylo;
use biorust_core::phylo::fastphylo;

#[pyclass(frozen, name = "DistanceMatrix")]
pub struct PyDistanceMatrix {
    inner: phylo::DistanceMatrix,
}

#[pymethods]
impl PyDistanceMatrix {
    #[getter]
    fn n(&self) -> usize {
        self.inner.n()
    }

    fn labels(&self) -> Vec<String> {
        self.inner.labels().iter().map(|s| s.to_string()).collect()
    }

    fn get(&self, i: usize, j: usize) -> PyResult<f64> {
        let n = self.inner.n();
        if i >= n || j >= n {
            return Err(PyValueError::new_err(format!(
                "index ({}, {}) out of range for {}x{} matrix",
                i, j, n, n
            )));
        }
        Ok(self.inner.get(i, j))
    }

    fn to_list(&self) -> Vec<f64> {
        self.inner.data().to_vec()
    }

    fn to_list_of_lists(&self) -> Vec<Vec<f64>> {
        let n = self.inner.n();
        (0..n)
            .map(|i| (0..n).map(|j| self.inner.get(i, j)).collect())
            .collect()
    }

    fn __len__(&self) -> usize {
        self.inner.n()
    }

    fn __repr__(&self) -> String {
        format!("DistanceMatrix(n={})", self.inner.n())
    }

    fn __str__(&self) -> String {
        let n = self.inner.n();
        let labels = self.inner.labels();
        let pad = labels.iter().map(|l| l.len()).max().unwrap_or(0);

        let mut lines = Vec::with_capacity(n + 1);

        // Header line
        let mut header = format!("{:>pad$}", "", pad = pad + 2);
        for label in labels {
            header.push_str(&format!("{:>10}", &**label));
        }
        lines.push(header);

        for (i, label) in labels.iter().enumerate() {
            let mut row = format!("{:>pad$}  ", &**label, pad = pad);
            for j in 0..n {
                row.push_str(&format!("{:>10.4}", self.inner.get(i, j)));
            }
            lines.push(row);
        }

        lines.join("\n")
    }
}

#[pyclass(frozen, name = "PhyloTree")]
pub struct PyPhyloTree {
    inner: phylo::PhyloTree,
}

#[pymethods]
impl PyPhyloTree {
    fn to_newick(&self) -> String {
        phylo::to_newick(&self.inner)
    }

    fn ascii_diagram(&self) -> String {
        let start = self
            .inner
            .root()
            .unwrap_or_else(|| self.inner.num_nodes().saturating_sub(1));

        let mut out = String::new();
        out.push_str(&format_node_label(&self.inner, start));
        out.push('\n');

        let children = self.inner.node(start).children.clone();
        for (i, child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            write_ascii_subtree(&self.inner, *child, "", last, &mut out);
        }

        if out.ends_with('\n') {
            out.pop();
        }

        out
    }

    fn leaf_labels(&self) -> Vec<String> {
        self.inner.leaf_labels()
    }

    fn num_leaves(&self) -> usize {
        self.inner.num_leaves()
    }

    fn num_nodes(&self) -> usize {
        self.inner.num_nodes()
    }

    fn is_rooted(&self) -> bool {
        self.inner.root().is_some()
    }

    fn __repr__(&self) -> String {
        let kind = if self.inner.root().is_some() {
            "rooted"
        } else {
            "unrooted"
        };
        format!(
            "PhyloTree(leaves={}, nodes={}, {})",
            self.inner.num_leaves(),
            self.inner.num_nodes(),
            kind
        )
    }

    fn __str__(&self) -> String {
        self.to_newick()
    }
}

fn format_node_label(tree: &phylo::PhyloTree, idx: usize) -> String {
    let node = tree.node(idx);
    let mut label = if let Some(ref l) = node.label {
        l.to_string()
    } else if node.children.is_empty() {
        format!("leaf{}", idx)
    } else {
        format!("node{}", idx)
    };

    if let Some(bl) = node.branch_length {
        label.push_str(&format!(":{:.6}", bl));
    }

    label
}

fn write_ascii_subtree(
    tree: &phylo::PhyloTree,
    idx: usize,
    prefix: &str,
    is_last: bool,
    out: &mut String,
) {
    out.push_str(prefix);
    out.push_str(if is_last { "`-- " } else { "|-- " });
    out.push_str(&format_node_label(tree, idx));
    out.push('\n');

    let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "|   " });
    let children = tree.node(idx).children.clone();
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        write_ascii_subtree(tree, *child, &child_prefix, last, out);
    }
}

#[pyfunction]
#[pyo3(signature = (dist_matrix, method = "nj"))]
fn build_tree(
    py: Python<'_>,
    dist_matrix: &PyDistanceMatrix,
    method: &str,
) -> PyResult<PyPhyloTree> {
    let dm = &dist_matrix.inner;

    let tree = match method {
        "nj" => py.allow_threads(|| phylo::neighbor_joining(dm)),
        "upgma" => py.allow_threads(|| phylo::upgma(dm)),
        _ => {
            return Err(PyValueError::new_err(format!(
                "unknown tree method '{}' (valid: 'nj', 'upgma')",
                method
            )));
        }
    };

    tree.map(|t| PyPhyloTree { inner: t })
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Profile-based neighbor joining from raw aligned sequences: a name and
/// sequence per leaf, duplicate names already collapsed by the caller
/// attached via `duplicates`. Returns the inferred tree serialized to
/// Newick, since the fastphylo engine's `Tree` isn't (yet) wrapped as a
/// pyclass.
#[pyfunction]
#[pyo3(signature = (names, sequences, duplicates = None, top_hits_size = None))]
fn fast_tree(
    py: Python<'_>,
    names: Vec<String>,
    sequences: Vec<String>,
    duplicates: Option<Vec<Vec<String>>>,
    top_hits_size: Option<usize>,
) -> PyResult<String> {
    if names.len() != sequences.len() {
        return Err(PyValueError::new_err(format!(
            "{} names given for {} sequences",
            names.len(),
            sequences.len()
        )));
    }
    let dup_lists = duplicates.unwrap_or_else(|| vec![Vec::new(); names.len()]);
    if dup_lists.len() != names.len() {
        return Err(PyValueError::new_err(
            "duplicates list must have one entry per input sequence",
        ));
    }

    let leaves: Vec<fastphylo::LeafInput> = names
        .into_iter()
        .zip(sequences)
        .zip(dup_lists)
        .map(|((name, sequence), dups)| fastphylo::LeafInput {
            name: name.into_boxed_str(),
            sequence: sequence.into_boxed_str(),
            duplicates: dups.into_iter().map(String::into_boxed_str).collect(),
        })
        .collect();

    let mut config = fastphylo::Config::default_for(leaves.len());
    if let Some(m) = top_hits_size {
        config.m = m.max(1);
    }

    py.allow_threads(|| fastphylo::build_newick(&leaves, config))
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDistanceMatrix>()?;
    m.add_class::<PyPhyloTree>()?;
    m.add_function(wrap_pyfunction!(build_tree, m)?)?;
    m.add_function(wrap_pyfunction!(fast_tree, m)?)?;
    Ok(())
}
