//! Newick emission: a deterministic recursive traversal to a parenthesized
//! string, terminated by ';'. Grounded on `phylo::newick::to_newick`'s
//! writer shape, extended to render a leaf's duplicate-set as a
//! zero-length-parent multifurcation.

use crate::error::{BioError, BioResult};

use super::tree::Tree;

fn needs_quoting(label: &str) -> bool {
    label.chars().any(|ch| {
        ch.is_whitespace() || matches!(ch, ':' | ',' | '(' | ')' | ';' | '[' | ']' | '\'')
    })
}

fn write_label(out: &mut String, label: &str) {
    if label.is_empty() {
        return;
    }
    if needs_quoting(label) {
        out.push('\'');
        for ch in label.chars() {
            if ch == '\'' {
                out.push_str("''");
            } else {
                out.push(ch);
            }
        }
        out.push('\'');
    } else {
        out.push_str(label);
    }
}

fn write_subtree(tree: &Tree, idx: usize, out: &mut String) {
    let node = &tree.nodes[idx];

    if node.leaf {
        if node.duplicates.is_empty() {
            write_label(out, &node.name);
        } else {
            out.push('(');
            write_label(out, &node.name);
            for dup in &node.duplicates {
                out.push(',');
                write_label(out, dup);
            }
            out.push(')');
        }
        return;
    }

    out.push('(');
    write_subtree(tree, node.left.expect("internal node has a left child"), out);
    out.push(',');
    write_subtree(tree, node.right.expect("internal node has a right child"), out);
    out.push(')');
}

/// Emit the tree starting from its unique parentless node.
pub fn to_newick(tree: &Tree) -> BioResult<String> {
    let root = tree
        .nodes
        .iter()
        .position(|n| n.parent.is_none())
        .ok_or(BioError::InvariantViolation {
            node: 0,
            detail: "no root: every node has a parent".into(),
        })?;

    let mut s = String::new();
    write_subtree(tree, root, &mut s);
    s.push(';');
    Ok(s)
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
    fn single_leaf_has_no_parens() {
        let leaves = vec![leaf("a", "ACGT")];
        let tree = Tree::from_leaves(&leaves, Config::default_for(1)).unwrap();
        assert_eq!(to_newick(&tree).unwrap(), "a;");
    }

    #[test]
    fn two_leaves_join_under_one_parent() {
        let leaves = vec![leaf("a", "ACGT"), leaf("b", "ACGA")];
        let mut tree = Tree::from_leaves(&leaves, Config::default_for(2)).unwrap();
        tree.commit_join(0, 1).unwrap();
        assert_eq!(to_newick(&tree).unwrap(), "(a,b);");
    }

    #[test]
    fn duplicate_set_renders_as_multifurcation() {
        let mut leaves = vec![leaf("ACGT_1", "ACGT")];
        leaves[0].duplicates.push("ACGT_2".into());
        let tree = Tree::from_leaves(&leaves, Config::default_for(1)).unwrap();
        assert_eq!(to_newick(&tree).unwrap(), "(ACGT_1,ACGT_2);");
    }

    #[test]
    fn label_needing_quotes_is_quoted() {
        let leaves = vec![leaf("odd name", "ACGT")];
        let tree = Tree::from_leaves(&leaves, Config::default_for(1)).unwrap();
        assert_eq!(to_newick(&tree).unwrap(), "'odd name';");
    }
}
