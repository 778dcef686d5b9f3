pub mod predict;

use crate::data::{validate_dataset, Matrix};
use crate::errors::CartError;
use crate::node::{Node, NodeRecord};
use crate::splitter::{find_best_split, split_dataset, split_labels};
use crate::utils::{is_homogeneous, majority_value};
use log::{debug, info, warn};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display};

/// A trained decision tree.
///
/// The root is absent when the tree was fit on a dataset with no rows.
/// It is stored as a flat list of nodes in preorder, so the encoded form
/// does not nest deeper as the tree grows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tree {
    pub root: Option<Node>,
    pub depth: usize,
    pub n_leaves: usize,
}

impl Tree {
    pub fn new() -> Self {
        Tree {
            root: None,
            depth: 0,
            n_leaves: 0,
        }
    }

    /// Wrap an already built node graph, computing its statistics.
    pub fn from_root(root: Option<Node>) -> Self {
        let mut tree = Tree {
            root,
            depth: 0,
            n_leaves: 0,
        };
        tree.update_stats();
        tree
    }

    /// Grow the tree on a dataset, replacing any previous root.
    ///
    /// * `data` - The feature matrix.
    /// * `y` - One label per row of `data`.
    ///
    /// Growth stops at nodes whose labels are all equal, or that no
    /// threshold can separate. A dataset with no rows is valid and leaves
    /// the tree without a root.
    pub fn fit(&mut self, data: &Matrix<f64>, y: &[f64]) -> Result<(), CartError> {
        validate_dataset(data, y)?;
        self.root = if data.rows == 0 {
            warn!("Fitting on an empty dataset, the tree will have no root.");
            None
        } else {
            Some(build_node(data, y, &data.index, 0))
        };
        self.update_stats();
        info!(
            "Fit tree on {} rows and {} features, depth: {}, leaves: {}",
            data.rows, data.cols, self.depth, self.n_leaves
        );
        Ok(())
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    pub fn n_nodes(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.n_nodes())
    }

    /// Recompute `depth` and `n_leaves` from the nodes.
    pub(crate) fn update_stats(&mut self) {
        self.depth = self.root.as_ref().map_or(0, |n| n.depth());
        self.n_leaves = self.root.as_ref().map_or(0, |n| n.n_leaves());
    }
}

/// Recursively grow the subtree for the rows in `index`, which is never empty.
fn build_node(data: &Matrix<f64>, y: &[f64], index: &[usize], depth: usize) -> Node {
    debug_assert!(!index.is_empty());
    let labels = split_labels(y, index);
    if is_homogeneous(&labels) {
        return Node::leaf(labels[0]);
    }

    // A split is only returned when both sides hold at least one row.
    let split = match find_best_split(data, y, index) {
        Some(split) => split,
        None => return Node::leaf(majority_value(&labels)),
    };

    let (left_index, right_index) = split_dataset(data, index, split.split_feature, split.split_value);
    debug_assert!(!left_index.is_empty() && !right_index.is_empty());
    debug!(
        "depth {}: split {} rows on [{} < {}] into {} and {}, impurity: {}",
        depth,
        index.len(),
        split.split_feature,
        split.split_value,
        left_index.len(),
        right_index.len(),
        split.impurity
    );

    let left = build_node(data, y, &left_index, depth + 1);
    let right = build_node(data, y, &right_index, depth + 1);
    Node::split(split.split_feature, split.split_value, left, right)
}

#[derive(Deserialize, Serialize)]
struct TreeRecord {
    nodes: Vec<NodeRecord>,
    depth: usize,
    n_leaves: usize,
}

impl Serialize for Tree {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        TreeRecord {
            nodes: self.root.as_ref().map_or_else(Vec::new, |n| n.to_records()),
            depth: self.depth,
            n_leaves: self.n_leaves,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = TreeRecord::deserialize(deserializer)?;
        let root = if record.nodes.is_empty() {
            None
        } else {
            Some(Node::from_records(record.nodes).map_err(<D::Error as de::Error>::custom)?)
        };
        Ok(Tree {
            root,
            depth: record.depth,
            n_leaves: record.n_leaves,
        })
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.root {
            Some(root) => write!(f, "{}", root),
            None => writeln!(f, "<empty tree>"),
        }
    }
}
