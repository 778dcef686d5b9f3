use crate::errors::CartError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of a strictly binary decision tree.
///
/// A split node always owns both of its children, so a node with a
/// single missing child cannot be built.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Terminal node holding the predicted label.
    Leaf { value: f64 },
    /// Samples with `row[split_feature] < split_value` go left, all others go right.
    Split {
        split_feature: usize,
        split_value: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn leaf(value: f64) -> Self {
        Node::Leaf { value }
    }

    pub fn split(split_feature: usize, split_value: f64, left: Node, right: Node) -> Self {
        Node::Split {
            split_feature,
            split_value,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Number of edges on the longest path from this node to a leaf.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut stack = vec![(self, 0)];
        while let Some((node, d)) = stack.pop() {
            depth = depth.max(d);
            if let Node::Split { left, right, .. } = node {
                stack.push((left.as_ref(), d + 1));
                stack.push((right.as_ref(), d + 1));
            }
        }
        depth
    }

    pub fn n_leaves(&self) -> usize {
        self.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn n_nodes(&self) -> usize {
        self.iter().count()
    }

    /// Visit this node and all of its descendants in preorder.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            if let Node::Split { left, right, .. } = node {
                stack.push(right.as_ref());
                stack.push(left.as_ref());
            }
            Some(node)
        })
    }

    /// Flatten the subtree into preorder records, children are referenced
    /// by their position in the returned list.
    pub fn to_records(&self) -> Vec<NodeRecord> {
        let mut records = Vec::new();
        let mut stack: Vec<(&Node, Option<(usize, bool)>)> = vec![(self, None)];
        while let Some((node, parent)) = stack.pop() {
            let num = records.len();
            if let Some((parent, is_left)) = parent {
                if let NodeRecord::Split {
                    left_child, right_child, ..
                } = &mut records[parent]
                {
                    if is_left {
                        *left_child = num;
                    } else {
                        *right_child = num;
                    }
                }
            }
            match node {
                Node::Leaf { value } => records.push(NodeRecord::Leaf { value: *value }),
                Node::Split {
                    split_feature,
                    split_value,
                    left,
                    right,
                } => {
                    records.push(NodeRecord::Split {
                        split_feature: *split_feature,
                        split_value: *split_value,
                        left_child: num,
                        right_child: num,
                    });
                    stack.push((right.as_ref(), Some((num, false))));
                    stack.push((left.as_ref(), Some((num, true))));
                }
            }
        }
        records
    }

    /// Rebuild a subtree from records written by [`Node::to_records`].
    ///
    /// The first record is the root. Every other record must be the child
    /// of exactly one node listed before it.
    pub fn from_records(records: Vec<NodeRecord>) -> Result<Node, CartError> {
        let n_records = records.len();
        let mut built: Vec<Option<Node>> = (0..n_records).map(|_| None).collect();
        // Children always come after their parent, so build from the back.
        for (num, record) in records.into_iter().enumerate().rev() {
            let node = match record {
                NodeRecord::Leaf { value } => Node::leaf(value),
                NodeRecord::Split {
                    split_feature,
                    split_value,
                    left_child,
                    right_child,
                } => {
                    let left = take_child(&mut built, num, left_child)?;
                    let right = take_child(&mut built, num, right_child)?;
                    Node::split(split_feature, split_value, left, right)
                }
            };
            built[num] = Some(node);
        }
        let root = built
            .first_mut()
            .and_then(Option::take)
            .ok_or_else(|| CartError::CorruptTree("no nodes".to_string()))?;
        if let Some(orphan) = built.iter().position(Option::is_some) {
            return Err(CartError::CorruptTree(format!(
                "node {} is not reachable from the root",
                orphan
            )));
        }
        Ok(root)
    }

    fn fmt_depth(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        let indent = "      ".repeat(depth);
        match self {
            Node::Leaf { value } => writeln!(f, "{}leaf={}", indent, value),
            Node::Split {
                split_feature,
                split_value,
                left,
                right,
            } => {
                writeln!(f, "{}[{} < {}]", indent, split_feature, split_value)?;
                left.fmt_depth(f, depth + 1)?;
                right.fmt_depth(f, depth + 1)
            }
        }
    }
}

fn take_child(built: &mut [Option<Node>], parent: usize, child: usize) -> Result<Node, CartError> {
    if child <= parent || child >= built.len() {
        return Err(CartError::CorruptTree(format!(
            "node {} references child {} out of range",
            parent, child
        )));
    }
    built[child].take().ok_or_else(|| {
        CartError::CorruptTree(format!("node {} is the child of more than one node", child))
    })
}

/// Serialized form of a [`Node`], children are positions in the node list.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub enum NodeRecord {
    Leaf {
        value: f64,
    },
    Split {
        split_feature: usize,
        split_value: f64,
        left_child: usize,
        right_child: usize,
    },
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_depth(f, 0)
    }
}
