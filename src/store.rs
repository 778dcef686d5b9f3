//! Store
//!
//! Persistence of trained trees. The encoding is configured locally through
//! [`ModelFormat`] and passed to every save call, nothing is registered
//! globally. The tree is written as a flat preorder list of tagged nodes,
//! each holding either its leaf value or its split and the positions of its
//! two children, and floats are written so they read back bit for bit.
use crate::errors::CartError;
use crate::tree::Tree;
use crate::utils::items_to_strings;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::str::FromStr;

/// How a model is encoded when saved.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelFormat {
    /// Compact JSON on a single line.
    #[default]
    Json,
    /// Indented JSON, easier to inspect by hand.
    JsonPretty,
}

impl FromStr for ModelFormat {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Json" => Ok(ModelFormat::Json),
            "JsonPretty" => Ok(ModelFormat::JsonPretty),
            _ => Err(CartError::ParseString(
                s.to_string(),
                "ModelFormat".to_string(),
                items_to_strings(vec!["Json", "JsonPretty"]),
            )),
        }
    }
}

/// Encode any serializable model to a writer.
pub fn save_value<T: Serialize, W: Write>(value: &T, writer: W, format: ModelFormat) -> Result<(), CartError> {
    let res = match format {
        ModelFormat::Json => serde_json::to_writer(writer, value),
        ModelFormat::JsonPretty => serde_json::to_writer_pretty(writer, value),
    };
    res.map_err(|e| {
        if e.is_io() {
            CartError::Io(e.into())
        } else {
            CartError::Serialize(e)
        }
    })
}

/// Decode any model from a reader.
pub fn load_value<T: DeserializeOwned, R: Read>(reader: R) -> Result<T, CartError> {
    serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            CartError::Io(e.into())
        } else {
            CartError::Deserialize(e)
        }
    })
}

/// Save a tree to a writer.
///
/// * `tree` - The tree to save, an absent root is saved as an empty node list.
/// * `writer` - Destination of the encoded tree.
/// * `format` - The encoding to use.
pub fn save<W: Write>(tree: &Tree, writer: W, format: ModelFormat) -> Result<(), CartError> {
    save_value(tree, writer, format)
}

/// Load a tree written by [`save`].
///
/// The tree statistics are recomputed from the loaded nodes.
pub fn load<R: Read>(reader: R) -> Result<Tree, CartError> {
    let mut tree: Tree = load_value(reader)?;
    tree.update_stats();
    Ok(tree)
}

/// Dump a tree as a json string.
pub fn to_json(tree: &Tree, format: ModelFormat) -> Result<String, CartError> {
    let res = match format {
        ModelFormat::Json => serde_json::to_string(tree),
        ModelFormat::JsonPretty => serde_json::to_string_pretty(tree),
    };
    res.map_err(CartError::Serialize)
}

/// Load a tree from a json string.
pub fn from_json(json_str: &str) -> Result<Tree, CartError> {
    load(json_str.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn two_level() -> Tree {
        Tree::from_root(Some(Node::split(
            1,
            3.5,
            Node::split(0, 2.5, Node::leaf(0.0), Node::leaf(1.0)),
            Node::leaf(2.0),
        )))
    }

    #[test]
    fn test_save_load() {
        let tree = two_level();
        for format in [ModelFormat::Json, ModelFormat::JsonPretty] {
            let mut buf = Vec::new();
            save(&tree, &mut buf, format).unwrap();
            let loaded = load(buf.as_slice()).unwrap();
            assert_eq!(loaded, tree);
        }
    }

    #[test]
    fn test_float_roundtrip() {
        let value = 0.1 + 0.2;
        let threshold = 1.0 / 3.0;
        let tree = Tree::from_root(Some(Node::split(0, threshold, Node::leaf(value), Node::leaf(-1e-300))));
        let loaded = from_json(&to_json(&tree, ModelFormat::Json).unwrap()).unwrap();
        match loaded.root.unwrap() {
            Node::Split {
                split_value, left, right, ..
            } => {
                assert_eq!(split_value.to_bits(), threshold.to_bits());
                assert_eq!(*left, Node::leaf(value));
                assert_eq!(*right, Node::leaf(-1e-300));
            }
            Node::Leaf { .. } => panic!("expected a split node"),
        }
    }

    #[test]
    fn test_absent_root() {
        let json = to_json(&Tree::new(), ModelFormat::Json).unwrap();
        let loaded = from_json(&json).unwrap();
        assert!(loaded.root.is_none());
    }

    #[test]
    fn test_load_recomputes_stats() {
        let mut tree = two_level();
        tree.depth = 10;
        tree.n_leaves = 0;
        let loaded = from_json(&to_json(&tree, ModelFormat::Json).unwrap()).unwrap();
        assert_eq!(loaded.depth, 2);
        assert_eq!(loaded.n_leaves, 3);
    }

    #[test]
    fn test_load_truncated() {
        let json = to_json(&two_level(), ModelFormat::Json).unwrap();
        let truncated = &json[..json.len() / 2];
        assert!(matches!(from_json(truncated), Err(CartError::Deserialize(_))));
    }

    #[test]
    fn test_load_corrupt() {
        // A split node without its right child field.
        let json = r#"{"nodes":[{"Split":{"split_feature":0,"split_value":1.5,"left_child":1}},{"Leaf":{"value":0.0}}],"depth":1,"n_leaves":2}"#;
        let err = from_json(json).unwrap_err();
        assert!(matches!(err, CartError::Deserialize(_)));
        assert!(err.to_string().contains("right_child"));

        // A split node pointing past the end of the node list.
        let json = r#"{"nodes":[{"Split":{"split_feature":0,"split_value":1.5,"left_child":1,"right_child":7}},{"Leaf":{"value":0.0}}],"depth":1,"n_leaves":2}"#;
        let err = from_json(json).unwrap_err();
        assert!(matches!(err, CartError::Deserialize(_)));
        assert!(err.to_string().contains("Corrupt tree"));

        assert!(matches!(from_json("not a model"), Err(CartError::Deserialize(_))));
    }

    #[test]
    fn test_save_load_deep() {
        let mut node = Node::leaf(0.0);
        for i in 0..1000 {
            node = Node::split(0, i as f64, Node::leaf(1.0), node);
        }
        let tree = Tree::from_root(Some(node));
        let mut buf = Vec::new();
        save(&tree, &mut buf, ModelFormat::Json).unwrap();
        let loaded = load(buf.as_slice()).unwrap();
        assert_eq!(loaded.depth, 1000);
        assert_eq!(loaded, tree);
    }

    #[test]
    fn test_model_format_from_str() {
        assert_eq!("Json".parse::<ModelFormat>().unwrap(), ModelFormat::Json);
        assert_eq!("JsonPretty".parse::<ModelFormat>().unwrap(), ModelFormat::JsonPretty);
        assert!(matches!(
            "Gob".parse::<ModelFormat>(),
            Err(CartError::ParseString(_, _, _))
        ));
    }
}
