use super::Tree;
use crate::data::{validate_matrix, Matrix};
use crate::errors::CartError;
use crate::node::Node;
use rayon::prelude::*;

impl Tree {
    /// Walk from the root to a leaf.
    ///
    /// * `width` - Number of features of the sample.
    /// * `get` - Value of a feature of the sample.
    fn traverse<F>(&self, width: usize, get: F) -> Result<f64, CartError>
    where
        F: Fn(usize) -> f64,
    {
        let mut node = self.root.as_ref().ok_or(CartError::NotFitted)?;
        loop {
            match node {
                Node::Leaf { value } => return Ok(*value),
                Node::Split {
                    split_feature,
                    split_value,
                    left,
                    right,
                } => {
                    if *split_feature >= width {
                        return Err(CartError::FeatureIndexOutOfRange(*split_feature, width));
                    }
                    node = if get(*split_feature) < *split_value {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }

    /// Predict the label of a single sample.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, CartError> {
        self.traverse(row.len(), |j| row[j])
    }

    /// Predict every row of a matrix, in row order.
    ///
    /// * `data` - The feature matrix.
    /// * `parallel` - Spread the rows over the rayon thread pool.
    ///
    /// Returns [`CartError::InvalidShape`] when the buffer of `data` does not
    /// hold exactly `rows * cols` values.
    pub fn predict(&self, data: &Matrix<f64>, parallel: bool) -> Result<Vec<f64>, CartError> {
        if !self.is_fitted() {
            return Err(CartError::NotFitted);
        }
        validate_matrix(data)?;
        if parallel {
            data.index
                .par_iter()
                .map(|i| self.traverse(data.cols, |j| *data.get(*i, j)))
                .collect()
        } else {
            data.index
                .iter()
                .map(|i| self.traverse(data.cols, |j| *data.get(*i, j)))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::flatten_rows;

    fn predict_rows(tree: &Tree, x: &[Vec<f64>], parallel: bool) -> Result<Vec<f64>, CartError> {
        let (flat, rows, cols) = flatten_rows(x).unwrap();
        let data = Matrix::new(&flat, rows, cols);
        tree.predict(&data, parallel)
    }

    #[test]
    fn test_predict_single_split() {
        let tree = Tree::from_root(Some(Node::split(0, 1.5, Node::leaf(0.0), Node::leaf(1.0))));
        let x = vec![vec![1.0], vec![2.0]];
        assert_eq!(predict_rows(&tree, &x, false).unwrap(), vec![0.0, 1.0]);
        assert_eq!(tree.predict_row(&[1.5]).unwrap(), 1.0);
    }

    #[test]
    fn test_predict_two_levels() {
        let tree = Tree::from_root(Some(Node::split(
            1,
            3.5,
            Node::split(0, 2.5, Node::leaf(0.0), Node::leaf(1.0)),
            Node::leaf(2.0),
        )));
        let x = vec![vec![1.0, 4.0], vec![3.0, 2.0]];
        assert_eq!(predict_rows(&tree, &x, false).unwrap(), vec![2.0, 1.0]);
        assert_eq!(predict_rows(&tree, &x, true).unwrap(), vec![2.0, 1.0]);
    }

    #[test]
    fn test_predict_not_fitted() {
        let tree = Tree::new();
        assert!(matches!(tree.predict_row(&[1.0]), Err(CartError::NotFitted)));
        assert!(matches!(
            predict_rows(&tree, &[], false),
            Err(CartError::NotFitted)
        ));
    }

    #[test]
    fn test_predict_feature_out_of_range() {
        let tree = Tree::from_root(Some(Node::split(2, 0.5, Node::leaf(0.0), Node::leaf(1.0))));
        assert!(matches!(
            tree.predict_row(&[1.0, 2.0]),
            Err(CartError::FeatureIndexOutOfRange(2, 2))
        ));
        assert!(matches!(
            predict_rows(&tree, &[vec![1.0]], true),
            Err(CartError::FeatureIndexOutOfRange(2, 1))
        ));
    }

    #[test]
    fn test_predict_invalid_shape() {
        let tree = Tree::from_root(Some(Node::split(1, 2.5, Node::leaf(0.0), Node::leaf(1.0))));
        let flat = vec![1.0, 2.0, 3.0];
        let data = Matrix::new(&flat, 2, 2);
        for parallel in [false, true] {
            assert!(matches!(
                tree.predict(&data, parallel),
                Err(CartError::InvalidShape(_))
            ));
        }
        let data = Matrix::new(&flat, 3, 1);
        assert_eq!(tree.predict(&Matrix::new(&flat[..2], 1, 2), false).unwrap(), vec![0.0]);
        assert!(matches!(
            tree.predict(&data, false),
            Err(CartError::FeatureIndexOutOfRange(1, 1))
        ));
    }

    #[test]
    fn test_predict_only_visited_splits_need_features() {
        let tree = Tree::from_root(Some(Node::split(
            0,
            1.0,
            Node::leaf(5.0),
            Node::split(3, 1.0, Node::leaf(6.0), Node::leaf(7.0)),
        )));
        assert_eq!(tree.predict_row(&[0.0]).unwrap(), 5.0);
        assert!(tree.predict_row(&[2.0]).is_err());
    }
}
