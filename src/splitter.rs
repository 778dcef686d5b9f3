//! Splitter
//!
//! Exhaustive search for the binary split of a node that minimizes the
//! weighted gini impurity of its children.
use crate::data::Matrix;
use crate::impurity::weighted_gini;

/// The best split found for a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitInfo {
    /// Column the split is made on.
    pub split_feature: usize,
    /// Rows with a value strictly less than this go left.
    pub split_value: f64,
    /// Weighted gini impurity of the two children.
    pub impurity: f64,
}

/// Distinct values of a column over the rows in `index`, sorted ascending.
pub fn candidate_values(data: &Matrix<f64>, index: &[usize], feature: usize) -> Vec<f64> {
    let mut values: Vec<f64> = index.iter().map(|i| *data.get(*i, feature)).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    values
}

/// Find the split with the lowest weighted impurity.
///
/// Every distinct value of every feature is tried as a threshold, features
/// in ascending order and values in ascending order. Thresholds that leave
/// one side empty are skipped. A candidate replaces the current best only
/// when its impurity is strictly lower than the best so far (starting at
/// 1.0), so ties go to the lowest feature and then the lowest threshold.
///
/// `None` means no split separates the rows: zero features, zero rows, or
/// every row sharing the same feature values.
///
/// * `data` - The feature matrix.
/// * `y` - Labels of every row of `data`.
/// * `index` - The rows belonging to the node being split.
pub fn find_best_split(data: &Matrix<f64>, y: &[f64], index: &[usize]) -> Option<SplitInfo> {
    if data.cols == 0 || index.is_empty() {
        return None;
    }

    let mut best: Option<SplitInfo> = None;
    let mut best_impurity = 1.0;
    let mut left_y = Vec::with_capacity(index.len());
    let mut right_y = Vec::with_capacity(index.len());

    for feature in 0..data.cols {
        let col = data.get_col(feature);
        for value in candidate_values(data, index, feature) {
            left_y.clear();
            right_y.clear();
            for i in index {
                if col[*i] < value {
                    left_y.push(y[*i]);
                } else {
                    right_y.push(y[*i]);
                }
            }
            if left_y.is_empty() || right_y.is_empty() {
                continue;
            }
            let impurity = weighted_gini(&left_y, &right_y);
            if impurity < best_impurity {
                best_impurity = impurity;
                best = Some(SplitInfo {
                    split_feature: feature,
                    split_value: value,
                    impurity,
                });
            }
        }
    }
    best
}

/// Partition rows by `row[feature] < threshold`, keeping their order.
///
/// Returns the left and right row indices, every row of `index` lands in
/// exactly one of them.
pub fn split_dataset(data: &Matrix<f64>, index: &[usize], feature: usize, threshold: f64) -> (Vec<usize>, Vec<usize>) {
    let col = data.get_col(feature);
    index.iter().copied().partition(|i| col[*i] < threshold)
}

/// Labels of the given rows, in order.
pub fn split_labels(y: &[f64], index: &[usize]) -> Vec<f64> {
    index.iter().map(|i| y[*i]).collect()
}
