//! Impurity
//!
//! Gini impurity of a set of labels. Labels are treated as nominal classes
//! and grouped by exact equality, there is no tolerance on the comparison.
use crate::utils::label_counts;

/// Gini impurity, `1 - Σ p_c²` over the frequency `p_c` of each distinct label.
///
/// * `y` - The labels, order does not matter.
///
/// An empty set of labels is pure, so `gini(&[])` is `0.0`.
pub fn gini(y: &[f64]) -> f64 {
    let counts = label_counts(y);
    gini_from_counts(counts.values().copied(), y.len())
}

/// Gini impurity from precomputed class counts.
///
/// The squared counts are summed as integers, so the result does not
/// depend on the order the classes are visited in.
///
/// * `counts` - Number of samples in each class.
/// * `n` - Total number of samples, the sum of `counts`.
pub fn gini_from_counts<I>(counts: I, n: usize) -> f64
where
    I: IntoIterator<Item = usize>,
{
    if n == 0 {
        return 0.0;
    }
    let sum_sq: u128 = counts.into_iter().map(|c| (c as u128) * (c as u128)).sum();
    let total = (n as u128) * (n as u128);
    1.0 - sum_sq as f64 / total as f64
}

/// Sample-count-weighted impurity of a binary partition.
///
/// * `left` - Labels that went to the left child.
/// * `right` - Labels that went to the right child.
pub fn weighted_gini(left: &[f64], right: &[f64]) -> f64 {
    let n = (left.len() + right.len()) as f64;
    if n == 0.0 {
        return 0.0;
    }
    (gini(left) * left.len() as f64 + gini(right) * right.len() as f64) / n
}
