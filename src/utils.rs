use hashbrown::HashMap;

/// Create a string of all available items.
pub fn items_to_strings(items: Vec<&str>) -> String {
    let mut s = String::new();
    for i in items {
        s.push_str(i);
        s.push_str(&String::from(", "));
    }
    s
}

/// Hashable key for a label, labels are compared by exact equality
/// so `0.0` and `-0.0` share a key.
#[inline]
pub fn label_key(v: f64) -> u64 {
    if v == 0.0 {
        0.0_f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// Count how many times each distinct label occurs.
pub fn label_counts<'a, I>(labels: I) -> HashMap<u64, usize>
where
    I: IntoIterator<Item = &'a f64>,
{
    let mut counts = HashMap::new();
    for v in labels {
        *counts.entry(label_key(*v)).or_insert(0) += 1;
    }
    counts
}

/// Are all the labels equal to the first one?
/// An empty set of labels is homogeneous.
pub fn is_homogeneous(y: &[f64]) -> bool {
    match y.split_first() {
        Some((first, rest)) => rest.iter().all(|v| v == first),
        None => true,
    }
}

/// Most frequent label, scanning `y` in order.
///
/// The majority only changes when a count becomes strictly greater than
/// the current maximum, so on ties the label that reached the maximum
/// count first wins. Returns `0.0` for an empty slice.
pub fn majority_value(y: &[f64]) -> f64 {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    let mut max_count = 0;
    let mut majority = 0.0;
    for v in y {
        let c = counts.entry(label_key(*v)).or_insert(0);
        *c += 1;
        if *c > max_count {
            max_count = *c;
            majority = *v;
        }
    }
    majority
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_homogeneous() {
        assert!(is_homogeneous(&[1.0, 1.0, 1.0]));
        assert!(is_homogeneous(&[3.0]));
        assert!(is_homogeneous(&[]));
        assert!(is_homogeneous(&[0.0, -0.0]));
        assert!(!is_homogeneous(&[1.0, 1.0, 2.0]));
    }

    #[test]
    fn test_majority_value() {
        assert_eq!(majority_value(&[1.0, 2.0, 2.0, 3.0]), 2.0);
        assert_eq!(majority_value(&[5.0]), 5.0);
    }

    #[test]
    fn test_majority_value_first_to_reach_max() {
        // 2.0 reaches a count of two before 1.0 does.
        assert_eq!(majority_value(&[1.0, 2.0, 2.0, 1.0]), 2.0);
        assert_eq!(majority_value(&[1.0, 2.0, 1.0, 2.0]), 1.0);
        // Order dependent, not the numerically smallest label.
        assert_eq!(majority_value(&[3.0, 1.0]), 3.0);
    }

    #[test]
    fn test_label_counts() {
        let counts = label_counts(&[1.0, 0.0, -0.0, 1.0, 2.0]);
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&label_key(0.0)], 2);
        assert_eq!(counts[&label_key(1.0)], 2);
        assert_eq!(counts[&label_key(2.0)], 1);
    }
}
