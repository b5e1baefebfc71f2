//! Donor pair enumeration.
//!
//! Pairs are the 2-combinations of the distinct donor labels, taken over the
//! labels in order of first appearance. For donors `[a, b, c]` this yields
//! `(a, b), (a, c), (b, c)`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Unordered pair of distinct donors, stored in enumeration order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DonorPair {
    pub first: String,
    pub second: String,
}

impl DonorPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.first == label || self.second == label
    }
}

/// Distinct labels in order of first appearance.
pub fn unique_in_order<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut donors = Vec::new();
    for label in labels {
        let label: &str = label.as_ref();
        if seen.insert(label) {
            donors.push(label.to_string());
        }
    }
    donors
}

/// All unordered pairs of distinct donors. Fewer than two donors gives an
/// empty list.
pub fn donor_pairs<S: AsRef<str>>(labels: &[S]) -> Vec<DonorPair> {
    let donors = unique_in_order(labels);
    let mut pairs = Vec::with_capacity(donors.len() * donors.len().saturating_sub(1) / 2);
    for (i, first) in donors.iter().enumerate() {
        for second in &donors[i + 1..] {
            pairs.push(DonorPair::new(first.clone(), second.clone()));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_order() {
        let labels = ["d2", "d1", "d2", "d3", "d1"];
        assert_eq!(unique_in_order(&labels), vec!["d2", "d1", "d3"]);

        let pairs = donor_pairs(&labels);
        assert_eq!(
            pairs,
            vec![
                DonorPair::new("d2", "d1"),
                DonorPair::new("d2", "d3"),
                DonorPair::new("d1", "d3"),
            ]
        );
    }

    #[test]
    fn test_pair_count() {
        for k in 0..8usize {
            let labels: Vec<String> = (0..k).flat_map(|d| vec![format!("donor_{d}"); 3]).collect();
            let pairs = donor_pairs(&labels);
            assert_eq!(pairs.len(), k * k.saturating_sub(1) / 2);

            let unique: HashSet<_> = pairs.iter().collect();
            assert_eq!(unique.len(), pairs.len());
            assert!(pairs.iter().all(|p| p.first != p.second));
        }
    }

    #[test]
    fn test_single_donor_has_no_pairs() {
        assert!(donor_pairs(&["only", "only"]).is_empty());
        assert!(donor_pairs::<&str>(&[]).is_empty());
    }
}
