//! Decision-forest inference (CPU-only).
//!
//! Trees are stored in flattened-array form, one entry per node, the way the
//! training-side exporter dumps the fitted estimator. Inference routes a
//! feature vector to a leaf per tree and averages the per-leaf class
//! distributions across trees.
//!
//! Design goals:
//! - Stable, deterministic, dependency-light.
//! - Explicit shape validation (fail fast, caller can refuse to serve).

use serde::{Deserialize, Serialize};

use crate::error::{GigstressError, Result};

/// A single fitted decision tree in flattened form.
///
/// `children_left[i] < 0` marks node `i` as a leaf; internal nodes route
/// `x[feature[i]] <= threshold[i]` to the left child, otherwise right.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i32>,
    pub children_right: Vec<i32>,
    pub feature: Vec<i32>,
    pub threshold: Vec<f64>,
    /// Per-node class distribution; only read at leaves, where it must be a
    /// normalized probability vector.
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> std::result::Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(format!(
                "tree arrays have inconsistent lengths (nodes={}, right={}, feature={}, threshold={}, value={})",
                n,
                self.children_right.len(),
                self.feature.len(),
                self.threshold.len(),
                self.value.len()
            ));
        }

        for i in 0..n {
            let left = self.children_left[i];
            let right = self.children_right[i];
            let is_leaf = left < 0;
            if is_leaf != (right < 0) {
                return Err(format!("node {i} has exactly one child"));
            }

            if is_leaf {
                let dist = &self.value[i];
                if dist.len() != n_classes {
                    return Err(format!(
                        "leaf {i} distribution has {} entries, expected {n_classes}",
                        dist.len()
                    ));
                }
                if dist.iter().any(|p| !p.is_finite() || *p < 0.0) {
                    return Err(format!("leaf {i} distribution contains invalid values"));
                }
                let sum: f64 = dist.iter().sum();
                if (sum - 1.0).abs() > 1e-6 {
                    return Err(format!("leaf {i} distribution sums to {sum}, expected 1.0"));
                }
            } else {
                // Children must point forward so traversal always terminates.
                for (label, child) in [("left", left), ("right", right)] {
                    if child as usize >= n || child as usize <= i {
                        return Err(format!("node {i} has out-of-order {label} child {child}"));
                    }
                }
                let feature = self.feature[i];
                if feature < 0 || feature as usize >= n_features {
                    return Err(format!(
                        "node {i} splits on feature {feature}, expected 0..{n_features}"
                    ));
                }
                if !self.threshold[i].is_finite() {
                    return Err(format!("node {i} has non-finite threshold"));
                }
            }
        }
        Ok(())
    }

    /// Route a feature vector to its leaf and return the leaf distribution.
    fn leaf_distribution(&self, input: &[f64]) -> &[f64] {
        let mut node = 0usize;
        while self.children_left[node] >= 0 {
            let feature = self.feature[node] as usize;
            node = if input[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        &self.value[node]
    }
}

/// A fitted random-forest classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
    /// Depth cap used at training time, carried for the info endpoint.
    #[serde(default)]
    pub max_depth: Option<u32>,
}

impl RandomForest {
    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn validate(&self, n_features: usize, n_classes: usize) -> std::result::Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        if n_classes == 0 {
            return Err("forest requires at least one class".to_string());
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features, n_classes)
                .map_err(|e| format!("tree[{idx}]: {e}"))?;
        }
        Ok(())
    }

    /// Mean per-class probability across all trees.
    ///
    /// The input must already be preprocessed to the encoded width the forest
    /// was fitted on.
    pub fn predict_proba(&self, input: &[f64], n_classes: usize) -> Result<Vec<f64>> {
        let mut probs = vec![0.0_f64; n_classes];
        for tree in &self.trees {
            let dist = tree.leaf_distribution(input);
            for (acc, p) in probs.iter_mut().zip(dist) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        for p in probs.iter_mut() {
            *p /= n;
        }
        if probs.iter().any(|p| !p.is_finite()) {
            return Err(GigstressError::Internal(
                "forest produced non-finite probabilities".to_string(),
            ));
        }
        Ok(probs)
    }
}

/// Index of the largest probability; ties resolve to the lowest index,
/// matching numpy argmax.
pub fn argmax(probs: &[f64]) -> usize {
    let mut best = 0;
    for (i, p) in probs.iter().enumerate().skip(1) {
        if *p > probs[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(split_feature: i32, threshold: f64, left: Vec<f64>, right: Vec<f64>) -> DecisionTree {
        DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![split_feature, -2, -2],
            threshold: vec![threshold, 0.0, 0.0],
            value: vec![vec![0.5, 0.5, 0.0], left, right],
        }
    }

    #[test]
    fn routes_to_expected_leaf() {
        let tree = stump(0, 0.5, vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 1.0]);
        assert_eq!(tree.leaf_distribution(&[0.4, 9.0]), &[1.0, 0.0, 0.0]);
        assert_eq!(tree.leaf_distribution(&[0.6, 9.0]), &[0.0, 0.0, 1.0]);
        // Boundary goes left, sklearn-style.
        assert_eq!(tree.leaf_distribution(&[0.5, 9.0]), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn averages_across_trees() {
        let forest = RandomForest {
            trees: vec![
                stump(0, 0.0, vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]),
                stump(0, 0.0, vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]),
            ],
            max_depth: Some(1),
        };
        forest.validate(1, 3).unwrap();
        let probs = forest.predict_proba(&[-1.0], 3).unwrap();
        assert_eq!(probs, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn argmax_prefers_lowest_index_on_tie() {
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), 0);
        assert_eq!(argmax(&[0.1, 0.2, 0.7]), 2);
    }

    #[test]
    fn rejects_backward_child_pointer() {
        let mut tree = stump(0, 0.0, vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 1.0]);
        tree.children_left[0] = 0;
        assert!(tree.validate(1, 3).is_err());
    }

    #[test]
    fn rejects_leaf_width_mismatch() {
        let tree = stump(0, 0.0, vec![1.0, 0.0], vec![0.0, 0.0, 1.0]);
        let err = tree.validate(1, 3).unwrap_err();
        assert!(err.contains("leaf 1"));
    }

    #[test]
    fn rejects_unnormalized_leaf() {
        let tree = stump(0, 0.0, vec![0.9, 0.3, 0.0], vec![0.0, 0.0, 1.0]);
        assert!(tree.validate(1, 3).is_err());
    }

    #[test]
    fn rejects_feature_out_of_range() {
        let forest = RandomForest {
            trees: vec![stump(4, 0.0, vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 1.0])],
            max_depth: None,
        };
        assert!(forest.validate(2, 3).is_err());
    }
}
