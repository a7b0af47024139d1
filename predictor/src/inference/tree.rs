use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::{check_width, ModelError, Regressor};

/// One node of a flattened decision tree. Node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go to `left` when `row[feature] <= threshold`, otherwise to `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf { value: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        let len = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} but the model has {} features",
                            idx, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", idx));
                    }
                    // Children must come after their parent so evaluation always terminates.
                    for child in [left, right] {
                        if child <= idx || child >= len {
                            return Err(format!("node {} has invalid child index {}", idx, child));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has a non-finite value", idx));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf.
    fn evaluate(&self, row: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row.get(*feature).ok_or_else(|| {
                        ModelError::Evaluation(format!(
                            "node {} reads feature {} outside the row",
                            idx, feature
                        ))
                    })?;
                    let next = if *value <= *threshold { *left } else { *right };
                    if next <= idx {
                        return Err(ModelError::Evaluation(format!(
                            "node {} points back to node {}",
                            idx, next
                        )));
                    }
                    idx = next;
                }
                None => {
                    return Err(ModelError::Evaluation(format!(
                        "tree references missing node {}",
                        idx
                    )))
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Gradient boosting: `base_score + learning_rate * sum(trees)`.
    #[default]
    Sum,
    /// Random forest: `base_score + mean(trees)`.
    Mean,
}

/// An ensemble of regression trees over a fixed number of features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_features: usize,
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    pub trees: Vec<Tree>,
}

fn default_learning_rate() -> f64 {
    1.0
}

impl TreeEnsemble {
    pub fn validate(&self) -> Result<(), String> {
        if self.n_features == 0 {
            return Err("tree ensemble declares zero features".to_string());
        }
        if self.trees.is_empty() {
            return Err("tree ensemble has no trees".to_string());
        }
        if !self.base_score.is_finite() || !self.learning_rate.is_finite() {
            return Err("base_score and learning_rate must be finite".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    fn score_row(&self, row: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.evaluate(row)?;
        }
        Ok(match self.aggregation {
            Aggregation::Sum => self.base_score + self.learning_rate * total,
            Aggregation::Mean => self.base_score + total / self.trees.len() as f64,
        })
    }
}

impl Regressor for TreeEnsemble {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn describe(&self) -> String {
        let kind = match self.aggregation {
            Aggregation::Sum => "gradient_boosting",
            Aggregation::Mean => "random_forest",
        };
        format!("{}({} trees)", kind, self.trees.len())
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Array1<f64>, ModelError> {
        check_width(&rows, self.n_features)?;
        rows.outer_iter()
            .map(|row| self.score_row(row))
            .collect::<Result<Vec<_>, _>>()
            .map(Array1::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> Tree {
        Tree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: low },
                TreeNode::Leaf { value: high },
            ],
        }
    }

    fn ensemble(aggregation: Aggregation) -> TreeEnsemble {
        TreeEnsemble {
            n_features: 2,
            aggregation,
            base_score: 1.0,
            learning_rate: 0.5,
            trees: vec![stump(0, 30.0, 1.0, 3.0), stump(1, 0.5, 0.0, 2.0)],
        }
    }

    #[test]
    fn test_sum_aggregation() {
        let model = ensemble(Aggregation::Sum);
        let rows = array![[25.0, 0.0], [45.0, 1.0]];

        let out = model.predict(rows.view()).unwrap();

        // 1.0 + 0.5 * (1.0 + 0.0) and 1.0 + 0.5 * (3.0 + 2.0)
        assert_eq!(out.to_vec(), vec![1.5, 3.5]);
    }

    #[test]
    fn test_mean_aggregation() {
        let model = ensemble(Aggregation::Mean);
        let rows = array![[45.0, 1.0]];

        let out = model.predict(rows.view()).unwrap();

        assert_eq!(out.to_vec(), vec![1.0 + 2.5]);
    }

    #[test]
    fn test_threshold_goes_left() {
        let model = TreeEnsemble {
            n_features: 1,
            aggregation: Aggregation::Sum,
            base_score: 0.0,
            learning_rate: 1.0,
            trees: vec![stump(0, 30.0, -1.0, 1.0)],
        };
        let out = model.predict(array![[30.0]].view()).unwrap();
        assert_eq!(out[0], -1.0);
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let mut model = ensemble(Aggregation::Sum);
        model.trees[0].nodes[0] = TreeNode::Split {
            feature: 0,
            threshold: 1.0,
            left: 0,
            right: 2,
        };
        let err = model.validate().unwrap_err();
        assert!(err.contains("invalid child index 0"), "{}", err);
    }

    #[test]
    fn test_validate_rejects_out_of_range_feature() {
        let mut model = ensemble(Aggregation::Sum);
        model.trees[1] = stump(5, 0.0, 0.0, 0.0);
        assert!(model.validate().unwrap_err().contains("feature 5"));
    }

    #[test]
    fn test_validate_rejects_child_past_end() {
        let mut model = ensemble(Aggregation::Sum);
        model.trees[0].nodes[0] = TreeNode::Split {
            feature: 0,
            threshold: 1.0,
            left: 1,
            right: 3,
        };
        let err = model.validate().unwrap_err();
        assert!(err.contains("invalid child index 3"), "{}", err);
    }

    #[test]
    fn test_validate_rejects_non_finite_threshold() {
        let mut model = ensemble(Aggregation::Sum);
        model.trees[1] = stump(1, f64::NAN, 0.0, 1.0);
        let err = model.validate().unwrap_err();
        assert!(err.contains("tree 1: node 0 has a non-finite threshold"), "{}", err);
    }

    #[test]
    fn test_validate_rejects_non_finite_leaf() {
        let mut model = ensemble(Aggregation::Sum);
        model.trees[0] = stump(0, 30.0, 1.0, f64::INFINITY);
        let err = model.validate().unwrap_err();
        assert!(err.contains("leaf 2 has a non-finite value"), "{}", err);
    }

    #[test]
    fn test_validate_rejects_non_finite_scalars() {
        let mut model = ensemble(Aggregation::Sum);
        model.base_score = f64::NAN;
        assert!(model.validate().unwrap_err().contains("must be finite"));

        let mut model = ensemble(Aggregation::Sum);
        model.learning_rate = f64::NEG_INFINITY;
        assert!(model.validate().unwrap_err().contains("must be finite"));
    }

    #[test]
    fn test_validate_rejects_empty() {
        let mut model = ensemble(Aggregation::Sum);
        model.trees.clear();
        assert!(model.validate().is_err());

        let mut model = ensemble(Aggregation::Sum);
        model.trees[0].nodes.clear();
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_node_deserialization() {
        let nodes: Vec<TreeNode> = serde_json::from_str(
            r#"[{"feature": 4, "threshold": 0.5, "left": 1, "right": 2}, {"value": 3.9}]"#,
        )
        .unwrap();
        assert_eq!(
            nodes[0],
            TreeNode::Split {
                feature: 4,
                threshold: 0.5,
                left: 1,
                right: 2
            }
        );
        assert_eq!(nodes[1], TreeNode::Leaf { value: 3.9 });
    }
}
