use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current on-disk model format.
pub const MODEL_VERSION: i64 = 1;

#[derive(Debug, Error)]
pub enum ForestError {
    #[error("Mismatched X/Y lengths ({x} rows, {y} labels)")]
    MismatchedLengths { x: usize, y: usize },
    #[error("Empty dataset")]
    Empty,
    #[error("Need at least 2 classes (got {0})")]
    TooFewClasses(usize),
    #[error("Row {row} has label {label} but only {n_classes} classes exist")]
    LabelOutOfRange {
        row: usize,
        label: usize,
        n_classes: usize,
    },
    #[error("Row {row} has {len} features, expected {expected}")]
    RaggedFeatures {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("Invalid training options: {0}")]
    InvalidOptions(String),
    #[error("Invalid model: {0}")]
    InvalidModel(String),
    #[error("Failed to read model {path}: {message}")]
    Load { path: String, message: String },
}

/// One node of a tree. Children always sit after their parent in `nodes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature_index: u16,
        /// Samples with `feature <= threshold` go left.
        threshold: f32,
        left: u32,
        right: u32,
    },
    Leaf {
        /// Class frequencies of the training samples that reached this leaf.
        class_probs: Vec<f32>,
    },
}

/// Binary decision tree stored as a flat node list rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walk to the leaf reached by `features` and return its class distribution.
    pub fn leaf_probs(&self, features: &[f32]) -> &[f32] {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { class_probs } => return class_probs,
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features
                        .get(*feature_index as usize)
                        .copied()
                        .unwrap_or(0.0);
                    idx = if value <= *threshold {
                        *left as usize
                    } else {
                        *right as usize
                    };
                }
            }
        }
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[TreeNode], idx: usize) -> usize {
            match &nodes[idx] {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => {
                    1 + walk(nodes, *left as usize).max(walk(nodes, *right as usize))
                }
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    fn validate(&self, n_classes: usize, feature_len: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Leaf { class_probs } => {
                    if class_probs.len() != n_classes {
                        return Err(format!(
                            "leaf {idx} has {} probabilities but expected {n_classes}",
                            class_probs.len()
                        ));
                    }
                }
                TreeNode::Split {
                    feature_index,
                    left,
                    right,
                    ..
                } => {
                    if *feature_index as usize >= feature_len {
                        return Err(format!(
                            "node {idx} splits on feature {feature_index} of {feature_len}"
                        ));
                    }
                    for child in [*left as usize, *right as usize] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {idx} has invalid child {child}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Bagged ensemble of decision trees for multi-class classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestModel {
    /// Model format version.
    pub model_version: i64,
    /// Feature names in vector order.
    pub feature_names: Vec<String>,
    /// Ordered list of class labels; probabilities follow this order.
    pub classes: Vec<String>,
    /// Seed the forest was trained with.
    pub seed: u64,
    pub trees: Vec<DecisionTree>,
}

impl RandomForestModel {
    pub fn feature_len(&self) -> usize {
        self.feature_names.len()
    }

    /// Validate structural invariants of the model.
    pub fn validate(&self) -> Result<(), ForestError> {
        if self.model_version != MODEL_VERSION {
            return Err(ForestError::InvalidModel(format!(
                "unsupported model_version {}",
                self.model_version
            )));
        }
        if self.classes.len() < 2 {
            return Err(ForestError::TooFewClasses(self.classes.len()));
        }
        if self.trees.is_empty() {
            return Err(ForestError::InvalidModel("forest has no trees".to_string()));
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate(self.classes.len(), self.feature_len())
                .map_err(|message| {
                    ForestError::InvalidModel(format!("tree {tree_idx}: {message}"))
                })?;
        }
        Ok(())
    }

    /// Load a model from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, ForestError> {
        let load_error = |message: String| ForestError::Load {
            path: path.display().to_string(),
            message,
        };
        let bytes = std::fs::read(path).map_err(|err| load_error(err.to_string()))?;
        let model: Self =
            serde_json::from_slice(&bytes).map_err(|err| load_error(err.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// Mean of the per-tree leaf distributions; sums to 1.
    pub fn predict_proba(&self, features: &[f32]) -> Vec<f32> {
        let n_classes = self.classes.len();
        let mut sums = vec![0.0f64; n_classes];
        for tree in &self.trees {
            for (sum, &p) in sums.iter_mut().zip(tree.leaf_probs(features)) {
                *sum += f64::from(p);
            }
        }
        let total: f64 = sums.iter().sum();
        if total <= 0.0 {
            return vec![1.0 / n_classes as f32; n_classes];
        }
        sums.into_iter().map(|s| (s / total) as f32).collect()
    }

    /// Predict the best class index for a feature vector.
    pub fn predict_class_index(&self, features: &[f32]) -> usize {
        argmax(&self.predict_proba(features))
    }
}

/// Index of the largest value; the first one wins ties.
pub(crate) fn argmax(values: &[f32]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f32::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}
