use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::model::{DecisionTree, ForestError, MODEL_VERSION, RandomForestModel, TreeNode};

/// Training hyperparameters for the forest.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Number of trees in the ensemble.
    pub n_trees: usize,
    /// Seed for bootstrapping and feature subsampling.
    pub seed: u64,
    /// Depth limit; `None` grows trees until leaves are pure.
    pub max_depth: Option<usize>,
    /// Nodes with fewer samples become leaves.
    pub min_samples_split: usize,
    /// Features considered per split; `None` means `floor(sqrt(n_features))`.
    pub max_features: Option<usize>,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
        }
    }
}

/// In-memory dataset used for training and evaluation.
#[derive(Debug, Clone)]
pub struct TrainDataset {
    /// Feature names in vector order.
    pub feature_names: Vec<String>,
    /// Ordered list of class labels.
    pub classes: Vec<String>,
    /// Feature matrix, row-major.
    pub x: Vec<Vec<f32>>,
    /// Class indices aligned with `x`.
    pub y: Vec<usize>,
}

impl TrainDataset {
    /// Copy out the rows at `indices`.
    pub fn subset(&self, indices: &[usize]) -> TrainDataset {
        TrainDataset {
            feature_names: self.feature_names.clone(),
            classes: self.classes.clone(),
            x: indices.iter().map(|&i| self.x[i].clone()).collect(),
            y: indices.iter().map(|&i| self.y[i]).collect(),
        }
    }

    fn validate(&self) -> Result<(), ForestError> {
        if self.x.len() != self.y.len() {
            return Err(ForestError::MismatchedLengths {
                x: self.x.len(),
                y: self.y.len(),
            });
        }
        if self.x.is_empty() {
            return Err(ForestError::Empty);
        }
        let n_classes = self.classes.len();
        if n_classes < 2 {
            return Err(ForestError::TooFewClasses(n_classes));
        }
        let expected = self.feature_names.len();
        for (row, (features, &label)) in self.x.iter().zip(&self.y).enumerate() {
            if features.len() != expected {
                return Err(ForestError::RaggedFeatures {
                    row,
                    len: features.len(),
                    expected,
                });
            }
            if label >= n_classes {
                return Err(ForestError::LabelOutOfRange {
                    row,
                    label,
                    n_classes,
                });
            }
        }
        Ok(())
    }
}

/// Train a random forest. The same dataset, options and seed always yield
/// the same model.
pub fn train_random_forest(
    dataset: &TrainDataset,
    options: &TrainOptions,
) -> Result<RandomForestModel, ForestError> {
    dataset.validate()?;
    if options.n_trees == 0 {
        return Err(ForestError::InvalidOptions("n_trees must be at least 1".into()));
    }
    if options.min_samples_split < 2 {
        return Err(ForestError::InvalidOptions(
            "min_samples_split must be at least 2".into(),
        ));
    }
    let n_features = dataset.feature_names.len();
    let max_features = options
        .max_features
        .unwrap_or_else(|| (n_features as f64).sqrt().floor() as usize)
        .clamp(1, n_features.max(1));

    let mut master = StdRng::seed_from_u64(options.seed);
    let n = dataset.x.len();
    let mut trees = Vec::with_capacity(options.n_trees);
    for _ in 0..options.n_trees {
        let mut rng = StdRng::seed_from_u64(master.random::<u64>());
        let sample: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
        let mut builder = TreeBuilder {
            dataset,
            options,
            max_features,
            rng: &mut rng,
            nodes: Vec::new(),
        };
        builder.grow(sample, 0);
        trees.push(DecisionTree {
            nodes: builder.nodes,
        });
    }

    tracing::debug!(
        "Trained {} trees (max depth {})",
        trees.len(),
        trees.iter().map(DecisionTree::depth).max().unwrap_or(0)
    );

    Ok(RandomForestModel {
        model_version: MODEL_VERSION,
        feature_names: dataset.feature_names.clone(),
        classes: dataset.classes.clone(),
        seed: options.seed,
        trees,
    })
}

struct TreeBuilder<'a> {
    dataset: &'a TrainDataset,
    options: &'a TrainOptions,
    max_features: usize,
    rng: &'a mut StdRng,
    nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Copy)]
struct BestSplit {
    /// Sum of child Gini impurities weighted by child size.
    score: f64,
    feature_index: usize,
    threshold: f32,
}

impl TreeBuilder<'_> {
    /// Append the subtree for `samples` and return its root index.
    fn grow(&mut self, samples: Vec<usize>, depth: usize) -> u32 {
        let counts = self.class_counts(&samples);
        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let depth_reached = self.options.max_depth.is_some_and(|max| depth >= max);
        let too_small = samples.len() < self.options.min_samples_split;
        if pure || depth_reached || too_small {
            return self.push_leaf(&counts, samples.len());
        }
        let Some(split) = self.find_split(&samples) else {
            return self.push_leaf(&counts, samples.len());
        };

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| self.dataset.x[i][split.feature_index] <= split.threshold);

        let idx = self.nodes.len();
        // Placeholder until both children exist.
        self.nodes.push(TreeNode::Leaf {
            class_probs: Vec::new(),
        });
        let left_idx = self.grow(left, depth + 1);
        let right_idx = self.grow(right, depth + 1);
        self.nodes[idx] = TreeNode::Split {
            feature_index: split.feature_index as u16,
            threshold: split.threshold,
            left: left_idx,
            right: right_idx,
        };
        idx as u32
    }

    fn push_leaf(&mut self, counts: &[usize], total: usize) -> u32 {
        let total = total.max(1) as f32;
        self.nodes.push(TreeNode::Leaf {
            class_probs: counts.iter().map(|&c| c as f32 / total).collect(),
        });
        (self.nodes.len() - 1) as u32
    }

    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.dataset.classes.len()];
        for &i in samples {
            counts[self.dataset.y[i]] += 1;
        }
        counts
    }

    /// Visit features in random order until `max_features` have been tried
    /// and at least one valid split was found.
    fn find_split(&mut self, samples: &[usize]) -> Option<BestSplit> {
        let mut features: Vec<usize> = (0..self.dataset.feature_names.len()).collect();
        features.shuffle(&mut *self.rng);
        let mut best: Option<BestSplit> = None;
        for (visited, feature_index) in features.into_iter().enumerate() {
            if visited >= self.max_features && best.is_some() {
                break;
            }
            if let Some(candidate) = self.best_split_for_feature(samples, feature_index) {
                if best.is_none_or(|current| candidate.score < current.score) {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    fn best_split_for_feature(&self, samples: &[usize], feature_index: usize) -> Option<BestSplit> {
        let n_classes = self.dataset.classes.len();
        let mut pairs: Vec<(f32, usize)> = samples
            .iter()
            .map(|&i| (self.dataset.x[i][feature_index], self.dataset.y[i]))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut right_counts = vec![0usize; n_classes];
        for &(_, label) in &pairs {
            right_counts[label] += 1;
        }
        let mut left_counts = vec![0usize; n_classes];
        let total = pairs.len();
        let mut best: Option<BestSplit> = None;

        for pos in 0..total.saturating_sub(1) {
            let (value, label) = pairs[pos];
            left_counts[label] += 1;
            right_counts[label] -= 1;
            let next = pairs[pos + 1].0;
            if value >= next {
                continue;
            }
            let left_n = pos + 1;
            let right_n = total - left_n;
            let score = left_n as f64 * gini(&left_counts, left_n)
                + right_n as f64 * gini(&right_counts, right_n);
            if best.is_none_or(|current| score < current.score) {
                best = Some(BestSplit {
                    score,
                    feature_index,
                    threshold: midpoint(value, next),
                });
            }
        }
        best
    }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// Threshold between two adjacent distinct values such that `low <= t < high`.
fn midpoint(low: f32, high: f32) -> f32 {
    let mid = low + (high - low) / 2.0;
    if mid < high { mid } else { low }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> TrainDataset {
        // Class is decided by feature 1 alone; feature 0 is noise.
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..60 {
            let noise = (i * 7 % 13) as f32;
            let signal = (i % 3) as f32 * 10.0 + (i % 5) as f32 * 0.1;
            x.push(vec![noise, signal]);
            y.push(i % 3);
        }
        TrainDataset {
            feature_names: vec!["noise".into(), "signal".into()],
            classes: vec!["a".into(), "b".into(), "c".into()],
            x,
            y,
        }
    }

    fn options(n_trees: usize) -> TrainOptions {
        TrainOptions {
            n_trees,
            ..TrainOptions::default()
        }
    }

    #[test]
    fn learns_separable_classes() {
        let data = dataset();
        let model = train_random_forest(
            &data,
            &TrainOptions {
                max_features: Some(2),
                ..options(15)
            },
        )
        .unwrap();
        assert_eq!(model.trees.len(), 15);
        model.validate().unwrap();
        assert_eq!(model.predict_class_index(&[3.0, 0.2]), 0);
        assert_eq!(model.predict_class_index(&[3.0, 10.3]), 1);
        assert_eq!(model.predict_class_index(&[3.0, 20.1]), 2);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let model = train_random_forest(&dataset(), &options(10)).unwrap();
        for row in &dataset().x {
            let probs = model.predict_proba(row);
            assert_eq!(probs.len(), 3);
            let sum: f32 = probs.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn same_seed_same_forest() {
        let data = dataset();
        let a = train_random_forest(&data, &options(8)).unwrap();
        let b = train_random_forest(&data, &options(8)).unwrap();
        assert_eq!(a, b);
        let c = train_random_forest(
            &data,
            &TrainOptions {
                seed: 7,
                ..options(8)
            },
        )
        .unwrap();
        assert_eq!(c.seed, 7);
    }

    #[test]
    fn max_depth_is_respected() {
        let model = train_random_forest(
            &dataset(),
            &TrainOptions {
                max_depth: Some(1),
                ..options(5)
            },
        )
        .unwrap();
        assert!(model.trees.iter().all(|tree| tree.depth() <= 1));
    }

    #[test]
    fn constant_features_produce_single_leaf() {
        let data = TrainDataset {
            feature_names: vec!["x".into()],
            classes: vec!["a".into(), "b".into()],
            x: vec![vec![1.0]; 4],
            y: vec![0, 1, 0, 1],
        };
        let model = train_random_forest(&data, &options(3)).unwrap();
        assert!(model.trees.iter().all(|tree| tree.nodes.len() == 1));
    }

    #[test]
    fn rejects_invalid_input() {
        let mut data = dataset();
        data.y.pop();
        assert!(matches!(
            train_random_forest(&data, &options(1)),
            Err(ForestError::MismatchedLengths { .. })
        ));

        let mut data = dataset();
        data.y[0] = 9;
        assert!(matches!(
            train_random_forest(&data, &options(1)),
            Err(ForestError::LabelOutOfRange { row: 0, .. })
        ));

        let mut data = dataset();
        data.x[4] = vec![1.0];
        assert!(matches!(
            train_random_forest(&data, &options(1)),
            Err(ForestError::RaggedFeatures { row: 4, .. })
        ));

        assert!(matches!(
            train_random_forest(&dataset(), &options(0)),
            Err(ForestError::InvalidOptions(_))
        ));
    }

    #[test]
    fn gini_and_midpoint_helpers() {
        assert_eq!(gini(&[2, 0], 2), 0.0);
        assert!((gini(&[1, 1], 2) - 0.5).abs() < 1e-12);
        assert_eq!(midpoint(1.0, 3.0), 2.0);
        let low = 1.0f32;
        let high = f32::from_bits(low.to_bits() + 1);
        assert_eq!(midpoint(low, high), low);
    }
}
