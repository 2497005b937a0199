//! Deterministic random-forest classifier.
//!
//! - Bootstrap-sampled CART trees split on Gini impurity.
//! - A seeded RNG drives both bootstrapping and per-split feature subsets,
//!   so a fixed seed reproduces the same forest.
//! - Models round-trip through JSON and are validated on load.

mod model;
mod train;

pub use model::{DecisionTree, ForestError, RandomForestModel, TreeNode};
pub use train::{TrainDataset, TrainOptions, train_random_forest};
