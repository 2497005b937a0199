//! Machine learning building blocks: categorical encoders, the forest
//! classifier and evaluation metrics.

pub mod encoder;
pub mod forest;
pub mod metrics;
