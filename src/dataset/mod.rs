//! Historical crop records and their numeric encoding for training.

mod encoded;
mod records;
mod split;

pub use encoded::EncodedDataset;
pub use records::{DatasetError, TrainingRecord, load_records, read_records};
pub use split::{Split, train_test_split};

/// Number of values in each feature vector.
pub const FEATURE_LEN: usize = 5;

/// Column names of the feature vector, in order.
pub const FEATURE_NAMES: [&str; FEATURE_LEN] = [
    "District_encoded",
    "Soil_encoded",
    "Temperature_C",
    "Rainfall_mm",
    "Humidity_%",
];
