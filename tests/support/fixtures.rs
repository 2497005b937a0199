use std::path::{Path, PathBuf};

/// Bundled sample training data.
pub fn sample_csv() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/karnataka_smart_crop_data.csv")
}

/// Bundled district coordinate table.
pub fn district_coords() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/karnataka_district_coords.json")
}
