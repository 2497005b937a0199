//! Trained model and encoders as a set of JSON files in one directory.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::dataset::FEATURE_LEN;
use crate::ml::encoder::LabelEncoder;
use crate::ml::forest::{ForestError, RandomForestModel};

pub const MODEL_FILE: &str = "crop_recommendation_model.json";
pub const DISTRICT_ENCODER_FILE: &str = "district_encoder.json";
pub const SOIL_ENCODER_FILE: &str = "soil_encoder.json";
pub const CROP_ENCODER_FILE: &str = "crop_encoder.json";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to create artifact directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to load encoder {path}: {message}")]
    Encoder { path: PathBuf, message: String },
    #[error(transparent)]
    Model(#[from] ForestError),
    #[error("Artifacts disagree: {0}")]
    Mismatch(String),
}

/// Everything inference needs from training.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactSet {
    pub model: RandomForestModel,
    pub district: LabelEncoder,
    pub soil: LabelEncoder,
    pub crop: LabelEncoder,
}

impl ArtifactSet {
    /// Check that the model and the crop encoder describe the same classes.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.model.classes != self.crop.classes() {
            return Err(ArtifactError::Mismatch(
                "model classes differ from crop encoder classes".to_string(),
            ));
        }
        if self.model.feature_len() != FEATURE_LEN {
            return Err(ArtifactError::Mismatch(format!(
                "model expects {} features, inference provides {FEATURE_LEN}",
                self.model.feature_len()
            )));
        }
        Ok(())
    }

    /// Write all four files into `dir`, creating it if needed.
    pub fn save(&self, dir: &Path) -> Result<(), ArtifactError> {
        std::fs::create_dir_all(dir).map_err(|source| ArtifactError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        write_json(&dir.join(MODEL_FILE), &self.model)?;
        write_json(&dir.join(DISTRICT_ENCODER_FILE), &self.district)?;
        write_json(&dir.join(SOIL_ENCODER_FILE), &self.soil)?;
        write_json(&dir.join(CROP_ENCODER_FILE), &self.crop)?;
        tracing::info!("Saved model and encoders to {}", dir.display());
        Ok(())
    }

    /// Load and cross-check all four files from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let set = Self {
            model: RandomForestModel::load_json(&dir.join(MODEL_FILE))?,
            district: load_encoder(&dir.join(DISTRICT_ENCODER_FILE))?,
            soil: load_encoder(&dir.join(SOIL_ENCODER_FILE))?,
            crop: load_encoder(&dir.join(CROP_ENCODER_FILE))?,
        };
        set.validate()?;
        tracing::info!(
            "Loaded {} trees, {} districts, {} soils, {} crops from {}",
            set.model.trees.len(),
            set.district.len(),
            set.soil.len(),
            set.crop.len(),
            dir.display()
        );
        Ok(set)
    }
}

fn load_encoder(path: &Path) -> Result<LabelEncoder, ArtifactError> {
    LabelEncoder::load_json(path).map_err(|message| ArtifactError::Encoder {
        path: path.to_path_buf(),
        message,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| ArtifactError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, bytes).map_err(|source| ArtifactError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{EncodedDataset, TrainingRecord};
    use crate::ml::forest::{TrainOptions, train_random_forest};
    use tempfile::tempdir;

    fn artifacts() -> ArtifactSet {
        let records: Vec<TrainingRecord> = [
            ("Mandya", "Red Soil", 27.0, 900.0, 80.0, "Paddy"),
            ("Dharwad", "Black Soil", 32.0, 450.0, 50.0, "Cotton"),
            ("Tumakuru", "Red Soil", 29.0, 550.0, 60.0, "Ragi"),
            ("Mandya", "Red Soil", 26.0, 950.0, 82.0, "Paddy"),
        ]
        .into_iter()
        .map(|(d, s, t, r, h, c)| TrainingRecord {
            district: d.into(),
            soil_type: s.into(),
            temperature_c: t,
            rainfall_mm: r,
            humidity_pct: h,
            crop: c.into(),
        })
        .collect();
        let encoded = EncodedDataset::fit(&records).unwrap();
        let options = TrainOptions {
            n_trees: 3,
            ..TrainOptions::default()
        };
        ArtifactSet {
            model: train_random_forest(&encoded.data, &options).unwrap(),
            district: encoded.district,
            soil: encoded.soil,
            crop: encoded.crop,
        }
    }

    #[test]
    fn saved_artifacts_load_back() {
        let dir = tempdir().unwrap();
        let set = artifacts();
        set.save(dir.path()).unwrap();
        for file in [MODEL_FILE, DISTRICT_ENCODER_FILE, SOIL_ENCODER_FILE, CROP_ENCODER_FILE] {
            assert!(dir.path().join(file).is_file(), "{file} missing");
        }
        assert_eq!(ArtifactSet::load(dir.path()).unwrap(), set);
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempdir().unwrap();
        artifacts().save(dir.path()).unwrap();
        std::fs::remove_file(dir.path().join(SOIL_ENCODER_FILE)).unwrap();
        assert!(matches!(
            ArtifactSet::load(dir.path()),
            Err(ArtifactError::Encoder { .. })
        ));
    }

    #[test]
    fn mismatched_crop_encoder_is_rejected() {
        let mut set = artifacts();
        set.crop = LabelEncoder::fit("Crop", ["Maize", "Wheat"]).unwrap();
        assert!(matches!(set.validate(), Err(ArtifactError::Mismatch(_))));
    }
}
