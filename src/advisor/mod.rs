//! Crop recommendation from a trained forest and its encoders.

mod ranking;
pub mod reasoning;

use thiserror::Error;

use crate::artifacts::ArtifactSet;
use crate::crops::{crop_reason_kn, crop_season};
use crate::dataset::FEATURE_LEN;
use crate::ml::encoder::EncoderError;

pub use ranking::top_k;

/// Number of crops reported: the main pick plus alternatives.
pub const TOP_CROPS: usize = 3;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Model knows {0} crops, at least {TOP_CROPS} are needed")]
    TooFewCrops(usize),
    #[error(transparent)]
    Encode(#[from] EncoderError),
    #[error("Non-finite {0} value")]
    NonFinite(&'static str),
}

/// One form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorInput {
    pub district: String,
    pub soil: String,
    pub temperature_c: f32,
    pub rainfall_mm: f32,
    pub humidity_pct: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CropScore {
    pub crop: String,
    pub probability: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub main: CropScore,
    /// Next best crops, most probable first.
    pub alternatives: Vec<CropScore>,
    /// Every crop in encoder order.
    pub probabilities: Vec<CropScore>,
    pub season: &'static str,
    pub reason_kn: &'static str,
    pub notes: Vec<String>,
}

impl Recommendation {
    /// Main crop followed by the alternatives.
    pub fn ranked(&self) -> impl Iterator<Item = &CropScore> {
        std::iter::once(&self.main).chain(self.alternatives.iter())
    }
}

/// Loaded artifacts ready to answer queries.
#[derive(Debug, Clone)]
pub struct Advisor {
    artifacts: ArtifactSet,
}

impl Advisor {
    pub fn new(artifacts: ArtifactSet) -> Result<Self, AdvisorError> {
        let crops = artifacts.crop.len();
        if crops < TOP_CROPS {
            return Err(AdvisorError::TooFewCrops(crops));
        }
        Ok(Self { artifacts })
    }

    pub fn districts(&self) -> &[String] {
        self.artifacts.district.classes()
    }

    pub fn soils(&self) -> &[String] {
        self.artifacts.soil.classes()
    }

    pub fn crops(&self) -> &[String] {
        self.artifacts.crop.classes()
    }

    /// Feature vector in training column order.
    pub fn encode(&self, input: &AdvisorInput) -> Result<[f32; FEATURE_LEN], AdvisorError> {
        for (name, value) in [
            ("temperature", input.temperature_c),
            ("rainfall", input.rainfall_mm),
            ("humidity", input.humidity_pct),
        ] {
            if !value.is_finite() {
                return Err(AdvisorError::NonFinite(name));
            }
        }
        let district = self.artifacts.district.transform(&input.district)?;
        let soil = self.artifacts.soil.transform(&input.soil)?;
        Ok([
            district as f32,
            soil as f32,
            input.temperature_c,
            input.rainfall_mm,
            input.humidity_pct,
        ])
    }

    pub fn recommend(&self, input: &AdvisorInput) -> Result<Recommendation, AdvisorError> {
        let features = self.encode(input)?;
        let probs = self.artifacts.model.predict_proba(&features);
        let score = |index: usize| -> Result<CropScore, AdvisorError> {
            Ok(CropScore {
                crop: self.artifacts.crop.inverse_transform(index)?.to_string(),
                probability: probs[index],
            })
        };

        let ranked = top_k(&probs, TOP_CROPS)
            .into_iter()
            .map(&score)
            .collect::<Result<Vec<_>, _>>()?;
        let probabilities = (0..probs.len())
            .map(&score)
            .collect::<Result<Vec<_>, _>>()?;
        let mut ranked = ranked.into_iter();
        let main = ranked.next().ok_or(AdvisorError::TooFewCrops(0))?;
        let alternatives: Vec<CropScore> = ranked.collect();

        tracing::info!(
            "Recommended {} ({:.1}%) for {} / {}",
            main.crop,
            main.probability * 100.0,
            input.district,
            input.soil
        );
        Ok(Recommendation {
            season: crop_season(&main.crop),
            reason_kn: crop_reason_kn(&main.crop),
            notes: reasoning::condition_notes(input),
            main,
            alternatives,
            probabilities,
        })
    }
}
