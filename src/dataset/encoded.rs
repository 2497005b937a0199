use crate::ml::encoder::{EncoderError, LabelEncoder};
use crate::ml::forest::TrainDataset;

use super::{FEATURE_NAMES, TrainingRecord};

/// Records turned into numeric features, plus the encoders that did it.
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    pub district: LabelEncoder,
    pub soil: LabelEncoder,
    pub crop: LabelEncoder,
    pub data: TrainDataset,
}

impl EncodedDataset {
    /// Fit all three encoders on `records` and encode every row.
    pub fn fit(records: &[TrainingRecord]) -> Result<Self, EncoderError> {
        let district = LabelEncoder::fit("District", records.iter().map(|r| &r.district))?;
        let soil = LabelEncoder::fit("Soil Type", records.iter().map(|r| &r.soil_type))?;
        let crop = LabelEncoder::fit("Crop", records.iter().map(|r| &r.crop))?;

        let mut x = Vec::with_capacity(records.len());
        let mut y = Vec::with_capacity(records.len());
        for record in records {
            x.push(vec![
                district.transform(&record.district)? as f32,
                soil.transform(&record.soil_type)? as f32,
                record.temperature_c,
                record.rainfall_mm,
                record.humidity_pct,
            ]);
            y.push(crop.transform(&record.crop)?);
        }

        let data = TrainDataset {
            feature_names: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
            classes: crop.classes().to_vec(),
            x,
            y,
        };
        Ok(Self {
            district,
            soil,
            crop,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(district: &str, soil: &str, crop: &str) -> TrainingRecord {
        TrainingRecord {
            district: district.into(),
            soil_type: soil.into(),
            temperature_c: 28.0,
            rainfall_mm: 700.0,
            humidity_pct: 65.0,
            crop: crop.into(),
        }
    }

    #[test]
    fn encodes_rows_with_sorted_vocabularies() {
        let records = vec![
            record("Mysuru", "Red Soil", "Ragi"),
            record("Belagavi", "Black Soil", "Cotton"),
            record("Mysuru", "Black Soil", "Paddy"),
        ];
        let encoded = EncodedDataset::fit(&records).unwrap();
        assert_eq!(encoded.district.classes(), ["Belagavi", "Mysuru"]);
        assert_eq!(encoded.crop.classes(), ["Cotton", "Paddy", "Ragi"]);
        assert_eq!(encoded.data.x[0], vec![1.0, 1.0, 28.0, 700.0, 65.0]);
        assert_eq!(encoded.data.y, vec![2, 0, 1]);
        assert_eq!(encoded.data.feature_names.len(), FEATURE_NAMES.len());
        assert_eq!(encoded.data.classes, encoded.crop.classes());
    }
}
