//! Frozen category-to-index mapping for categorical columns.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EncoderError {
    #[error("Unknown {column} value: {value:?}")]
    UnknownLabel { column: String, value: String },
    #[error("{column} index {index} out of range (have {len} classes)")]
    IndexOutOfRange {
        column: String,
        index: usize,
        len: usize,
    },
    #[error("{column} encoder has no classes")]
    Empty { column: String },
    #[error("{column} encoder classes must be sorted and unique")]
    Unsorted { column: String },
}

/// Bijection between category strings and `0..n`.
///
/// Classes are the sorted unique values seen at fit time, so the index of a
/// category only depends on the vocabulary, never on row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// Column name, used in error messages.
    pub column: String,
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit an encoder from every value of a column.
    pub fn fit<I, S>(column: &str, values: I) -> Result<Self, EncoderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes: BTreeSet<String> = values
            .into_iter()
            .map(|value| value.as_ref().to_string())
            .collect();
        Self::from_classes(column, classes.into_iter().collect())
    }

    /// Rebuild an encoder from an already sorted vocabulary.
    pub fn from_classes(column: &str, classes: Vec<String>) -> Result<Self, EncoderError> {
        let encoder = Self {
            column: column.to_string(),
            classes,
        };
        encoder.validate()?;
        Ok(encoder)
    }

    pub fn validate(&self) -> Result<(), EncoderError> {
        if self.classes.is_empty() {
            return Err(EncoderError::Empty {
                column: self.column.clone(),
            });
        }
        if self.classes.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(EncoderError::Unsorted {
                column: self.column.clone(),
            });
        }
        Ok(())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Index of `value`; unseen categories are rejected.
    pub fn transform(&self, value: &str) -> Result<usize, EncoderError> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .map_err(|_| EncoderError::UnknownLabel {
                column: self.column.clone(),
                value: value.to_string(),
            })
    }

    /// Category at `index`.
    pub fn inverse_transform(&self, index: usize) -> Result<&str, EncoderError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| EncoderError::IndexOutOfRange {
                column: self.column.clone(),
                index,
                len: self.classes.len(),
            })
    }

    /// Load an encoder from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, String> {
        let bytes = std::fs::read(path).map_err(|err| err.to_string())?;
        let encoder: Self = serde_json::from_slice(&bytes).map_err(|err| err.to_string())?;
        encoder.validate().map_err(|err| err.to_string())?;
        Ok(encoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_are_sorted_and_unique() {
        let encoder =
            LabelEncoder::fit("Soil Type", ["Red Soil", "Black Soil", "Red Soil", "Alluvial"])
                .unwrap();
        assert_eq!(encoder.classes(), ["Alluvial", "Black Soil", "Red Soil"]);
        assert_eq!(encoder.transform("Alluvial").unwrap(), 0);
        assert_eq!(encoder.transform("Red Soil").unwrap(), 2);
        assert_eq!(encoder.inverse_transform(1).unwrap(), "Black Soil");
    }

    #[test]
    fn unseen_label_is_rejected() {
        let encoder = LabelEncoder::fit("District", ["Mandya", "Hassan"]).unwrap();
        let err = encoder.transform("Udupi").unwrap_err();
        assert_eq!(
            err,
            EncoderError::UnknownLabel {
                column: "District".to_string(),
                value: "Udupi".to_string(),
            }
        );
        assert!(encoder.inverse_transform(2).is_err());
    }

    #[test]
    fn empty_or_unsorted_vocabulary_is_rejected() {
        assert!(LabelEncoder::fit("Crop", Vec::<String>::new()).is_err());
        assert!(
            LabelEncoder::from_classes("Crop", vec!["Ragi".into(), "Maize".into()]).is_err()
        );
    }

    #[test]
    fn deserialized_encoder_must_still_be_valid() {
        let json = r#"{"column":"Crop","classes":["Wheat","Paddy"]}"#;
        let encoder: LabelEncoder = serde_json::from_str(json).unwrap();
        assert!(encoder.validate().is_err());
    }
}
