use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordsError {
    #[error("Failed to read district coordinates {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid district coordinates {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Latitude/longitude of a district centroid, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Static table of district name to coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistrictCoords {
    entries: BTreeMap<String, Coordinates>,
}

impl DistrictCoords {
    /// Load a JSON object of `{ "District": { "lat": .., "lon": .. } }`.
    pub fn load(path: &Path) -> Result<Self, CoordsError> {
        let bytes = std::fs::read(path).map_err(|source| CoordsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let entries = serde_json::from_slice(&bytes).map_err(|source| CoordsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { entries })
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Coordinates)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Look up a district after normalizing its name.
    pub fn get(&self, district: &str) -> Option<Coordinates> {
        self.entries.get(&normalize_district_key(district)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Trim and title-case a district name: the first letter of every run of
/// letters is upper-cased, the rest lower-cased.
pub fn normalize_district_key(district: &str) -> String {
    let mut out = String::with_capacity(district.len());
    let mut in_word = false;
    for ch in district.trim().chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn title_cases_each_word() {
        assert_eq!(normalize_district_key("  bagalkot "), "Bagalkot");
        assert_eq!(normalize_district_key("DAKSHINA KANNADA"), "Dakshina Kannada");
        assert_eq!(normalize_district_key("uttara-kannada"), "Uttara-Kannada");
        assert_eq!(normalize_district_key("Bengaluru Urban"), "Bengaluru Urban");
    }

    #[test]
    fn loads_json_table_and_normalizes_lookups() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coords.json");
        std::fs::write(
            &path,
            r#"{"Mandya": {"lat": 12.52, "lon": 76.9}, "Dakshina Kannada": {"lat": 12.84, "lon": 75.24}}"#,
        )
        .unwrap();
        let coords = DistrictCoords::load(&path).unwrap();
        assert_eq!(coords.len(), 2);
        assert_eq!(
            coords.get("mandya"),
            Some(Coordinates {
                lat: 12.52,
                lon: 76.9
            })
        );
        assert!(coords.get("dakshina kannada").is_some());
        assert!(coords.get("Udupi").is_none());
    }

    #[test]
    fn malformed_table_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coords.json");
        std::fs::write(&path, r#"{"Mandya": {"lat": "north"}}"#).unwrap();
        assert!(matches!(
            DistrictCoords::load(&path),
            Err(CoordsError::Parse { .. })
        ));
    }
}
