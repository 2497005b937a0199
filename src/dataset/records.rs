use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid CSV row: {0}")]
    Csv(#[from] csv::Error),
    #[error("Row {line}: {message}")]
    InvalidRow { line: u64, message: String },
    #[error("Dataset has no rows")]
    Empty,
}

/// One row of the historical dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainingRecord {
    #[serde(rename = "District")]
    pub district: String,
    #[serde(rename = "Soil Type")]
    pub soil_type: String,
    #[serde(rename = "Temperature_C")]
    pub temperature_c: f32,
    #[serde(rename = "Rainfall_mm")]
    pub rainfall_mm: f32,
    #[serde(rename = "Humidity_%")]
    pub humidity_pct: f32,
    #[serde(rename = "Crop")]
    pub crop: String,
}

impl TrainingRecord {
    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("District", &self.district),
            ("Soil Type", &self.soil_type),
            ("Crop", &self.crop),
        ] {
            if value.is_empty() {
                return Err(format!("{name} is empty"));
            }
        }
        for (name, value) in [
            ("Temperature_C", self.temperature_c),
            ("Rainfall_mm", self.rainfall_mm),
            ("Humidity_%", self.humidity_pct),
        ] {
            if !value.is_finite() {
                return Err(format!("{name} is not a finite number"));
            }
        }
        Ok(())
    }
}

/// Load every record from a CSV file with a header row.
pub fn load_records(path: &Path) -> Result<Vec<TrainingRecord>, DatasetError> {
    let file = std::fs::File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records(file)?;
    tracing::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse records from any CSV source. Headers and fields are trimmed and
/// columns not used for training are ignored.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<TrainingRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut out = Vec::new();
    for result in reader.deserialize::<TrainingRecord>() {
        let record = result?;
        record.validate().map_err(|message| DatasetError::InvalidRow {
            // Header is line 1.
            line: out.len() as u64 + 2,
            message,
        })?;
        out.push(record);
    }
    if out.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
District,Soil Type,Temperature_C,Rainfall_mm,Humidity_%,Crop,Year
Mandya , Red Soil,27.5,820,78,Paddy,2019
Dharwad,Black Soil,31,540,55,Cotton,2020
";

    #[test]
    fn parses_rows_and_trims_fields() {
        let records = read_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].district, "Mandya");
        assert_eq!(records[0].soil_type, "Red Soil");
        assert_eq!(records[0].rainfall_mm, 820.0);
        assert_eq!(records[1].crop, "Cotton");
        assert_eq!(records[1].temperature_c, 31.0);
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "District,Soil Type,Temperature_C,Rainfall_mm,Crop\nMandya,Red Soil,27,800,Paddy\n";
        assert!(matches!(
            read_records(csv.as_bytes()),
            Err(DatasetError::Csv(_))
        ));
    }

    #[test]
    fn non_numeric_value_is_an_error() {
        let csv = "District,Soil Type,Temperature_C,Rainfall_mm,Humidity_%,Crop\nMandya,Red Soil,warm,800,70,Paddy\n";
        assert!(read_records(csv.as_bytes()).is_err());
    }

    #[test]
    fn empty_category_reports_line() {
        let csv = "District,Soil Type,Temperature_C,Rainfall_mm,Humidity_%,Crop\nMandya,Red Soil,27,800,70,Paddy\nHassan,,25,900,80,Ragi\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        match err {
            DatasetError::InvalidRow { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("Soil Type"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_only_is_empty() {
        let csv = "District,Soil Type,Temperature_C,Rainfall_mm,Humidity_%,Crop\n";
        assert!(matches!(
            read_records(csv.as_bytes()),
            Err(DatasetError::Empty)
        ));
    }

    #[test]
    fn load_records_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crops.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(load_records(&path).unwrap().len(), 2);
        assert!(matches!(
            load_records(&dir.path().join("missing.csv")),
            Err(DatasetError::Open { .. })
        ));
    }
}
