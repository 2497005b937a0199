//! Train the crop classifier from a CSV of historical records and export it.

use std::path::PathBuf;

use cropsage::artifacts::ArtifactSet;
use cropsage::dataset::{EncodedDataset, load_records, train_test_split};
use cropsage::logging::{self, LogTarget};
use cropsage::ml::forest::{TrainOptions, train_random_forest};
use cropsage::ml::metrics::{ConfusionMatrix, accuracy, classification_report};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if let Err(err) = logging::init(LogTarget::Console) {
        eprintln!("Logging disabled: {err}");
    }

    let records = load_records(&options.data).map_err(|err| err.to_string())?;
    let encoded = EncodedDataset::fit(&records).map_err(|err| err.to_string())?;
    let split = train_test_split(records.len(), options.test_size, options.train.seed)?;
    let train = encoded.data.subset(&split.train);
    let test = encoded.data.subset(&split.test);
    println!(
        "{} records, {} crops: {} train / {} test",
        records.len(),
        encoded.crop.len(),
        train.x.len(),
        test.x.len()
    );

    let model = train_random_forest(&train, &options.train).map_err(|err| err.to_string())?;

    let predicted: Vec<usize> = test
        .x
        .iter()
        .map(|row| model.predict_class_index(row))
        .collect();
    let cm = ConfusionMatrix::from_predictions(encoded.crop.len(), &test.y, &predicted);
    println!("Model Accuracy: {:.4}", accuracy(&cm));
    println!("{}", classification_report(&cm, encoded.crop.classes()));

    let artifacts = ArtifactSet {
        model,
        district: encoded.district,
        soil: encoded.soil,
        crop: encoded.crop,
    };
    artifacts.validate().map_err(|err| err.to_string())?;
    artifacts.save(&options.out).map_err(|err| err.to_string())?;
    println!("Model and encoders saved to {}", options.out.display());
    Ok(())
}

#[derive(Debug, Clone)]
struct CliOptions {
    data: PathBuf,
    out: PathBuf,
    test_size: f64,
    train: TrainOptions,
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut data: Option<PathBuf> = None;
    let mut out = PathBuf::from("artifacts");
    let mut test_size = 0.2f64;
    let mut train = TrainOptions::default();

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--data" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--data requires a value".to_string())?;
                data = Some(PathBuf::from(value));
            }
            "--out" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--out requires a value".to_string())?;
                out = PathBuf::from(value);
            }
            "--trees" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--trees requires a value".to_string())?;
                train.n_trees = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --trees value: {value}"))?;
            }
            "--seed" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--seed requires a value".to_string())?;
                train.seed = value
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid --seed value: {value}"))?;
            }
            "--test-size" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--test-size requires a value".to_string())?;
                test_size = value
                    .parse::<f64>()
                    .map_err(|_| format!("Invalid --test-size value: {value}"))?;
            }
            "--max-depth" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--max-depth requires a value".to_string())?;
                train.max_depth = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("Invalid --max-depth value: {value}"))?,
                );
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    let data = data.ok_or_else(help_text)?;
    Ok(CliOptions {
        data,
        out,
        test_size,
        train,
    })
}

fn help_text() -> String {
    [
        "cropsage-train",
        "",
        "Trains a random forest crop classifier and writes the model and encoders.",
        "",
        "Usage:",
        "  cropsage-train --data <csv> [--out artifacts] [options]",
        "",
        "Options:",
        "  --data <csv>        Training CSV with District, Soil Type, Temperature_C,",
        "                      Rainfall_mm, Humidity_% and Crop columns (required).",
        "  --out <dir>         Output directory (default: artifacts).",
        "  --trees <n>         Number of trees (default: 100).",
        "  --seed <n>          Random seed for the split and the forest (default: 42).",
        "  --test-size <frac>  Held-out fraction (default: 0.2).",
        "  --max-depth <n>     Maximum tree depth (default: unlimited).",
    ]
    .join("\n")
}
