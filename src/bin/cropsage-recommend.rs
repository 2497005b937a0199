//! Headless crop recommendation from saved artifacts.

use std::path::PathBuf;

use cropsage::advisor::{Advisor, AdvisorInput, Recommendation};
use cropsage::artifacts::ArtifactSet;
use cropsage::climate::{ClimateLookup, ClimateOrigin, DistrictCoords, Month, PowerClimateClient};
use cropsage::config::{self, MAX_RAINFALL_MM};
use cropsage::logging::{self, LogTarget};
use cropsage::speech::{self, Announcer, SpeechAnnouncer};

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
    let app_config = config::load_or_default().map_err(|err| err.to_string())?;

    let artifacts_dir = options
        .artifacts
        .clone()
        .unwrap_or_else(|| app_config.paths.artifacts_dir.clone());
    let artifacts = ArtifactSet::load(&artifacts_dir).map_err(|err| err.to_string())?;
    let advisor = Advisor::new(artifacts).map_err(|err| err.to_string())?;

    let (temperature_c, humidity_pct) = match (options.temperature, options.humidity) {
        (Some(temperature), Some(humidity)) => (temperature, humidity),
        (temperature, humidity) => {
            let coords_path = options
                .coords
                .clone()
                .unwrap_or_else(|| app_config.paths.district_coords.clone());
            let coords = DistrictCoords::load(&coords_path).map_err(|err| err.to_string())?;
            let client = PowerClimateClient::new(app_config.climate.clone(), coords);
            let climate = client.monthly_averages(&options.district, options.month);
            if climate.origin == ClimateOrigin::Fallback {
                println!("Climate data unavailable; using defaults");
            }
            (
                temperature.unwrap_or(climate.temperature_c),
                humidity.unwrap_or(climate.humidity_pct),
            )
        }
    };
    println!(
        "Average temperature: {temperature_c:.1} °C, humidity: {humidity_pct:.1} % ({})",
        options.month
    );

    let input = AdvisorInput {
        district: options.district.clone(),
        soil: options.soil.clone(),
        temperature_c,
        rainfall_mm: options.rainfall,
        humidity_pct,
    };
    let recommendation = advisor.recommend(&input).map_err(|err| err.to_string())?;
    print_recommendation(&recommendation);

    if options.speak {
        let path = speech::default_output_path().map_err(|err| err.to_string())?;
        let mut announcer = SpeechAnnouncer::new(app_config.speech.clone(), path);
        match announcer.announce(&recommendation.main.crop) {
            Ok(_) => announcer.wait_until_done(),
            Err(err) => eprintln!("Audio unavailable: {err}"),
        }
    }
    Ok(())
}

fn print_recommendation(result: &Recommendation) {
    println!(
        "ಶಿಫಾರಸು ಮಾಡಲಾದ ಮುಖ್ಯ ಬೆಳೆ: {} (Recommended Crop: {}, {:.1}%)",
        result.main.crop,
        result.main.crop,
        result.main.probability * 100.0
    );
    println!("ಬೆಳೆಯುವ ಸಮಯ: {}", result.season);
    println!("ಏಕೆ ಈ ಬೆಳೆ? {}", result.reason_kn);
    println!("ಇನ್ನಷ್ಟು ಸಾಧ್ಯವಾದ ಬೆಳೆಗಳು (Other Suitable Crops):");
    for alt in &result.alternatives {
        println!("  - {} ({:.1}%)", alt.crop, alt.probability * 100.0);
    }
    println!("Reasoning:");
    for note in &result.notes {
        println!("  - {note}");
    }
    println!("Probabilities:");
    for score in &result.probabilities {
        println!("  {:<16} {:>6.1}%", score.crop, score.probability * 100.0);
    }
}

#[derive(Debug, Clone)]
struct CliOptions {
    district: String,
    soil: String,
    month: Month,
    rainfall: f32,
    temperature: Option<f32>,
    humidity: Option<f32>,
    artifacts: Option<PathBuf>,
    coords: Option<PathBuf>,
    speak: bool,
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut district: Option<String> = None;
    let mut soil: Option<String> = None;
    let mut month: Option<Month> = None;
    let mut rainfall: Option<f32> = None;
    let mut temperature: Option<f32> = None;
    let mut humidity: Option<f32> = None;
    let mut artifacts: Option<PathBuf> = None;
    let mut coords: Option<PathBuf> = None;
    let mut speak = false;

    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        match flag {
            "-h" | "--help" => return Err(help_text()),
            "--speak" => speak = true,
            "--district" | "--soil" | "--month" | "--rainfall" | "--temperature"
            | "--humidity" | "--artifacts" | "--coords" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| format!("{flag} requires a value"))?;
                match flag {
                    "--district" => district = Some(value.clone()),
                    "--soil" => soil = Some(value.clone()),
                    "--month" => month = Some(value.parse::<Month>()?),
                    "--rainfall" => rainfall = Some(parse_number(flag, value)?),
                    "--temperature" => temperature = Some(parse_number(flag, value)?),
                    "--humidity" => humidity = Some(parse_number(flag, value)?),
                    "--artifacts" => artifacts = Some(PathBuf::from(value)),
                    _ => coords = Some(PathBuf::from(value)),
                }
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    let rainfall = rainfall.ok_or_else(help_text)?;
    if !(0.0..=MAX_RAINFALL_MM as f32).contains(&rainfall) {
        return Err(format!("--rainfall must be between 0 and {MAX_RAINFALL_MM}"));
    }
    Ok(CliOptions {
        district: district.ok_or_else(help_text)?,
        soil: soil.ok_or_else(help_text)?,
        month: month.ok_or_else(help_text)?,
        rainfall,
        temperature,
        humidity,
        artifacts,
        coords,
        speak,
    })
}

fn parse_number(flag: &str, value: &str) -> Result<f32, String> {
    value
        .parse::<f32>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| format!("Invalid {flag} value: {value}"))
}

fn help_text() -> String {
    [
        "cropsage-recommend",
        "",
        "Recommends a crop and two alternatives from saved model artifacts.",
        "",
        "Usage:",
        "  cropsage-recommend --district <name> --soil <type> --month <month> --rainfall <mm> [options]",
        "",
        "Options:",
        "  --district <name>     District as spelled in the training data (required).",
        "  --soil <type>         Soil type as spelled in the training data (required).",
        "  --month <month>       Sowing month, full name or three-letter code (required).",
        "  --rainfall <mm>       Expected rainfall, 0 to 1000 (required).",
        "  --temperature <c>     Skip the climate lookup for temperature.",
        "  --humidity <pct>      Skip the climate lookup for humidity.",
        "  --artifacts <dir>     Model directory (default: from config.toml).",
        "  --coords <file>       District coordinates JSON (default: from config.toml).",
        "  --speak               Say the recommendation aloud.",
    ]
    .join("\n")
}
