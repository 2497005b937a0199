//! Rule-of-thumb hints derived from the raw inputs, independent of the model.

use super::AdvisorInput;

const HIGH_RAINFALL_MM: f32 = 200.0;
const HIGH_TEMPERATURE_C: f32 = 35.0;
const HIGH_HUMIDITY_PCT: f32 = 70.0;

pub const MODERATE_NOTE: &str =
    "Conditions are moderate; recommended crops fit general patterns in your district.";

/// Human-readable notes about the growing conditions in `input`.
///
/// Always returns at least one note.
pub fn condition_notes(input: &AdvisorInput) -> Vec<String> {
    let mut notes = Vec::new();
    if input.rainfall_mm > HIGH_RAINFALL_MM {
        notes.push(
            "High rainfall suggests water-loving crops like Paddy or Sugarcane.".to_string(),
        );
    }
    if input.temperature_c > HIGH_TEMPERATURE_C {
        notes.push("High temperature favors Cotton or Millets.".to_string());
    }
    if input.humidity_pct > HIGH_HUMIDITY_PCT {
        notes.push("High humidity benefits Paddy, Coconut or Sugarcane.".to_string());
    }
    let soil = input.soil.trim();
    if soil.eq_ignore_ascii_case("black soil") || soil.eq_ignore_ascii_case("red soil") {
        notes.push(format!("{soil} is suitable for Cotton, Millets or Oilseeds."));
    }
    if notes.is_empty() {
        notes.push(MODERATE_NOTE.to_string());
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(soil: &str, temperature_c: f32, rainfall_mm: f32, humidity_pct: f32) -> AdvisorInput {
        AdvisorInput {
            district: "Mandya".to_string(),
            soil: soil.to_string(),
            temperature_c,
            rainfall_mm,
            humidity_pct,
        }
    }

    #[test]
    fn mild_conditions_get_moderate_note() {
        assert_eq!(
            condition_notes(&input("Laterite Soil", 28.0, 150.0, 55.0)),
            vec![MODERATE_NOTE.to_string()]
        );
    }

    #[test]
    fn every_rule_can_fire() {
        let notes = condition_notes(&input("black soil", 36.0, 800.0, 82.0));
        assert_eq!(notes.len(), 4);
        assert!(notes[0].starts_with("High rainfall"));
        assert!(notes[1].starts_with("High temperature"));
        assert!(notes[2].starts_with("High humidity"));
        assert_eq!(notes[3], "black soil is suitable for Cotton, Millets or Oilseeds.");
    }

    #[test]
    fn thresholds_are_strict() {
        let notes = condition_notes(&input("Sandy Soil", 35.0, 200.0, 70.0));
        assert_eq!(notes, vec![MODERATE_NOTE.to_string()]);
    }
}
