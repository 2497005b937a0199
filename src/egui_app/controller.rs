//! Form logic for the recommendation UI, independent of rendering.

use std::collections::HashMap;

use crate::advisor::{Advisor, AdvisorInput};
use crate::climate::{ClimateLookup, ClimateOrigin, Month};
use crate::config::MAX_RAINFALL_MM;
use crate::egui_app::state::{ClimateView, FormState, StatusBarState, StatusTone, UiState};
use crate::speech::Announcer;

/// Maintains form state and turns submissions into recommendations.
pub struct EguiController {
    pub ui: UiState,
    advisor: Advisor,
    climate: Box<dyn ClimateLookup>,
    announcer: Option<Box<dyn Announcer>>,
    climate_cache: HashMap<(String, Month), ClimateView>,
}

impl EguiController {
    pub fn new(
        advisor: Advisor,
        climate: Box<dyn ClimateLookup>,
        announcer: Option<Box<dyn Announcer>>,
        default_rainfall_mm: u32,
    ) -> Self {
        let form = FormState {
            district: 0,
            soil: 0,
            month: Month::January,
            rainfall_mm: default_rainfall_mm.min(MAX_RAINFALL_MM) as f32,
        };
        Self {
            ui: UiState {
                form,
                climate: None,
                result: None,
                status: StatusBarState::idle(),
            },
            advisor,
            climate,
            announcer,
            climate_cache: HashMap::new(),
        }
    }

    pub fn districts(&self) -> &[String] {
        self.advisor.districts()
    }

    pub fn soils(&self) -> &[String] {
        self.advisor.soils()
    }

    pub fn select_district(&mut self, index: usize) {
        if index < self.districts().len() {
            self.ui.form.district = index;
        }
    }

    pub fn select_soil(&mut self, index: usize) {
        if index < self.soils().len() {
            self.ui.form.soil = index;
        }
    }

    pub fn select_month(&mut self, month: Month) {
        self.ui.form.month = month;
    }

    pub fn set_rainfall(&mut self, rainfall_mm: f32) {
        self.ui.form.rainfall_mm = rainfall_mm.clamp(0.0, MAX_RAINFALL_MM as f32);
    }

    fn selected_district(&self) -> Option<&str> {
        self.districts()
            .get(self.ui.form.district)
            .map(String::as_str)
    }

    fn selected_soil(&self) -> Option<&str> {
        self.soils().get(self.ui.form.soil).map(String::as_str)
    }

    /// Make sure the shown climate matches the selected district and month.
    ///
    /// Each district and month pair is looked up at most once.
    pub fn refresh_climate(&mut self) {
        let Some(district) = self.selected_district().map(str::to_string) else {
            return;
        };
        let month = self.ui.form.month;
        let current = self
            .ui
            .climate
            .as_ref()
            .is_some_and(|view| view.district == district && view.month == month);
        if current {
            return;
        }
        let key = (district.clone(), month);
        let view = match self.climate_cache.get(&key) {
            Some(view) => view.clone(),
            None => {
                let climate = self.climate.monthly_averages(&district, month);
                let view = ClimateView {
                    district,
                    month,
                    climate,
                };
                self.climate_cache.insert(key, view.clone());
                view
            }
        };
        if view.climate.origin == ClimateOrigin::Fallback {
            self.set_status(
                format!(
                    "Climate data unavailable for {}; using defaults",
                    view.district
                ),
                StatusTone::Warning,
            );
        }
        self.ui.climate = Some(view);
    }

    /// Current selections as an advisor query.
    pub fn current_input(&mut self) -> Option<AdvisorInput> {
        self.refresh_climate();
        let climate = self.ui.climate.as_ref()?.climate;
        Some(AdvisorInput {
            district: self.selected_district()?.to_string(),
            soil: self.selected_soil()?.to_string(),
            temperature_c: climate.temperature_c,
            rainfall_mm: self.ui.form.rainfall_mm,
            humidity_pct: climate.humidity_pct,
        })
    }

    /// Run the model for the current form and announce the main crop.
    pub fn recommend(&mut self) {
        let Some(input) = self.current_input() else {
            self.set_status("Select a district and soil type first", StatusTone::Warning);
            return;
        };
        let recommendation = match self.advisor.recommend(&input) {
            Ok(recommendation) => recommendation,
            Err(err) => {
                tracing::error!("Recommendation failed: {err}");
                self.ui.result = None;
                self.set_status(format!("Recommendation failed: {err}"), StatusTone::Error);
                return;
            }
        };
        let crop = recommendation.main.crop.clone();
        self.ui.result = Some(recommendation);
        self.set_status(format!("Recommended crop: {crop}"), StatusTone::Info);
        self.announce(&crop);
    }

    fn announce(&mut self, crop: &str) {
        let Some(announcer) = self.announcer.as_mut() else {
            return;
        };
        match announcer.announce(crop) {
            Ok(path) => tracing::info!("Playing {}", path.display()),
            Err(err) => {
                tracing::warn!("Speech failed: {err}");
                self.set_status(
                    format!("Recommended crop: {crop} (audio unavailable: {err})"),
                    StatusTone::Warning,
                );
            }
        }
    }

    fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status = StatusBarState {
            text: text.into(),
            tone,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ArtifactSet;
    use crate::climate::Climate;
    use crate::dataset::{EncodedDataset, TrainingRecord};
    use crate::ml::forest::{TrainOptions, train_random_forest};
    use crate::speech::SpeechError;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    struct CountingLookup {
        calls: Rc<RefCell<Vec<(String, Month)>>>,
        origin: ClimateOrigin,
    }

    impl ClimateLookup for CountingLookup {
        fn monthly_averages(&self, district: &str, month: Month) -> Climate {
            self.calls.borrow_mut().push((district.to_string(), month));
            Climate {
                temperature_c: 27.0,
                humidity_pct: 81.0,
                origin: self.origin,
            }
        }
    }

    struct RecordingAnnouncer {
        spoken: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl Announcer for RecordingAnnouncer {
        fn announce(&mut self, crop: &str) -> Result<PathBuf, SpeechError> {
            if self.fail {
                return Err(SpeechError::Output("no device".into()));
            }
            self.spoken.borrow_mut().push(crop.to_string());
            Ok(PathBuf::from("output.mp3"))
        }
    }

    fn advisor() -> Advisor {
        let records: Vec<TrainingRecord> = [
            ("Mandya", "Red Soil", 27.0, 900.0, 82.0, "Paddy"),
            ("Mandya", "Red Soil", 28.0, 920.0, 80.0, "Sugarcane"),
            ("Dharwad", "Black Soil", 33.0, 450.0, 48.0, "Cotton"),
            ("Tumakuru", "Red Soil", 29.0, 550.0, 60.0, "Ragi"),
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
            n_trees: 5,
            ..TrainOptions::default()
        };
        Advisor::new(ArtifactSet {
            model: train_random_forest(&encoded.data, &options).unwrap(),
            district: encoded.district,
            soil: encoded.soil,
            crop: encoded.crop,
        })
        .unwrap()
    }

    fn controller(
        origin: ClimateOrigin,
        fail_speech: bool,
    ) -> (
        EguiController,
        Rc<RefCell<Vec<(String, Month)>>>,
        Rc<RefCell<Vec<String>>>,
    ) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let spoken = Rc::new(RefCell::new(Vec::new()));
        let controller = EguiController::new(
            advisor(),
            Box::new(CountingLookup {
                calls: calls.clone(),
                origin,
            }),
            Some(Box::new(RecordingAnnouncer {
                spoken: spoken.clone(),
                fail: fail_speech,
            })),
            500,
        );
        (controller, calls, spoken)
    }

    #[test]
    fn form_starts_with_defaults() {
        let (controller, _, _) = controller(ClimateOrigin::Fetched, false);
        assert_eq!(controller.ui.form.rainfall_mm, 500.0);
        assert_eq!(controller.ui.form.month, Month::January);
        assert_eq!(controller.districts(), ["Dharwad", "Mandya", "Tumakuru"]);
        assert_eq!(controller.ui.status.tone, StatusTone::Idle);
    }

    #[test]
    fn climate_refetches_only_when_selection_changes() {
        let (mut controller, calls, _) = controller(ClimateOrigin::Fetched, false);
        controller.refresh_climate();
        controller.refresh_climate();
        assert_eq!(calls.borrow().len(), 1);

        controller.select_month(Month::June);
        controller.refresh_climate();
        controller.select_district(1);
        controller.refresh_climate();
        assert_eq!(
            *calls.borrow(),
            vec![
                ("Dharwad".to_string(), Month::January),
                ("Dharwad".to_string(), Month::June),
                ("Mandya".to_string(), Month::June),
            ]
        );

        controller.select_district(0);
        controller.refresh_climate();
        assert_eq!(calls.borrow().len(), 3, "cached pair is not fetched again");
        assert_eq!(controller.ui.climate.as_ref().unwrap().district, "Dharwad");
    }

    #[test]
    fn recommend_fills_result_and_speaks() {
        let (mut controller, _, spoken) = controller(ClimateOrigin::Fetched, false);
        controller.select_district(1);
        controller.select_soil(1);
        controller.set_rainfall(910.0);
        controller.recommend();
        let result = controller.ui.result.as_ref().unwrap();
        assert_eq!(result.alternatives.len(), 2);
        assert_eq!(*spoken.borrow(), vec![result.main.crop.clone()]);
        assert_eq!(controller.ui.status.tone, StatusTone::Info);
    }

    #[test]
    fn speech_failure_is_not_fatal() {
        let (mut controller, _, _) = controller(ClimateOrigin::Fetched, true);
        controller.recommend();
        assert!(controller.ui.result.is_some());
        assert_eq!(controller.ui.status.tone, StatusTone::Warning);
        assert!(controller.ui.status.text.contains("audio unavailable"));
    }

    #[test]
    fn fallback_climate_is_flagged() {
        let (mut controller, _, _) = controller(ClimateOrigin::Fallback, false);
        controller.refresh_climate();
        assert_eq!(controller.ui.status.tone, StatusTone::Warning);
        assert!(controller.ui.climate.is_some());
    }

    #[test]
    fn inputs_are_clamped() {
        let (mut controller, _, _) = controller(ClimateOrigin::Fetched, false);
        controller.set_rainfall(5000.0);
        assert_eq!(controller.ui.form.rainfall_mm, MAX_RAINFALL_MM as f32);
        controller.select_district(99);
        assert_eq!(controller.ui.form.district, 0);
    }
}
