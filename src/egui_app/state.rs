//! Plain data rendered by the UI and mutated by the controller.

use egui::Color32;

use crate::advisor::Recommendation;
use crate::climate::{Climate, Month};

/// Status badge categories shown in the footer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Info,
    Warning,
    Error,
}

pub fn status_badge(tone: StatusTone) -> (&'static str, Color32) {
    match tone {
        StatusTone::Idle => ("Idle", Color32::from_rgb(42, 42, 42)),
        StatusTone::Info => ("Info", Color32::from_rgb(64, 140, 112)),
        StatusTone::Warning => ("Warning", Color32::from_rgb(192, 138, 43)),
        StatusTone::Error => ("Error", Color32::from_rgb(192, 57, 43)),
    }
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub tone: StatusTone,
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self {
            text: "Choose a district and soil type".into(),
            tone: StatusTone::Idle,
        }
    }
}

/// Current form selections.
#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    pub district: usize,
    pub soil: usize,
    pub month: Month,
    pub rainfall_mm: f32,
}

/// Climate shown for one district and month.
#[derive(Clone, Debug, PartialEq)]
pub struct ClimateView {
    pub district: String,
    pub month: Month,
    pub climate: Climate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UiState {
    pub form: FormState,
    pub climate: Option<ClimateView>,
    pub result: Option<Recommendation>,
    pub status: StatusBarState,
}
