//! egui renderer for the recommendation form.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use eframe::egui::{self, Color32, Frame, RichText, Ui};

use crate::advisor::{Advisor, Recommendation};
use crate::artifacts::ArtifactSet;
use crate::climate::{ClimateOrigin, DistrictCoords, Month, PowerClimateClient};
use crate::config::{AppConfig, MAX_RAINFALL_MM};
use crate::egui_app::controller::EguiController;
use crate::egui_app::state::status_badge;
use crate::speech::{self, Announcer, SpeechAnnouncer};

/// Minimum window size for the form.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(520.0, 640.0);
const EXTRA_FONT: &str = "cropsage-extra";

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    font_path: Option<PathBuf>,
    visuals_set: bool,
}

impl EguiApp {
    /// Load artifacts and lookup tables named in `config`.
    pub fn new(config: AppConfig) -> Result<Self, String> {
        let artifacts = ArtifactSet::load(&config.paths.artifacts_dir)
            .map_err(|err| format!("Failed to load model artifacts: {err}"))?;
        let advisor = Advisor::new(artifacts).map_err(|err| err.to_string())?;
        let coords = DistrictCoords::load(&config.paths.district_coords).unwrap_or_else(|err| {
            tracing::warn!("{err}; climate lookups will use defaults");
            DistrictCoords::default()
        });
        let climate = PowerClimateClient::new(config.climate.clone(), coords);
        let announcer = speech_announcer(&config);
        let controller = EguiController::new(
            advisor,
            Box::new(climate),
            announcer,
            config.ui.default_rainfall_mm,
        );
        Ok(Self::with_controller(controller, config.ui.font_path))
    }

    pub fn with_controller(controller: EguiController, font_path: Option<PathBuf>) -> Self {
        Self {
            controller,
            font_path,
            visuals_set: false,
        }
    }

    fn prepare_frame(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        ctx.set_visuals(egui::Visuals::dark());
        if let Some(path) = self.font_path.take() {
            if let Err(err) = install_font(ctx, &path) {
                tracing::warn!("Failed to load font {}: {err}", path.display());
            }
        }
        self.visuals_set = true;
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(Frame::NONE.fill(Color32::from_rgb(0, 0, 0)))
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                let (label, color) = status_badge(status.tone);
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    ui.label(RichText::new(label).color(color).strong());
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(Color32::WHITE));
                });
            });
    }

    fn render_form(&mut self, ui: &mut Ui) {
        let districts = self.controller.districts().to_vec();
        let soils = self.controller.soils().to_vec();
        let form = self.controller.ui.form.clone();

        egui::Grid::new("form_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("District");
                if let Some(index) = choose(ui, "district", &districts, form.district) {
                    self.controller.select_district(index);
                }
                ui.end_row();

                ui.label("Soil type");
                if let Some(index) = choose(ui, "soil", &soils, form.soil) {
                    self.controller.select_soil(index);
                }
                ui.end_row();

                ui.label("Sowing month");
                let months: Vec<String> = Month::ALL.iter().map(|m| m.to_string()).collect();
                let current = Month::ALL.iter().position(|m| *m == form.month).unwrap_or(0);
                if let Some(index) = choose(ui, "month", &months, current) {
                    self.controller.select_month(Month::ALL[index]);
                }
                ui.end_row();

                ui.label("Rainfall (mm)");
                let mut rainfall = form.rainfall_mm;
                let slider =
                    egui::Slider::new(&mut rainfall, 0.0..=MAX_RAINFALL_MM as f32).step_by(1.0);
                if ui.add(slider).changed() {
                    self.controller.set_rainfall(rainfall);
                }
                ui.end_row();
            });

        self.controller.refresh_climate();
        if let Some(view) = &self.controller.ui.climate {
            ui.add_space(6.0);
            let suffix = match view.climate.origin {
                ClimateOrigin::Fetched => "",
                ClimateOrigin::Fallback => " (default)",
            };
            ui.label(format!(
                "Average temperature: {:.1} °C   Humidity: {:.1} %{suffix}",
                view.climate.temperature_c, view.climate.humidity_pct
            ));
        }

        ui.add_space(10.0);
        if ui.button("Get Recommendation").clicked() {
            self.controller.recommend();
        }
    }

    fn render_result(&self, ui: &mut Ui, result: &Recommendation) {
        ui.separator();
        ui.label(
            RichText::new(format!(
                "ಶಿಫಾರಸು ಮಾಡಲಾದ ಮುಖ್ಯ ಬೆಳೆ: {} (Recommended Crop: {})",
                result.main.crop, result.main.crop
            ))
            .color(Color32::from_rgb(102, 176, 136))
            .strong(),
        );
        ui.label(format!("ಬೆಳೆಯುವ ಸಮಯ: {}", result.season));
        ui.label(format!("ಏಕೆ ಈ ಬೆಳೆ? {}", result.reason_kn));

        ui.add_space(6.0);
        ui.label(RichText::new("ಇನ್ನಷ್ಟು ಸಾಧ್ಯವಾದ ಬೆಳೆಗಳು (Other Suitable Crops):").strong());
        for alt in &result.alternatives {
            ui.label(format!("• {} ({:.1}%)", alt.crop, alt.probability * 100.0));
        }

        ui.add_space(6.0);
        ui.label(RichText::new("Reasoning").strong());
        for note in &result.notes {
            ui.label(format!("• {note}"));
        }

        ui.add_space(6.0);
        ui.label(RichText::new("Probabilities").strong());
        for score in &result.probabilities {
            ui.add(
                egui::ProgressBar::new(score.probability)
                    .text(format!("{} {:.1}%", score.crop, score.probability * 100.0)),
            );
        }
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.prepare_frame(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Crop Recommendation");
                ui.add_space(8.0);
                self.render_form(ui);
                if let Some(result) = self.controller.ui.result.clone() {
                    self.render_result(ui, &result);
                }
            });
        });
    }
}

/// Combo box over `options`; returns the newly picked index.
fn choose(ui: &mut Ui, id: &str, options: &[String], selected: usize) -> Option<usize> {
    let mut picked = None;
    let current = options.get(selected).map(String::as_str).unwrap_or("");
    egui::ComboBox::from_id_salt(id)
        .selected_text(current)
        .width(220.0)
        .show_ui(ui, |ui| {
            for (index, option) in options.iter().enumerate() {
                let clicked = ui
                    .selectable_label(index == selected, option.as_str())
                    .clicked();
                if clicked && index != selected {
                    picked = Some(index);
                }
            }
        });
    picked
}

fn speech_announcer(config: &AppConfig) -> Option<Box<dyn Announcer>> {
    if !config.speech.enabled {
        return None;
    }
    match speech::default_output_path() {
        Ok(path) => Some(Box::new(SpeechAnnouncer::new(config.speech.clone(), path))),
        Err(err) => {
            tracing::warn!("Speech disabled: {err}");
            None
        }
    }
}

/// Add a font with extra scripts (Kannada) as a fallback for all text.
fn install_font(ctx: &egui::Context, path: &Path) -> std::io::Result<()> {
    let bytes = std::fs::read(path)?;
    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        EXTRA_FONT.to_string(),
        Arc::new(egui::FontData::from_owned(bytes)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(EXTRA_FONT.to_string());
    }
    ctx.set_fonts(fonts);
    Ok(())
}
