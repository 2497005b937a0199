#![deny(missing_docs)]

//! Entry point for the egui-based crop recommendation form.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use cropsage::config;
use cropsage::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use cropsage::logging::{self, LogTarget};
use eframe::egui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init(LogTarget::ConsoleAndFile) {
        eprintln!("Logging disabled: {err}");
    }

    let app_config = config::load_or_default().unwrap_or_else(|err| {
        tracing::warn!("Using default configuration: {err}");
        config::AppConfig::default()
    });

    let viewport = egui::ViewportBuilder::default()
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_inner_size(egui::vec2(640.0, 820.0))
        .with_title("Crop Recommendation");
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "CropSage",
        native_options,
        Box::new(move |_cc| match EguiApp::new(app_config) {
            Ok(app) => Ok(Box::new(app)),
            Err(err) => {
                tracing::error!("{err}");
                Ok(Box::new(LaunchError { message: err }))
            }
        }),
    )?;
    Ok(())
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start UI");
                ui.label(&self.message);
            });
        });
    }
}
