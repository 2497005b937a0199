//! Crop recommendation from district, soil, month and rainfall.
/// Trained model and encoder files.
pub mod artifacts;
/// Recommendation logic on top of the trained model.
pub mod advisor;
/// Application directory helpers.
pub mod app_dirs;
/// Monthly climatology lookup with fallback values.
pub mod climate;
/// Persistent TOML configuration.
pub mod config;
/// Static crop season and rationale tables.
pub mod crops;
/// Training CSV loading, splitting and encoding.
pub mod dataset;
/// Recommendation form UI.
pub mod egui_app;
/// Shared HTTP client helpers.
pub mod http_client;
/// Logging setup.
pub mod logging;
/// Encoders, classifier and evaluation metrics.
pub mod ml;
/// Text-to-speech and audio playback.
pub mod speech;
