//! Interactive recommendation form built on egui.

pub mod controller;
pub mod state;
pub mod ui;
