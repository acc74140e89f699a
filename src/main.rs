#![deny(missing_docs)]
#![deny(warnings)]

//! Entry point for the egui-based Visor UI.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use eframe::egui;
use visor::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use visor::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size(egui::vec2(560.0, 760.0))
        .with_min_inner_size(MIN_VIEWPORT_SIZE);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Visor",
        native_options,
        Box::new(|_cc| Ok(Box::new(EguiApp::new()))),
    )?;
    Ok(())
}
