//! Library exports for reuse in integration tests.
/// Application directory helpers.
pub mod app_dirs;
/// Persisted application preferences.
pub mod config;
/// Shared egui UI modules.
pub mod egui_app;
/// Schema-to-input-specification derivation.
pub mod form;
/// Logging setup.
pub mod logging;
/// PMML parsing and scoring.
pub mod pmml;
/// Model session ownership and prediction.
pub mod session;
