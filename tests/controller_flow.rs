mod support;

use support::env::VisorEnvGuard;
use support::pmml::{NO_MINING_SCHEMA, WEATHER_MODEL, write_model};

use tempfile::TempDir;
use visor::config;
use visor::egui_app::controller::Controller;
use visor::egui_app::state::ControlView;
use visor::form::FieldValue;

struct ControllerHarness {
    _config: VisorEnvGuard,
    temp: TempDir,
    controller: Controller,
}

impl ControllerHarness {
    fn new() -> Self {
        let temp = tempfile::tempdir().expect("create tempdir");
        let config_home = temp.path().join("config");
        std::fs::create_dir_all(&config_home).expect("create config dir");
        let env = VisorEnvGuard::set_config_home(config_home);

        let mut controller = Controller::new();
        controller.load_configuration();
        Self {
            _config: env,
            temp,
            controller,
        }
    }

    fn load_weather_model(&mut self) -> std::path::PathBuf {
        let path = write_model(self.temp.path(), "weather.pmml", WEATHER_MODEL);
        self.controller.load_model(path.clone());
        path
    }
}

#[test]
fn loading_renders_one_control_per_active_field() {
    let mut harness = ControllerHarness::new();
    harness.load_weather_model();

    let controller = &harness.controller;
    assert!(controller.model_loaded());
    assert!(controller.ui.modal.is_none());
    assert_eq!(controller.ui.rows.len(), 4);
    assert!(matches!(controller.ui.rows[0].control, ControlView::Radio { .. }));
    assert!(matches!(controller.ui.rows[1].control, ControlView::Slider { .. }));
    assert!(matches!(controller.ui.rows[2].control, ControlView::Combo { .. }));
    assert!(matches!(controller.ui.rows[3].control, ControlView::Radio { .. }));

    let model = controller.ui.model.clone().expect("model header");
    assert_eq!(model.name, "weather");
    assert_eq!(model.field_count, 4);
    assert_eq!(model.target.as_deref(), Some("play"));
}

#[test]
fn default_values_predict_end_to_end() {
    let mut harness = ControllerHarness::new();
    harness.load_weather_model();

    // Defaults: outlook=sunny, temperature=60, humidity=0, windy=false.
    harness.controller.predict();
    assert_eq!(harness.controller.ui.result.as_deref(), Some("yes"));
    assert_eq!(harness.controller.ui.status.badge_label, "Info");
}

#[test]
fn edited_values_change_the_prediction() {
    let mut harness = ControllerHarness::new();
    harness.load_weather_model();

    if let Some(FieldValue::Choice(outlook)) = harness.controller.value_mut(0) {
        *outlook = "rain".to_string();
    }
    if let Some(FieldValue::Choice(windy)) = harness.controller.value_mut(3) {
        *windy = "true".to_string();
    }
    harness.controller.predict();
    assert_eq!(harness.controller.ui.result.as_deref(), Some("no"));
}

#[test]
fn failed_load_raises_the_modal_and_keeps_the_form() {
    let mut harness = ControllerHarness::new();
    harness.load_weather_model();

    let bad = write_model(harness.temp.path(), "schemaless.pmml", NO_MINING_SCHEMA);
    harness.controller.load_model(bad);

    let controller = &harness.controller;
    assert!(controller.model_loaded());
    assert_eq!(controller.ui.rows.len(), 4);
    let modal = controller.ui.modal.clone().expect("error dialog");
    assert_eq!(modal.title, "Could not load the model");
    assert_eq!(controller.ui.status.badge_label, "Error");
}

#[test]
fn successful_loads_are_remembered_in_the_config() {
    let mut harness = ControllerHarness::new();
    let path = harness.load_weather_model();

    let config_file = harness
        .temp
        .path()
        .join("config")
        .join(".visor")
        .join("config.toml");
    let saved = config::load_from(&config_file).expect("read saved config");
    assert_eq!(saved.recent_models.first(), Some(&path));
    assert_eq!(saved.last_model_dir.as_deref(), path.parent());
}
