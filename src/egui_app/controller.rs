//! Maintains app state and bridges model sessions to the egui UI.

use std::path::PathBuf;

use egui::Color32;
use rfd::FileDialog;
use tracing::warn;

use crate::config::{self, AppConfig};
use crate::egui_app::state::{ModalPrompt, UiState};
use crate::egui_app::view_model;
use crate::form::{self, FieldInput, FieldValue, InputKind};
use crate::session::Session;

/// Owns the optional model session, the derived form and the UI state.
pub struct Controller {
    pub ui: UiState,
    session: Option<Session>,
    inputs: Vec<FieldInput>,
    values: Vec<FieldValue>,
    config: AppConfig,
}

impl Controller {
    pub fn new() -> Self {
        Self {
            ui: UiState::default(),
            session: None,
            inputs: Vec::new(),
            values: Vec::new(),
            config: AppConfig::default(),
        }
    }

    /// Load persisted preferences; a failure only degrades the dialog
    /// start directory.
    pub fn load_configuration(&mut self) {
        match config::load_or_default() {
            Ok(cfg) => self.config = cfg,
            Err(err) => {
                warn!("Failed to load config: {err}");
                self.set_status(format!("Failed to load config: {err}"), StatusTone::Warning);
            }
        }
    }

    /// Pick a `.pmml` file with the native dialog and load it.
    pub fn open_model_via_dialog(&mut self) {
        let mut dialog = FileDialog::new().add_filter("PMML model", &["pmml"]);
        if let Some(dir) = &self.config.last_model_dir {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.pick_file() else {
            return;
        };
        self.load_model(path);
    }

    /// Load a model from a known path. On failure the previously loaded
    /// session, form and values stay as they were.
    pub fn load_model(&mut self, path: PathBuf) {
        match Session::load(&path) {
            Ok(session) => self.install_session(session),
            Err(err) => {
                warn!("Failed to load model {}: {err}", path.display());
                self.show_error("Could not load the model", err.to_string());
            }
        }
    }

    fn install_session(&mut self, session: Session) {
        self.inputs = form::derive_inputs(session.schema());
        self.values = self.inputs.iter().map(form::default_value).collect();
        self.ui.rows = self.inputs.iter().map(view_model::field_row).collect();
        self.ui.model = Some(view_model::model_view(session.path(), session.schema()));
        self.ui.result = None;

        self.config.note_loaded_model(session.path());
        if let Err(err) = config::save(&self.config) {
            warn!("Failed to save config: {err}");
        }

        self.set_status(
            format!(
                "Model '{}' loaded: {} input fields",
                self.ui.model.as_ref().map(|m| m.name.as_str()).unwrap_or(""),
                self.inputs.len()
            ),
            StatusTone::Info,
        );
        self.session = Some(session);
    }

    /// Validate the entered values and score them, updating result, status
    /// and modal state.
    pub fn predict(&mut self) {
        let Some(session) = &self.session else {
            self.show_error("No model loaded", "Load a PMML model first.".to_string());
            return;
        };
        let entries: Vec<(String, String)> = self
            .inputs
            .iter()
            .zip(&self.values)
            .map(|(input, value)| (input.name.clone(), value.entry_text()))
            .collect();
        match session.predict(&entries) {
            Ok(prediction) => {
                let text = prediction.to_string();
                self.ui.result = Some(text.clone());
                self.set_status(format!("Prediction: {text}"), StatusTone::Info);
            }
            Err(err) => {
                self.ui.result = None;
                self.show_error("Prediction failed", err.to_string());
            }
        }
    }

    /// Whether a model is currently loaded.
    pub fn model_loaded(&self) -> bool {
        self.session.is_some()
    }

    /// Mutable access to the value backing the field at `index`.
    pub fn value_mut(&mut self, index: usize) -> Option<&mut FieldValue> {
        self.values.get_mut(index)
    }

    /// Snap the slider-backed field at `index` to its nearest synthesized
    /// value.
    pub fn snap_value(&mut self, index: usize) {
        let Some(input) = self.inputs.get(index) else {
            return;
        };
        let InputKind::Range { values, .. } = &input.kind else {
            return;
        };
        if let Some(FieldValue::Number(number)) = self.values.get_mut(index) {
            *number = form::snap_to(values, *number);
        }
    }

    /// Close the modal error dialog.
    pub fn dismiss_modal(&mut self) {
        self.ui.modal = None;
    }

    fn show_error(&mut self, title: &str, message: String) {
        self.ui.modal = Some(ModalPrompt {
            title: title.to_string(),
            message: message.clone(),
        });
        self.set_status(message, StatusTone::Error);
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        let (label, color) = status_badge(tone);
        self.ui.status.text = text.into();
        self.ui.status.badge_label = label;
        self.ui.status.badge_color = color;
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

/// Footer badge tones.
#[derive(Clone, Copy, Debug)]
pub enum StatusTone {
    Idle,
    Info,
    Warning,
    Error,
}

fn status_badge(tone: StatusTone) -> (String, Color32) {
    match tone {
        StatusTone::Idle => ("Idle".into(), Color32::from_rgb(42, 42, 42)),
        StatusTone::Info => ("Info".into(), Color32::from_rgb(64, 140, 112)),
        StatusTone::Warning => ("Warning".into(), Color32::from_rgb(192, 138, 43)),
        StatusTone::Error => ("Error".into(), Color32::from_rgb(192, 57, 43)),
    }
}
