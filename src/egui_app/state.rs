//! Shared state types for the egui UI.

use egui::Color32;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: StatusBarState,
    /// Summary of the loaded model, `None` before the first load.
    pub model: Option<LoadedModelView>,
    /// One row per active input field, rebuilt on every load.
    pub rows: Vec<FieldRowView>,
    /// Last prediction, cleared on load.
    pub result: Option<String>,
    /// Pending modal error dialog.
    pub modal: Option<ModalPrompt>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            model: None,
            rows: Vec::new(),
            result: None,
            modal: None,
        }
    }
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub badge_color: Color32,
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self {
            text: "Load a PMML model to get started".into(),
            badge_label: "Idle".into(),
            badge_color: Color32::from_rgb(42, 42, 42),
        }
    }
}

/// Display data for the loaded model header.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedModelView {
    pub name: String,
    pub path: String,
    pub field_count: usize,
    pub target: Option<String>,
}

/// Render-friendly input field row.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldRowView {
    pub name: String,
    pub label: String,
    pub hint: String,
    pub control: ControlView,
}

/// Widget choice for a field row.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlView {
    Radio { options: Vec<String> },
    Combo { options: Vec<String> },
    Slider { min: f64, max: f64 },
    TextBox,
}

/// Modal error dialog content.
#[derive(Clone, Debug, PartialEq)]
pub struct ModalPrompt {
    pub title: String,
    pub message: String,
}
