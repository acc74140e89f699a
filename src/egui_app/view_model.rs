//! Helpers to convert domain data into egui-facing view structs.

use std::path::Path;

use crate::egui_app::state::{ControlView, FieldRowView, LoadedModelView};
use crate::form::{ControlStyle, FieldInput, InputKind};
use crate::pmml::{ModelSchema, format_number};

/// Convert a derived field input into a render row.
pub fn field_row(input: &FieldInput) -> FieldRowView {
    let control = match (input.style, &input.kind) {
        (ControlStyle::Radio, InputKind::Choice { options }) => ControlView::Radio {
            options: options.clone(),
        },
        (ControlStyle::Combo, InputKind::Choice { options }) => ControlView::Combo {
            options: options.clone(),
        },
        (ControlStyle::Combo, InputKind::Range { values, .. }) => ControlView::Combo {
            options: values.iter().copied().map(format_number).collect(),
        },
        (ControlStyle::Slider, InputKind::Range { values, .. }) => ControlView::Slider {
            min: values.first().copied().unwrap_or(0.0),
            max: values.last().copied().unwrap_or(0.0),
        },
        _ => ControlView::TextBox,
    };
    FieldRowView {
        name: input.name.clone(),
        label: format!("{}:", input.name.to_uppercase()),
        hint: input.hint.clone(),
        control,
    }
}

/// Build the loaded-model header from a session's path and schema.
pub fn model_view(path: &Path, schema: &ModelSchema) -> LoadedModelView {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.to_string_lossy().to_string());
    LoadedModelView {
        name,
        path: path.to_string_lossy().to_string(),
        field_count: schema.fields().len(),
        target: schema.target().map(str::to_string),
    }
}
