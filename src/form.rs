//! Derivation of input-form specifications from a model schema.
//!
//! A pure transform, independent of the event loop: each field descriptor
//! becomes a [`FieldInput`] carrying the concrete input representation
//! (enumerated choice, numeric range or free text) and the presentation
//! style picked from its cardinality.

use crate::pmml::{FieldDescriptor, Interval, ModelSchema, discretize, format_number};

/// Choice fields with at most this many options render as radio rows.
pub const MAX_RADIO_OPTIONS: usize = 4;

/// Ranges with at most this many synthesized values render as combo boxes;
/// larger ones become sliders.
pub const MAX_LISTED_VALUES: usize = 20;

/// Concrete input representation for one field.
#[derive(Clone, Debug, PartialEq)]
pub enum InputKind {
    /// Pick one of the enumerated options.
    Choice { options: Vec<String> },
    /// Pick one of the synthesized values spanning the interval.
    Range { values: Vec<f64>, interval: Interval },
    /// Anything typed in.
    FreeText,
}

/// Presentation style keyed on the input representation and its cardinality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlStyle {
    Radio,
    Combo,
    Slider,
    TextBox,
}

/// Input specification for one rendered field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldInput {
    pub name: String,
    pub kind: InputKind,
    pub style: ControlStyle,
    pub hint: String,
}

/// Current value of one rendered field, initialized by [`default_value`].
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Choice(String),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Text form handed to the session for validation and scoring.
    pub fn entry_text(&self) -> String {
        match self {
            Self::Choice(option) => option.clone(),
            Self::Number(number) => format_number(*number),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Derive input specifications for every active field, in schema order.
pub fn derive_inputs(schema: &ModelSchema) -> Vec<FieldInput> {
    schema.fields().iter().map(field_input).collect()
}

/// Derive the input specification for a single field.
pub fn field_input(field: &FieldDescriptor) -> FieldInput {
    if !field.values.is_empty() {
        let style = if field.values.len() <= MAX_RADIO_OPTIONS {
            ControlStyle::Radio
        } else {
            ControlStyle::Combo
        };
        return FieldInput {
            name: field.name.clone(),
            hint: format!("Valid options: {}", field.values.join(", ")),
            kind: InputKind::Choice {
                options: field.values.clone(),
            },
            style,
        };
    }

    if let Some(interval) = field.interval {
        let values = discretize::candidate_values(&interval);
        let hint = format!(
            "Valid range: {} to {} ({})",
            format_number(interval.left),
            format_number(interval.right),
            interval.closure
        );
        if !values.is_empty() {
            let style = if values.len() <= MAX_LISTED_VALUES {
                ControlStyle::Combo
            } else {
                ControlStyle::Slider
            };
            return FieldInput {
                name: field.name.clone(),
                hint,
                kind: InputKind::Range { values, interval },
                style,
            };
        }
        // Nothing to enumerate for a degenerate interval.
        return FieldInput {
            name: field.name.clone(),
            hint,
            kind: InputKind::FreeText,
            style: ControlStyle::TextBox,
        };
    }

    FieldInput {
        name: field.name.clone(),
        hint: "Enter the required value".to_string(),
        kind: InputKind::FreeText,
        style: ControlStyle::TextBox,
    }
}

/// Initial value for a derived input: the first option or synthesized value
/// for choice controls, empty text otherwise.
pub fn default_value(input: &FieldInput) -> FieldValue {
    match &input.kind {
        InputKind::Choice { options } => {
            FieldValue::Choice(options.first().cloned().unwrap_or_default())
        }
        InputKind::Range { values, interval } => {
            FieldValue::Number(values.first().copied().unwrap_or(interval.left))
        }
        InputKind::FreeText => FieldValue::Text(String::new()),
    }
}

/// Nearest synthesized value to a raw slider position.
pub fn snap_to(values: &[f64], target: f64) -> f64 {
    values
        .iter()
        .copied()
        .min_by(|a, b| {
            (a - target)
                .abs()
                .partial_cmp(&(b - target).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(target)
}
