//! Scoring engine contract shared between the session and model evaluators.

use std::fmt;

use thiserror::Error;

/// A single input or output value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the value; text parses leniently.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => f.write_str(&format_number(*number)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Render a number with up to four decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    let text = format!("{value:.4}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// One row of named input values, assembled per prediction and discarded
/// after use.
#[derive(Clone, Debug, Default)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, replacing any previous entry of the same name.
    pub fn insert(&mut self, name: &str, value: Value) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name.to_string(), value));
        }
    }

    /// Look up a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record holds no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered named columns produced by a scoring call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultRow {
    columns: Vec<(String, Value)>,
}

impl ResultRow {
    /// Build a row from ordered columns.
    pub fn from_columns(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    /// Look up a column by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// The last column, the conventional fallback when no output name is
    /// declared.
    pub fn last(&self) -> Option<&(String, Value)> {
        self.columns.last()
    }

    /// All columns in order.
    pub fn columns(&self) -> &[(String, Value)] {
        &self.columns
    }
}

/// Errors raised by a scoring call.
#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    /// The record satisfied no rule of the model.
    #[error("No rule of the model matched the record")]
    NoMatch,
    /// Traversal finished without passing any scored node.
    #[error("Model traversal ended without a scored node")]
    Unscored,
}

/// Capability consumed by the session: score one record, name the outputs.
pub trait ScoringEngine {
    /// Score a single record.
    fn predict(&self, record: &Record) -> Result<ResultRow, ScoreError>;

    /// Declared output column names, best first. May be empty for engines
    /// that only report positional columns.
    fn output_names(&self) -> &[String];
}
