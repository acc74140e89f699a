//! Model session: schema and scoring engine owned as a single unit.
//!
//! A session is created whole by [`Session::load`] and replaced whole by the
//! next successful load, so the UI can never observe a schema belonging to a
//! different model than the engine it scores with.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::pmml::{
    ModelSchema, OpType, Record, ResultRow, SchemaError, ScoreError, ScoringEngine, TreeError,
    TreeModel, Value,
};

/// Errors raised while loading a model. Any of these leaves the previously
/// loaded session untouched.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading the file failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not well-formed XML.
    #[error("Malformed PMML document: {0}")]
    Xml(#[from] roxmltree::Error),
    /// The document's schema could not be extracted.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The document's tree model could not be compiled.
    #[error(transparent)]
    Model(#[from] TreeError),
}

/// Errors raised by a prediction attempt.
#[derive(Debug, Error)]
pub enum PredictError {
    /// A rendered field was left without a value.
    #[error("Field '{field}' needs a value")]
    MissingValue { field: String },
    /// A continuous field's value does not parse as a number.
    #[error("Field '{field}' must be a number, got '{value}'")]
    NotNumeric { field: String, value: String },
    /// The engine produced a row with no columns.
    #[error("Scoring produced an empty result row")]
    EmptyResult,
    /// The scoring call itself failed.
    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// The value read back from the predicted column.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    /// Column the value was read from.
    pub column: String,
    /// Predicted label or number.
    pub value: Value,
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.value.fmt(f)
    }
}

/// A loaded model: source path, extracted schema and compiled engine.
pub struct Session {
    path: PathBuf,
    schema: ModelSchema,
    engine: Box<dyn ScoringEngine>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("path", &self.path)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Load a PMML file into a fresh session. All-or-nothing: every part is
    /// parsed before anything is returned.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = roxmltree::Document::parse(&text)?;
        let schema = ModelSchema::from_document(&doc)?;
        let engine = TreeModel::from_document(&doc)?;
        info!(
            "Loaded model {} ({} input fields, target {:?})",
            path.display(),
            schema.fields().len(),
            schema.target()
        );
        Ok(Self::from_parts(path.to_path_buf(), schema, Box::new(engine)))
    }

    /// Assemble a session from parts; seam for alternate engines and tests.
    pub fn from_parts(path: PathBuf, schema: ModelSchema, engine: Box<dyn ScoringEngine>) -> Self {
        Self {
            path,
            schema,
            engine,
        }
    }

    /// Path the model was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extracted input schema.
    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    /// Validate the entered values, score them, and read back the predicted
    /// column.
    ///
    /// `values` maps field names to the text the user entered or selected.
    /// Every schema field must be covered by a non-empty entry; continuous
    /// fields must parse as numbers. Validation failures name the field and
    /// never reach the engine.
    pub fn predict(&self, values: &[(String, String)]) -> Result<Prediction, PredictError> {
        let record = self.build_record(values)?;
        let row = self.engine.predict(&record)?;
        let prediction = self.resolve_output(&row)?;
        info!(
            "Prediction from {}: {} = {}",
            self.path.display(),
            prediction.column,
            prediction.value
        );
        Ok(prediction)
    }

    fn build_record(&self, values: &[(String, String)]) -> Result<Record, PredictError> {
        let mut record = Record::new();
        for field in self.schema.fields() {
            let entered = values
                .iter()
                .find(|(name, _)| name == &field.name)
                .map(|(_, value)| value.trim())
                .filter(|text| !text.is_empty());
            let Some(text) = entered else {
                return Err(PredictError::MissingValue {
                    field: field.name.clone(),
                });
            };
            let value = if field.op_type == OpType::Continuous {
                let number: f64 = text.parse().map_err(|_| PredictError::NotNumeric {
                    field: field.name.clone(),
                    value: text.to_string(),
                })?;
                Value::Number(number)
            } else {
                Value::Text(text.to_string())
            };
            record.insert(&field.name, value);
        }
        Ok(record)
    }

    /// The predicted column is the engine's first declared output name when
    /// the row carries it, else the row's last column.
    fn resolve_output(&self, row: &ResultRow) -> Result<Prediction, PredictError> {
        if let Some(name) = self.engine.output_names().first() {
            if let Some(value) = row.get(name) {
                return Ok(Prediction {
                    column: name.clone(),
                    value: value.clone(),
                });
            }
        }
        row.last()
            .map(|(column, value)| Prediction {
                column: column.clone(),
                value: value.clone(),
            })
            .ok_or(PredictError::EmptyResult)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = r#"<PMML xmlns="http://www.dmg.org/PMML-4_2">
      <DataDictionary>
        <DataField name="outlook" optype="categorical" dataType="string">
          <Value value="sunny"/>
          <Value value="rain"/>
        </DataField>
        <DataField name="humidity" optype="continuous" dataType="double">
          <Interval closure="closedClosed" leftMargin="0" rightMargin="1"/>
        </DataField>
        <DataField name="play" optype="categorical" dataType="string"/>
      </DataDictionary>
      <TreeModel functionName="classification">
        <MiningSchema>
          <MiningField name="outlook"/>
          <MiningField name="humidity"/>
          <MiningField name="play" usageType="target"/>
        </MiningSchema>
        <Node score="no">
          <True/>
          <Node score="yes">
            <CompoundPredicate booleanOperator="and">
              <SimplePredicate field="outlook" operator="equal" value="sunny"/>
              <SimplePredicate field="humidity" operator="lessOrEqual" value="0.7"/>
            </CompoundPredicate>
          </Node>
        </Node>
      </TreeModel>
    </PMML>"#;

    fn write_model(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("model.pmml");
        std::fs::write(&path, MODEL).unwrap();
        path
    }

    fn entries(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    /// Engine that must never be reached; validation failures stop earlier.
    struct Unreachable;

    impl ScoringEngine for Unreachable {
        fn predict(&self, _record: &Record) -> Result<ResultRow, ScoreError> {
            panic!("validation must stop before the engine is invoked");
        }

        fn output_names(&self) -> &[String] {
            &[]
        }
    }

    fn unreachable_session() -> Session {
        let schema = ModelSchema::parse(MODEL).unwrap();
        Session::from_parts("model.pmml".into(), schema, Box::new(Unreachable))
    }

    #[test]
    fn load_and_predict_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::load(&write_model(&dir)).unwrap();
        assert_eq!(session.schema().fields().len(), 2);

        let prediction = session
            .predict(&entries(&[("outlook", "sunny"), ("humidity", "0.5")]))
            .unwrap();
        assert_eq!(prediction.column, "predicted_play");
        assert_eq!(prediction.to_string(), "yes");

        let prediction = session
            .predict(&entries(&[("outlook", "rain"), ("humidity", "0.5")]))
            .unwrap();
        assert_eq!(prediction.to_string(), "no");
    }

    #[test]
    fn empty_field_blocks_prediction_before_the_engine() {
        let session = unreachable_session();
        let err = session
            .predict(&entries(&[("outlook", "sunny"), ("humidity", "  ")]))
            .unwrap_err();
        match err {
            PredictError::MissingValue { field } => assert_eq!(field, "humidity"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn absent_field_blocks_prediction_before_the_engine() {
        let session = unreachable_session();
        let err = session
            .predict(&entries(&[("humidity", "0.5")]))
            .unwrap_err();
        match err {
            PredictError::MissingValue { field } => assert_eq!(field, "outlook"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_continuous_value_blocks_prediction() {
        let session = unreachable_session();
        let err = session
            .predict(&entries(&[("outlook", "sunny"), ("humidity", "damp")]))
            .unwrap_err();
        match err {
            PredictError::NotNumeric { field, value } => {
                assert_eq!(field, "humidity");
                assert_eq!(value, "damp");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Session::load(&dir.path().join("missing.pmml")).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn output_resolution_falls_back_to_last_column() {
        struct Positional;

        impl ScoringEngine for Positional {
            fn predict(&self, _record: &Record) -> Result<ResultRow, ScoreError> {
                Ok(ResultRow::from_columns(vec![
                    ("first".to_string(), Value::Text("a".into())),
                    ("second".to_string(), Value::Text("b".into())),
                ]))
            }

            fn output_names(&self) -> &[String] {
                &[]
            }
        }

        let schema = ModelSchema::parse(MODEL).unwrap();
        let session = Session::from_parts("model.pmml".into(), schema, Box::new(Positional));
        let prediction = session
            .predict(&entries(&[("outlook", "sunny"), ("humidity", "0.5")]))
            .unwrap();
        assert_eq!(prediction.column, "second");
        assert_eq!(prediction.to_string(), "b");
    }
}
