//! PMML document handling: schema extraction, interval discretization and
//! tree-model scoring.
//!
//! Only the constructs the application consumes are interpreted: the mining
//! schema, the data dictionary, the tree model and its output section.

pub mod discretize;
pub mod engine;
pub mod schema;
pub mod tree;

pub use engine::{Record, ResultRow, ScoreError, ScoringEngine, Value, format_number};
pub use schema::{Closure, FieldDescriptor, Interval, ModelSchema, OpType, SchemaError};
pub use tree::{TreeError, TreeModel};
