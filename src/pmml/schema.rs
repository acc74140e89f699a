//! Schema extraction from PMML documents.
//!
//! Reads the mining schema and data dictionary to recover the model's active
//! input fields, their operational types and their legal values or numeric
//! intervals. Element names are matched in any PMML namespace so documents
//! exported for nearby DMG versions load the same way.

use std::fmt;
use std::path::PathBuf;

use roxmltree::{Document, Node};
use thiserror::Error;

/// Operational type declared for a data field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpType {
    /// Finite enumerated value set.
    Categorical,
    /// Numeric range.
    Continuous,
    /// Anything else; rendered as free text.
    Other,
}

impl OpType {
    fn from_attr(attr: Option<&str>) -> Self {
        match attr {
            Some("categorical") | Some("ordinal") => Self::Categorical,
            Some("continuous") => Self::Continuous,
            _ => Self::Other,
        }
    }
}

/// Interval boundary inclusion policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Closure {
    OpenOpen,
    OpenClosed,
    ClosedOpen,
    ClosedClosed,
}

impl Closure {
    /// Parse the PMML `closure` attribute token.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "openOpen" => Some(Self::OpenOpen),
            "openClosed" => Some(Self::OpenClosed),
            "closedOpen" => Some(Self::ClosedOpen),
            "closedClosed" => Some(Self::ClosedClosed),
            _ => None,
        }
    }

    /// Whether the left boundary is excluded from the interval.
    pub fn excludes_left(self) -> bool {
        matches!(self, Self::OpenOpen | Self::OpenClosed)
    }

    /// Whether the right boundary is excluded from the interval.
    pub fn excludes_right(self) -> bool {
        matches!(self, Self::OpenOpen | Self::ClosedOpen)
    }

    /// The PMML attribute token for this closure.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenOpen => "openOpen",
            Self::OpenClosed => "openClosed",
            Self::ClosedOpen => "closedOpen",
            Self::ClosedClosed => "closedClosed",
        }
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric interval declared for a continuous field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    pub left: f64,
    pub right: f64,
    pub closure: Closure,
}

/// One active input field as declared by the model.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    /// Field name; unique key into records.
    pub name: String,
    /// Operational type from the data dictionary.
    pub op_type: OpType,
    /// Declared data type token (`string`, `double`, ...).
    pub data_type: String,
    /// Enumerated legal values, in document order. Empty when none declared.
    pub values: Vec<String>,
    /// Declared numeric interval, when present. Only the first interval of a
    /// field is honored.
    pub interval: Option<Interval>,
}

/// Ordered active input fields plus the declared target.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelSchema {
    fields: Vec<FieldDescriptor>,
    target: Option<String>,
}

/// Errors raised while extracting a schema from a document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Reading the document from disk failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The document is not well-formed XML.
    #[error("Malformed PMML document: {0}")]
    Xml(#[from] roxmltree::Error),
    /// The document declares no mining schema.
    #[error("Document has no MiningSchema")]
    MissingMiningSchema,
    /// The document declares no data dictionary.
    #[error("Document has no DataDictionary")]
    MissingDataDictionary,
    /// A mining field carries no name attribute.
    #[error("MiningField without a name attribute")]
    UnnamedField,
    /// An active mining field has no data dictionary entry.
    #[error("No DataField entry for mining field '{name}'")]
    MissingDataField { name: String },
    /// An interval on a field could not be interpreted.
    #[error("Invalid interval on field '{name}': {detail}")]
    BadInterval { name: String, detail: String },
}

impl ModelSchema {
    /// Parse a schema out of PMML text.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let doc = Document::parse(text)?;
        Self::from_document(&doc)
    }

    /// Extract the schema from an already-parsed document.
    pub fn from_document(doc: &Document<'_>) -> Result<Self, SchemaError> {
        let mining = find_element(doc, "MiningSchema").ok_or(SchemaError::MissingMiningSchema)?;
        let dictionary =
            find_element(doc, "DataDictionary").ok_or(SchemaError::MissingDataDictionary)?;

        let mut fields = Vec::new();
        let mut target = None;
        for mining_field in child_elements(mining, "MiningField") {
            let name = mining_field
                .attribute("name")
                .ok_or(SchemaError::UnnamedField)?;
            let usage = mining_field.attribute("usageType").unwrap_or("active");
            if usage == "target" || usage == "predicted" {
                if target.is_none() {
                    target = Some(name.to_string());
                }
                continue;
            }
            let data_field = child_elements(dictionary, "DataField")
                .find(|df| df.attribute("name") == Some(name))
                .ok_or_else(|| SchemaError::MissingDataField {
                    name: name.to_string(),
                })?;
            fields.push(descriptor_from(name, data_field)?);
        }
        Ok(Self { fields, target })
    }

    /// Active input fields in mining-schema order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Declared target field name, when the mining schema names one.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Look up a field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

fn descriptor_from(name: &str, data_field: Node<'_, '_>) -> Result<FieldDescriptor, SchemaError> {
    let op_type = OpType::from_attr(data_field.attribute("optype"));
    let data_type = data_field.attribute("dataType").unwrap_or("string").to_string();

    let values = child_elements(data_field, "Value")
        .filter_map(|value| value.attribute("value"))
        .map(str::to_string)
        .collect();

    let interval = match child_elements(data_field, "Interval").next() {
        Some(node) => Some(parse_interval(name, node)?),
        None => None,
    };

    Ok(FieldDescriptor {
        name: name.to_string(),
        op_type,
        data_type,
        values,
        interval,
    })
}

fn parse_interval(name: &str, node: Node<'_, '_>) -> Result<Interval, SchemaError> {
    let margin = |attr: &str| -> Result<f64, SchemaError> {
        let raw = node
            .attribute(attr)
            .ok_or_else(|| SchemaError::BadInterval {
                name: name.to_string(),
                detail: format!("missing {attr}"),
            })?;
        raw.parse().map_err(|_| SchemaError::BadInterval {
            name: name.to_string(),
            detail: format!("{attr} '{raw}' is not a number"),
        })
    };
    let left = margin("leftMargin")?;
    let right = margin("rightMargin")?;
    let closure_attr = node.attribute("closure").unwrap_or("closedClosed");
    let closure = Closure::parse(closure_attr).ok_or_else(|| SchemaError::BadInterval {
        name: name.to_string(),
        detail: format!("unknown closure '{closure_attr}'"),
    })?;
    Ok(Interval {
        left,
        right,
        closure,
    })
}

fn find_element<'a, 'd>(doc: &'a Document<'d>, tag: &str) -> Option<Node<'a, 'd>> {
    doc.descendants()
        .find(|node| node.is_element() && node.tag_name().name() == tag)
}

fn child_elements<'a, 'd>(
    parent: Node<'a, 'd>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'd>> + 'a {
    parent
        .children()
        .filter(move |node| node.is_element() && node.tag_name().name() == tag)
}
