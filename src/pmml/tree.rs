//! Decision-tree model evaluation.
//!
//! Compiles the `TreeModel` element of a PMML document into an in-memory
//! tree and scores single records against it. Traversal is depth-first,
//! first-matching-child; when no child matches, the deepest scored node
//! answers. Supported predicates cover what decision-tree exporters emit:
//! `True`, `False`, `SimplePredicate`, `SimpleSetPredicate` and
//! `CompoundPredicate` with `and`/`or`.

use roxmltree::{Document, Node as XmlNode};
use thiserror::Error;

use super::engine::{Record, ResultRow, ScoreError, ScoringEngine, Value, format_number};

/// Errors raised while compiling a tree model from a document.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The document is not well-formed XML.
    #[error("Malformed PMML document: {0}")]
    Xml(#[from] roxmltree::Error),
    /// The document has no `TreeModel` element.
    #[error("Document has no TreeModel")]
    MissingTreeModel,
    /// The tree model has no root `Node`.
    #[error("TreeModel has no root Node")]
    MissingRootNode,
    /// A node predicate is missing or uses an unsupported construct.
    #[error("Unsupported node predicate: {detail}")]
    Predicate { detail: String },
    /// A score distribution entry could not be interpreted.
    #[error("Invalid score distribution: {detail}")]
    Distribution { detail: String },
}

/// Compiled decision tree plus its output naming.
#[derive(Clone, Debug)]
pub struct TreeModel {
    target: Option<String>,
    output_names: Vec<String>,
    predicted_column: String,
    root: TreeNode,
}

#[derive(Clone, Debug)]
struct TreeNode {
    predicate: Predicate,
    score: Option<String>,
    distribution: Vec<(String, f64)>,
    children: Vec<TreeNode>,
}

#[derive(Clone, Debug)]
enum Predicate {
    True,
    False,
    Simple {
        field: String,
        op: SimpleOp,
        value: String,
    },
    SimpleSet {
        field: String,
        negated: bool,
        values: Vec<String>,
    },
    Compound {
        any: bool,
        parts: Vec<Predicate>,
    },
}

#[derive(Clone, Copy, Debug)]
enum SimpleOp {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl TreeModel {
    /// Compile a tree model out of PMML text.
    pub fn parse(text: &str) -> Result<Self, TreeError> {
        let doc = Document::parse(text)?;
        Self::from_document(&doc)
    }

    /// Compile the tree model from an already-parsed document.
    pub fn from_document(doc: &Document<'_>) -> Result<Self, TreeError> {
        let tree = doc
            .descendants()
            .find(|node| node.is_element() && node.tag_name().name() == "TreeModel")
            .ok_or(TreeError::MissingTreeModel)?;

        let target = tree
            .descendants()
            .filter(|node| node.is_element() && node.tag_name().name() == "MiningField")
            .find(|node| {
                matches!(node.attribute("usageType"), Some("target") | Some("predicted"))
            })
            .and_then(|node| node.attribute("name"))
            .map(str::to_string);

        let declared_outputs: Vec<XmlNode<'_, '_>> = tree
            .descendants()
            .filter(|node| node.is_element() && node.tag_name().name() == "OutputField")
            .collect();
        let predicted_column = declared_outputs
            .iter()
            .find(|node| node.attribute("feature") == Some("predictedValue"))
            .and_then(|node| node.attribute("name"))
            .map(str::to_string)
            .unwrap_or_else(|| match &target {
                Some(target) => format!("predicted_{target}"),
                None => "predicted".to_string(),
            });
        let mut output_names: Vec<String> = declared_outputs
            .iter()
            .filter_map(|node| node.attribute("name"))
            .map(str::to_string)
            .collect();
        if output_names.is_empty() {
            output_names.push(predicted_column.clone());
        }

        let root = tree
            .children()
            .find(|node| node.is_element() && node.tag_name().name() == "Node")
            .ok_or(TreeError::MissingRootNode)?;

        Ok(Self {
            target,
            output_names,
            predicted_column,
            root: parse_node(root)?,
        })
    }

    /// Declared target field, when the mining schema names one.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Name of the predicted column in result rows.
    pub fn predicted_column(&self) -> &str {
        &self.predicted_column
    }
}

impl ScoringEngine for TreeModel {
    fn predict(&self, record: &Record) -> Result<ResultRow, ScoreError> {
        if !self.root.predicate.matches(record) {
            return Err(ScoreError::NoMatch);
        }
        let mut current = &self.root;
        let mut answer = current.score.is_some().then_some(current);
        while let Some(child) = current
            .children
            .iter()
            .find(|child| child.predicate.matches(record))
        {
            if child.score.is_some() {
                answer = Some(child);
            }
            current = child;
        }
        let node = answer.ok_or(ScoreError::Unscored)?;
        let score = node.score.clone().ok_or(ScoreError::Unscored)?;

        let mut columns = vec![(self.predicted_column.clone(), Value::Text(score))];
        let total: f64 = node.distribution.iter().map(|(_, count)| count).sum();
        if total > 0.0 {
            for (class, count) in &node.distribution {
                columns.push((format!("probability({class})"), Value::Number(count / total)));
            }
        }
        Ok(ResultRow::from_columns(columns))
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}

fn parse_node(node: XmlNode<'_, '_>) -> Result<TreeNode, TreeError> {
    let predicate = node
        .children()
        .find(|child| child.is_element() && is_predicate_tag(child.tag_name().name()))
        .ok_or_else(|| TreeError::Predicate {
            detail: "Node without a predicate".to_string(),
        })?;
    let predicate = parse_predicate(predicate)?;

    let score = node.attribute("score").map(str::to_string);

    let mut distribution = Vec::new();
    for entry in node
        .children()
        .filter(|child| child.is_element() && child.tag_name().name() == "ScoreDistribution")
    {
        let class = entry
            .attribute("value")
            .ok_or_else(|| TreeError::Distribution {
                detail: "ScoreDistribution without a value".to_string(),
            })?;
        let raw_count = entry.attribute("recordCount").unwrap_or("0");
        let count: f64 = raw_count.parse().map_err(|_| TreeError::Distribution {
            detail: format!("recordCount '{raw_count}' is not a number"),
        })?;
        distribution.push((class.to_string(), count));
    }

    let mut children = Vec::new();
    for child in node
        .children()
        .filter(|child| child.is_element() && child.tag_name().name() == "Node")
    {
        children.push(parse_node(child)?);
    }

    Ok(TreeNode {
        predicate,
        score,
        distribution,
        children,
    })
}

fn is_predicate_tag(tag: &str) -> bool {
    matches!(
        tag,
        "True" | "False" | "SimplePredicate" | "SimpleSetPredicate" | "CompoundPredicate"
    )
}

fn parse_predicate(node: XmlNode<'_, '_>) -> Result<Predicate, TreeError> {
    match node.tag_name().name() {
        "True" => Ok(Predicate::True),
        "False" => Ok(Predicate::False),
        "SimplePredicate" => {
            let field = required_attr(node, "field")?;
            let value = required_attr(node, "value")?;
            let operator = required_attr(node, "operator")?;
            let op = match operator.as_str() {
                "equal" => SimpleOp::Equal,
                "notEqual" => SimpleOp::NotEqual,
                "lessThan" => SimpleOp::LessThan,
                "lessOrEqual" => SimpleOp::LessOrEqual,
                "greaterThan" => SimpleOp::GreaterThan,
                "greaterOrEqual" => SimpleOp::GreaterOrEqual,
                other => {
                    return Err(TreeError::Predicate {
                        detail: format!("operator '{other}'"),
                    });
                }
            };
            Ok(Predicate::Simple { field, op, value })
        }
        "SimpleSetPredicate" => {
            let field = required_attr(node, "field")?;
            let operator = required_attr(node, "booleanOperator")?;
            let negated = match operator.as_str() {
                "isIn" => false,
                "isNotIn" => true,
                other => {
                    return Err(TreeError::Predicate {
                        detail: format!("booleanOperator '{other}'"),
                    });
                }
            };
            let array = node
                .children()
                .find(|child| child.is_element() && child.tag_name().name() == "Array")
                .ok_or_else(|| TreeError::Predicate {
                    detail: "SimpleSetPredicate without an Array".to_string(),
                })?;
            let values = parse_array_tokens(array.text().unwrap_or(""));
            Ok(Predicate::SimpleSet {
                field,
                negated,
                values,
            })
        }
        "CompoundPredicate" => {
            let operator = required_attr(node, "booleanOperator")?;
            let any = match operator.as_str() {
                "and" => false,
                "or" => true,
                other => {
                    return Err(TreeError::Predicate {
                        detail: format!("compound booleanOperator '{other}'"),
                    });
                }
            };
            let mut parts = Vec::new();
            for child in node
                .children()
                .filter(|child| child.is_element() && is_predicate_tag(child.tag_name().name()))
            {
                parts.push(parse_predicate(child)?);
            }
            if parts.is_empty() {
                return Err(TreeError::Predicate {
                    detail: "empty CompoundPredicate".to_string(),
                });
            }
            Ok(Predicate::Compound { any, parts })
        }
        other => Err(TreeError::Predicate {
            detail: format!("element '{other}'"),
        }),
    }
}

fn required_attr(node: XmlNode<'_, '_>, attr: &str) -> Result<String, TreeError> {
    node.attribute(attr)
        .map(str::to_string)
        .ok_or_else(|| TreeError::Predicate {
            detail: format!("{} without {attr}", node.tag_name().name()),
        })
}

/// Split a PMML array body into tokens, honoring double-quoted entries.
fn parse_array_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in text.chars() {
        match ch {
            '"' => {
                if in_quotes {
                    tokens.push(std::mem::take(&mut current));
                }
                in_quotes = !in_quotes;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

impl Predicate {
    fn matches(&self, record: &Record) -> bool {
        match self {
            Self::True => true,
            Self::False => false,
            Self::Simple { field, op, value } => {
                let Some(entry) = record.get(field) else {
                    return false;
                };
                match op {
                    SimpleOp::Equal => value_matches_token(entry, value),
                    SimpleOp::NotEqual => !value_matches_token(entry, value),
                    SimpleOp::LessThan => numeric_cmp(entry, value, |a, b| a < b),
                    SimpleOp::LessOrEqual => numeric_cmp(entry, value, |a, b| a <= b),
                    SimpleOp::GreaterThan => numeric_cmp(entry, value, |a, b| a > b),
                    SimpleOp::GreaterOrEqual => numeric_cmp(entry, value, |a, b| a >= b),
                }
            }
            Self::SimpleSet {
                field,
                negated,
                values,
            } => {
                let Some(entry) = record.get(field) else {
                    return false;
                };
                let contained = values.iter().any(|value| value_matches_token(entry, value));
                contained != *negated
            }
            Self::Compound { any, parts } => {
                if *any {
                    parts.iter().any(|part| part.matches(record))
                } else {
                    parts.iter().all(|part| part.matches(record))
                }
            }
        }
    }
}

/// Equality between a record value and a predicate token: numeric when both
/// sides parse as numbers, textual otherwise.
fn value_matches_token(entry: &Value, token: &str) -> bool {
    match (entry.as_number(), token.trim().parse::<f64>()) {
        (Some(left), Ok(right)) => left == right,
        _ => match entry {
            Value::Text(text) => text == token,
            Value::Number(number) => format_number(*number) == token,
        },
    }
}

fn numeric_cmp(entry: &Value, token: &str, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (entry.as_number(), token.trim().parse::<f64>()) {
        (Some(left), Ok(right)) => cmp(left, right),
        _ => false,
    }
}
