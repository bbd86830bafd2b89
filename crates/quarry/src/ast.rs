//! Query tree.
//!
//! The default rule-set evaluates a parse into a [`QueryNode`]: free text, keyword filters and
//! n-ary boolean combinations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Boolean operator of a [`QueryNode::Logic`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicOperator {
    /// Every child must match.
    And,
    /// At least one child must match.
    Or,
}

impl LogicOperator {
    /// The operator keyword as written in a query.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for LogicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A parsed query.
///
/// Serializes to the tagged JSON shape `{"type": "string" | "keyword" | "logic", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QueryNode {
    /// Free text: a word or a phrase.
    #[serde(rename = "string")]
    Text {
        /// The text.
        value: String,
    },

    /// A field filter, `key:value` or `key:"some value"`.
    Keyword {
        /// Field name.
        key: String,
        /// Value the field is filtered by.
        value: String,
    },

    /// Boolean combination of two or more children.
    Logic {
        /// How the children combine.
        #[serde(rename = "value")]
        operator: LogicOperator,
        /// Operands in source order.
        children: Vec<Self>,
    },
}

impl QueryNode {
    /// Creates a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Creates a keyword node.
    pub fn keyword(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Keyword {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates an AND node over `children`, as written.
    pub fn and(children: Vec<Self>) -> Self {
        Self::Logic {
            operator: LogicOperator::And,
            children,
        }
    }

    /// Creates an OR node over `children`, as written.
    pub fn or(children: Vec<Self>) -> Self {
        Self::Logic {
            operator: LogicOperator::Or,
            children,
        }
    }

    /// Returns the text if this is a text node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { value } => Some(value),
            _ => None,
        }
    }

    /// Returns the operator if this is a logic node.
    pub fn operator(&self) -> Option<LogicOperator> {
        match self {
            Self::Logic { operator, .. } => Some(*operator),
            _ => None,
        }
    }

    /// Formats the node as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Text { value } => writeln!(f, "{prefix}Text({value:?})"),
            Self::Keyword { key, value } => writeln!(f, "{prefix}Keyword({key:?}, {value:?})"),
            Self::Logic { operator, children } => {
                let name = match operator {
                    LogicOperator::And => "And",
                    LogicOperator::Or => "Or",
                };
                writeln!(f, "{prefix}{name}")?;
                for child in children {
                    child.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }

    /// Formats the node as query text that parses back to an equal node.
    ///
    /// Operators are always explicit, multi-word text is quoted, and children with a
    /// different operator than their parent are parenthesized: `"a b" AND (c OR type:video)`.
    /// Inside quoted text, words starting with an operator keyword are parenthesized so they
    /// stay words: `"a (OR) b"`.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Text { value } => render_text(value),
            Self::Keyword { key, value } => {
                if value.contains(' ') {
                    format!("{key}:\"{value}\"")
                } else {
                    format!("{key}:{value}")
                }
            }
            Self::Logic { operator, children } => {
                let parts: Vec<String> = children
                    .iter()
                    .map(|child| match child {
                        Self::Logic { .. } => format!("({})", child.to_query_string()),
                        _ => child.to_query_string(),
                    })
                    .collect();
                parts.join(&format!(" {operator} "))
            }
        }
    }
}

/// Renders free text as a single operand.
fn render_text(value: &str) -> String {
    if !value.contains(' ') {
        return value.to_string();
    }
    let words: Vec<String> = value
        .split(' ')
        .map(|word| {
            if starts_with_operator(word) {
                format!("({word})")
            } else {
                word.to_string()
            }
        })
        .collect();
    format!("\"{}\"", words.join(" "))
}

/// Whether `word` would be read as an operator when it follows another operand.
fn starts_with_operator(word: &str) -> bool {
    [LogicOperator::And, LogicOperator::Or]
        .iter()
        .any(|op| word.starts_with(op.keyword()))
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

/// Collapses same-operator nesting in a freshly built logic node.
///
/// A child with the node's own operator has its children spliced in its place, so the
/// right-leaning chains the grammar produces become one n-ary node with children in source
/// order. Children with a different operator are kept as they are. Anything other than a logic
/// node is returned unchanged.
pub fn flatten(node: QueryNode) -> QueryNode {
    let QueryNode::Logic { operator, children } = node else {
        return node;
    };

    let mut flat = Vec::with_capacity(children.len());
    for child in children {
        match child {
            QueryNode::Logic {
                operator: inner,
                children: grandchildren,
            } if inner == operator => flat.extend(grandchildren),
            other => flat.push(other),
        }
    }

    QueryNode::Logic {
        operator,
        children: flat,
    }
}
