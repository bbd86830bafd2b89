//! Error types for query matching and evaluation.
//!
//! Matching failures are reported as [`SyntaxError`]s carrying the rightmost failure position
//! and what the grammar expected there. Rule-set handlers report contract violations as
//! semantic errors. Both are wrapped in [`QueryError`].

use std::fmt;

use thiserror::Error;

/// Prefix of every syntax error label.
const LABEL_PREFIX: &str = "Invalid Query";

/// An item the matcher expected at the failure position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// A literal token such as `"AND"` or `"("`.
    Literal(&'static str),
    /// A rule reported by its description, such as "an identifier".
    Described(&'static str),
    /// The end of the input.
    End,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "{text:?}"),
            Self::Described(description) => f.write_str(description),
            Self::End => f.write_str("end of input"),
        }
    }
}

/// Input that does not match the query grammar in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// The original query string.
    pub input: String,
    /// Byte offset of the rightmost failure.
    pub position: usize,
    /// 1-based line of the failure.
    pub line: usize,
    /// 1-based column (in characters) of the failure.
    pub column: usize,
    /// Items the grammar would have accepted at the failure position.
    pub expected: Vec<Expected>,
}

impl SyntaxError {
    /// Creates a syntax error for a failure at byte offset `position` in `input`.
    pub fn new(input: &str, position: usize, expected: Vec<Expected>) -> Self {
        let position = position.min(input.len());
        let before = &input[..position];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = input[line_start..position].chars().count() + 1;
        Self {
            input: input.to_string(),
            position,
            line,
            column,
            expected,
        }
    }

    /// Renders the expected items as an English list: `a`, `a or b`, `a, b, or c`.
    fn expected_list(&self) -> String {
        let items: Vec<String> = self.expected.iter().map(ToString::to_string).collect();
        match items.as_slice() {
            [] => "nothing".to_string(),
            [only] => only.clone(),
            [first, second] => format!("{first} or {second}"),
            [init @ .., last] => format!("{}, or {last}", init.join(", ")),
        }
    }

    /// Short one-line description, e.g. `Line 1, col 7: expected an identifier`.
    pub fn short_message(&self) -> String {
        format!(
            "Line {}, col {}: expected {}",
            self.line,
            self.column,
            self.expected_list()
        )
    }

    /// Diagnostic label combining the fixed prefix with the short message.
    pub fn label(&self) -> String {
        format!("{LABEL_PREFIX}: {}", self.short_message())
    }

    /// Long message with an excerpt of the offending line and a caret under the failure.
    pub fn message(&self) -> String {
        let line_text = self.input.lines().nth(self.line - 1).unwrap_or("");
        let gutter = format!("> {} | ", self.line);
        let pad = " ".repeat(gutter.chars().count() + self.column - 1);
        format!(
            "Line {}, col {}:\n{gutter}{line_text}\n{pad}^\nExpected {}",
            self.line,
            self.column,
            self.expected_list()
        )
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// A failed query evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The input does not match the grammar.
    #[error("{0}")]
    Syntax(SyntaxError),

    /// A rule-set handler rejected a structurally valid parse.
    #[error("invalid query: {message}")]
    Semantic {
        /// Error message.
        message: String,
    },
}

impl QueryError {
    /// Creates a semantic error.
    pub fn semantic(message: impl Into<String>) -> Self {
        Self::Semantic {
            message: message.into(),
        }
    }

    /// Returns the error message without the label prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Syntax(err) => err.short_message(),
            Self::Semantic { message } => message.clone(),
        }
    }

    /// Returns the syntax error details, if this is a syntax error.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Self::Syntax(err) => Some(err),
            Self::Semantic { .. } => None,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        let Self::Syntax(err) = self else {
            return None;
        };
        let input = err.input.as_str();
        if input.matches('"').count() % 2 == 1 {
            return Some("Add a closing quote (\") to complete the phrase");
        }
        if input.matches('(').count() > input.matches(')').count() {
            return Some("Add a closing parenthesis ) to match the opening one");
        }
        if input[..err.position].trim_end().ends_with(':') {
            return Some("Keyword filters need a value, e.g. 'type:video' or 'title:\"a b\"'");
        }
        None
    }
}

impl From<SyntaxError> for QueryError {
    fn from(err: SyntaxError) -> Self {
        Self::Syntax(err)
    }
}
