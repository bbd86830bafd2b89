//! Boolean search-query parsing with pluggable evaluation rules.
//!
//! The query language:
//!
//! - **Text**: `hello world` - words and phrases
//! - **Quotes**: `"hello world"` - group words as one operand
//! - **Keywords**: `type:video`, `title:"getting started"` - field filters
//! - **AND / OR**: `a AND b`, `a OR b` - explicit operators; `AND` binds tighter
//! - **Juxtaposition**: `type:video hello` - implicit AND
//! - **Grouping**: `(a OR b) c` - precedence control
//!
//! [`parse`] evaluates a query into a [`QueryNode`] tree. The same grammar can be evaluated
//! into any other type by implementing [`RuleSet`] and passing it to [`build_rule_set`].
//!
//! # Example
//!
//! ```
//! use quarry::{QueryNode, parse};
//!
//! let query = parse("type:video hello world").unwrap();
//! assert_eq!(
//!     query,
//!     QueryNode::and(vec![
//!         QueryNode::keyword("type", "video"),
//!         QueryNode::text("hello world"),
//!     ])
//! );
//! ```

#![warn(missing_docs)]

mod ast;
mod builder;
mod error;
mod evaluator;
mod grammar;
mod matcher;
mod node;
mod rules;

pub use ast::{LogicOperator, QueryNode, flatten};
pub use builder::AstBuilder;
pub use error::{Expected, QueryError, SyntaxError};
pub use evaluator::{Evaluator, build_rule_set, parse};
pub use grammar::{GRAMMAR_SOURCE, Grammar, Rule};
pub use node::Node;
pub use rules::{RuleSet, evaluate};
