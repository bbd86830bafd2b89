//! Parse tree nodes.
//!
//! A [`Node`] records which rule alternative matched, the span of input it covered, and its
//! children. Rule-set handlers receive nodes as handles: they can read the raw text or evaluate
//! the node under the active rule-set.
//!
//! Children are reference counted so the matcher can keep a matched subtree in its memo and
//! hand it out again without copying it.

use std::{ops::Range, rc::Rc};

use crate::{
    error::QueryError,
    grammar::Rule,
    rules::{RuleSet, evaluate},
};

/// A node of a successful parse.
///
/// Each node is owned by its parent; the root is owned by the caller of
/// [`Grammar::match_query`](crate::Grammar::match_query).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<'a> {
    /// The alternative that matched.
    rule: Rule,
    /// The full input the node was matched against.
    input: &'a str,
    /// Byte range of the match within `input`.
    span: Range<usize>,
    /// Child nodes, in source order.
    children: Vec<Rc<Self>>,
}

impl<'a> Node<'a> {
    /// Creates a node with children.
    pub(crate) fn new(
        rule: Rule,
        input: &'a str,
        span: Range<usize>,
        children: Vec<Rc<Self>>,
    ) -> Self {
        debug_assert_eq!(rule.arity(), children.len(), "arity mismatch for {rule}");
        Self {
            rule,
            input,
            span,
            children,
        }
    }

    /// Creates a leaf node.
    pub(crate) fn leaf(rule: Rule, input: &'a str, span: Range<usize>) -> Self {
        Self::new(rule, input, span, Vec::new())
    }

    /// The alternative that matched at this node.
    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// The raw input text matched by this node.
    pub fn text(&self) -> &'a str {
        &self.input[self.span.clone()]
    }

    /// Byte range of the match within the input.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Child nodes, in source order.
    pub fn children(&self) -> &[Rc<Self>] {
        &self.children
    }

    /// Evaluates this node under `rules`.
    pub fn eval<R>(&self, rules: &R) -> Result<R::Output, QueryError>
    where
        R: RuleSet + ?Sized,
    {
        evaluate(self, rules)
    }
}
