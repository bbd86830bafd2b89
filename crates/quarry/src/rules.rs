//! Pluggable evaluation of parse trees.
//!
//! A [`RuleSet`] supplies one handler per grammar alternative. Each handler receives the
//! alternative's children as [`Node`] handles and decides whether to evaluate them (under the
//! same rule-set, via [`Node::eval`]) or to use their raw text. [`evaluate`] dispatches a node to
//! the handler for the alternative that matched there.
//!
//! Any number of rule-sets can be run against the one grammar, each producing its own output
//! type.

use crate::{error::QueryError, grammar::Rule, node::Node};

/// A table of handlers, one per grammar alternative, sharing one output type.
///
/// Pass-through alternatives (`Exp`, `LogicalExp`, `PriExp` and `spacedString` with a single
/// child) evaluate their child by default. Literal tokens have no meaning of their own and fail
/// to evaluate unless [`RuleSet::terminal`] is overridden.
pub trait RuleSet {
    /// The value every handler produces.
    type Output;

    /// `Exp = LogicalExp`
    fn exp(&self, exp: &Node<'_>) -> Result<Self::Output, QueryError> {
        exp.eval(self)
    }

    /// `LogicalExp_and`: `left "AND" right`.
    fn logical_and(
        &self,
        left: &Node<'_>,
        op: &Node<'_>,
        right: &Node<'_>,
    ) -> Result<Self::Output, QueryError>;

    /// `LogicalExp_or`: `left "OR" right`.
    fn logical_or(
        &self,
        left: &Node<'_>,
        op: &Node<'_>,
        right: &Node<'_>,
    ) -> Result<Self::Output, QueryError>;

    /// `LogicalExp_join`: `left right`, with no operator between them.
    fn logical_join(&self, left: &Node<'_>, right: &Node<'_>) -> Result<Self::Output, QueryError>;

    /// `LogicalExp`: a lone operand.
    fn logical_exp(&self, exp: &Node<'_>) -> Result<Self::Output, QueryError> {
        exp.eval(self)
    }

    /// `PriExp_paren`: `"(" exp ")"`.
    fn paren(
        &self,
        open: &Node<'_>,
        exp: &Node<'_>,
        close: &Node<'_>,
    ) -> Result<Self::Output, QueryError>;

    /// `PriExp_quote`: `"\"" exp "\""`.
    fn quote(
        &self,
        open: &Node<'_>,
        exp: &Node<'_>,
        close: &Node<'_>,
    ) -> Result<Self::Output, QueryError>;

    /// `PriExp`: a keyword expression or an identifier.
    fn pri_exp(&self, exp: &Node<'_>) -> Result<Self::Output, QueryError> {
        exp.eval(self)
    }

    /// `KeywordExp_quoted`: `key ":\"" value "\""`.
    fn keyword_quoted(
        &self,
        key: &Node<'_>,
        open: &Node<'_>,
        value: &Node<'_>,
        close: &Node<'_>,
    ) -> Result<Self::Output, QueryError>;

    /// `KeywordExp_simple`: `key ":" value`.
    fn keyword_simple(
        &self,
        key: &Node<'_>,
        colon: &Node<'_>,
        value: &Node<'_>,
    ) -> Result<Self::Output, QueryError>;

    /// `spacedString_spaced`: `left spaces right`, inside a quoted keyword value.
    fn spaced(
        &self,
        left: &Node<'_>,
        spaces: &Node<'_>,
        right: &Node<'_>,
    ) -> Result<Self::Output, QueryError>;

    /// `spacedString`: a lone identifier inside a quoted keyword value.
    fn spaced_string(&self, ident: &Node<'_>) -> Result<Self::Output, QueryError> {
        ident.eval(self)
    }

    /// `ident`: a single identifier.
    fn ident(&self, ident: &Node<'_>) -> Result<Self::Output, QueryError>;

    /// A literal token or a run of whitespace.
    fn terminal(&self, node: &Node<'_>) -> Result<Self::Output, QueryError> {
        Err(QueryError::semantic(format!(
            "missing semantic action for {}",
            node.rule()
        )))
    }
}

/// Evaluates `node` by invoking the handler for the alternative that matched there.
pub fn evaluate<R>(node: &Node<'_>, rules: &R) -> Result<R::Output, QueryError>
where
    R: RuleSet + ?Sized,
{
    match (node.rule(), node.children()) {
        (Rule::Exp, [exp]) => rules.exp(exp),
        (Rule::LogicalExpAnd, [left, op, right]) => rules.logical_and(left, op, right),
        (Rule::LogicalExpOr, [left, op, right]) => rules.logical_or(left, op, right),
        (Rule::LogicalExpJoin, [left, right]) => rules.logical_join(left, right),
        (Rule::LogicalExp, [exp]) => rules.logical_exp(exp),
        (Rule::PriExpParen, [open, exp, close]) => rules.paren(open, exp, close),
        (Rule::PriExpQuote, [open, exp, close]) => rules.quote(open, exp, close),
        (Rule::PriExp, [exp]) => rules.pri_exp(exp),
        (Rule::KeywordExpQuoted, [key, open, value, close]) => {
            rules.keyword_quoted(key, open, value, close)
        }
        (Rule::KeywordExpSimple, [key, colon, value]) => rules.keyword_simple(key, colon, value),
        (Rule::SpacedStringSpaced, [left, spaces, right]) => rules.spaced(left, spaces, right),
        (Rule::SpacedString, [ident]) => rules.spaced_string(ident),
        (Rule::Ident, []) => rules.ident(node),
        (Rule::Spaces | Rule::Terminal, []) => rules.terminal(node),
        (rule, children) => unreachable!(
            "{rule} node with {} children; the matcher builds {}",
            children.len(),
            rule.arity()
        ),
    }
}
