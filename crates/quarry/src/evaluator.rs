//! Evaluators: a rule-set attached to the shared grammar.

use crate::{
    ast::QueryNode, builder::AstBuilder, error::QueryError, grammar::Grammar, rules::RuleSet,
};

/// Parses queries and evaluates them under one rule-set.
///
/// Evaluators are independent of each other; they share only the immutable grammar.
#[derive(Debug, Clone)]
pub struct Evaluator<R> {
    /// Grammar queries are matched against.
    grammar: &'static Grammar,
    /// Handlers the parse is evaluated with.
    rules: R,
}

impl<R: RuleSet> Evaluator<R> {
    /// Parses `query` and evaluates it.
    ///
    /// Fails with a syntax error if `query` does not match the grammar in full, or with
    /// whatever error a handler raises.
    pub fn evaluate(&self, query: &str) -> Result<R::Output, QueryError> {
        let tree = self.grammar.match_query(query)?;
        tree.eval(&self.rules)
    }

    /// The rule-set this evaluator runs.
    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// The grammar this evaluator matches against.
    pub fn grammar(&self) -> &'static Grammar {
        self.grammar
    }
}

/// Builds an evaluator for a custom rule-set over the shared grammar.
pub fn build_rule_set<R: RuleSet>(rules: R) -> Evaluator<R> {
    Evaluator {
        grammar: Grammar::shared(),
        rules,
    }
}

/// Parses a query string into a [`QueryNode`] tree.
///
/// # Errors
///
/// Returns a syntax error if `query` does not match the grammar in full.
pub fn parse(query: &str) -> Result<QueryNode, QueryError> {
    build_rule_set(AstBuilder).evaluate(query)
}

#[cfg(test)]
mod tests {
    use std::ptr;

    use super::*;

    #[test]
    fn parse_uses_default_rules() {
        assert_eq!(parse("hello world").unwrap(), QueryNode::text("hello world"));
    }

    #[test]
    fn evaluators_share_the_grammar() {
        let first = build_rule_set(AstBuilder);
        let second = build_rule_set(AstBuilder);
        assert!(ptr::eq(first.grammar(), second.grammar()));
    }

    #[test]
    fn syntax_error_has_no_output() {
        let err = build_rule_set(AstBuilder).evaluate("title:").unwrap_err();
        assert!(err.as_syntax().is_some());
    }

    #[test]
    fn evaluator_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Evaluator<AstBuilder>>();
        assert_send_sync::<QueryNode>();
        assert_send_sync::<QueryError>();
    }
}
