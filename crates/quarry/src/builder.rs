//! The default rule-set, building a [`QueryNode`] tree.

use crate::{
    ast::{LogicOperator, QueryNode, flatten},
    error::QueryError,
    node::Node,
    rules::RuleSet,
};

/// Rule-set that evaluates a parse into a [`QueryNode`].
///
/// - Quotes and parentheses only group; neither leaves a node behind.
/// - `AND`/`OR` chains become one flat n-ary node per operator run.
/// - Juxtaposed text merges into one text node; anything else juxtaposed is an AND.
#[derive(Debug, Clone, Copy, Default)]
pub struct AstBuilder;

impl AstBuilder {
    /// Evaluates both operands and combines them under `operator`.
    fn logic(
        &self,
        operator: LogicOperator,
        left: &Node<'_>,
        right: &Node<'_>,
    ) -> Result<QueryNode, QueryError> {
        let children = vec![left.eval(self)?, right.eval(self)?];
        Ok(flatten(QueryNode::Logic { operator, children }))
    }

    /// Builds a keyword node; the value must evaluate to text.
    fn keyword(&self, key: &Node<'_>, value: &Node<'_>) -> Result<QueryNode, QueryError> {
        match value.eval(self)? {
            QueryNode::Text { value } => Ok(QueryNode::keyword(key.text(), value)),
            other => Err(QueryError::semantic(format!(
                "invalid keyword value for '{}': expected text, got {}",
                key.text(),
                other.to_query_string()
            ))),
        }
    }
}

impl RuleSet for AstBuilder {
    type Output = QueryNode;

    fn logical_and(
        &self,
        left: &Node<'_>,
        _op: &Node<'_>,
        right: &Node<'_>,
    ) -> Result<QueryNode, QueryError> {
        self.logic(LogicOperator::And, left, right)
    }

    fn logical_or(
        &self,
        left: &Node<'_>,
        _op: &Node<'_>,
        right: &Node<'_>,
    ) -> Result<QueryNode, QueryError> {
        self.logic(LogicOperator::Or, left, right)
    }

    fn logical_join(&self, left: &Node<'_>, right: &Node<'_>) -> Result<QueryNode, QueryError> {
        match (left.eval(self)?, right.eval(self)?) {
            (QueryNode::Text { value: left }, QueryNode::Text { value: right }) => {
                Ok(QueryNode::text(format!("{left} {right}")))
            }
            (left, right) => Ok(flatten(QueryNode::and(vec![left, right]))),
        }
    }

    fn paren(
        &self,
        _open: &Node<'_>,
        exp: &Node<'_>,
        _close: &Node<'_>,
    ) -> Result<QueryNode, QueryError> {
        exp.eval(self)
    }

    fn quote(
        &self,
        _open: &Node<'_>,
        exp: &Node<'_>,
        _close: &Node<'_>,
    ) -> Result<QueryNode, QueryError> {
        exp.eval(self)
    }

    fn keyword_quoted(
        &self,
        key: &Node<'_>,
        _open: &Node<'_>,
        value: &Node<'_>,
        _close: &Node<'_>,
    ) -> Result<QueryNode, QueryError> {
        self.keyword(key, value)
    }

    fn keyword_simple(
        &self,
        key: &Node<'_>,
        _colon: &Node<'_>,
        value: &Node<'_>,
    ) -> Result<QueryNode, QueryError> {
        self.keyword(key, value)
    }

    fn spaced(
        &self,
        left: &Node<'_>,
        _spaces: &Node<'_>,
        right: &Node<'_>,
    ) -> Result<QueryNode, QueryError> {
        Ok(QueryNode::text(format!("{} {}", left.text(), right.text())))
    }

    fn ident(&self, ident: &Node<'_>) -> Result<QueryNode, QueryError> {
        Ok(QueryNode::text(ident.text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Grammar, Rule};

    fn build(input: &str) -> QueryNode {
        Grammar::shared()
            .match_query(input)
            .unwrap()
            .eval(&AstBuilder)
            .unwrap()
    }

    #[test]
    fn ident_is_text() {
        assert_eq!(build("hello"), QueryNode::text("hello"));
    }

    #[test]
    fn quoted_value_keeps_raw_spacing() {
        assert_eq!(
            build("title:\"test    document  here\""),
            QueryNode::keyword("title", "test    document here")
        );
        assert_eq!(
            build("title:\"a  b\tc\""),
            QueryNode::keyword("title", "a  b c")
        );
    }

    #[test]
    fn join_coalesces_text() {
        assert_eq!(build("a b c"), QueryNode::text("a b c"));
    }

    #[test]
    fn join_with_keyword_is_and() {
        assert_eq!(
            build("hello world type:video"),
            QueryNode::and(vec![
                QueryNode::text("hello"),
                QueryNode::text("world"),
                QueryNode::keyword("type", "video"),
            ])
        );
    }

    #[test]
    fn keyword_value_must_be_text() {
        let value = Grammar::shared().match_query("a AND b").unwrap();
        let key = Node::leaf(Rule::Ident, "title", 0..5);
        let err = AstBuilder.keyword(&key, &value).unwrap_err();
        assert_eq!(
            err,
            QueryError::semantic("invalid keyword value for 'title': expected text, got a AND b")
        );
    }
}
