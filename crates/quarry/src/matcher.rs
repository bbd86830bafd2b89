//! Query matcher.
//!
//! Matches input text against the grammar by recursive descent. Every parse function takes a
//! byte position and returns the matched node together with the position just past it, so
//! trying another alternative only means calling again from the same position.
//!
//! The matcher remembers the rightmost position at which any item failed to match and what
//! was expected there. When the whole match fails, that position is the one reported.

use std::{collections::HashMap, rc::Rc};

use crate::{
    error::{Expected, SyntaxError},
    grammar::Rule,
    node::Node,
};

/// A successful match: the node and the byte position just past it.
type Match<'a> = Option<(Rc<Node<'a>>, usize)>;

/// Description reported when an identifier is expected.
const IDENT_DESCRIPTION: &str = "an identifier";

/// Matcher state for a single input.
pub struct Matcher<'a> {
    /// Input being matched.
    input: &'a str,
    /// Rightmost failure position seen so far.
    furthest: usize,
    /// Items expected at `furthest`, deduplicated, in the order first seen.
    expected: Vec<Expected>,
    /// `LogicalExp` results by start position. Hits share the stored subtree.
    memo: HashMap<usize, Match<'a>>,
}

impl<'a> Matcher<'a> {
    /// Creates a matcher for `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            furthest: 0,
            expected: Vec::new(),
            memo: HashMap::new(),
        }
    }

    /// Matches the whole input against `Exp`.
    pub fn match_all(mut self) -> Result<Node<'a>, SyntaxError> {
        if let Some((root, end)) = self.exp(0) {
            let end = self.skip_spaces(end);
            if end == self.input.len() {
                return Ok(Rc::unwrap_or_clone(root));
            }
            self.fail(end, Expected::End);
        }
        Err(SyntaxError::new(self.input, self.furthest, self.expected))
    }

    /// Records that `expected` was not found at `pos`.
    fn fail(&mut self, pos: usize, expected: Expected) {
        if pos > self.furthest {
            self.furthest = pos;
            self.expected.clear();
        }
        if pos == self.furthest && !self.expected.contains(&expected) {
            self.expected.push(expected);
        }
    }

    /// Returns the position of the first non-whitespace character at or after `pos`.
    ///
    /// Whitespace is any character up to and including U+0020: controls and the space.
    fn skip_spaces(&self, pos: usize) -> usize {
        let rest = &self.input[pos..];
        pos + (rest.len() - rest.trim_start_matches(|c: char| c <= ' ').len())
    }

    /// Builds a node spanning from its first child to its last.
    fn node(&self, rule: Rule, children: Vec<Rc<Node<'a>>>) -> Rc<Node<'a>> {
        let start = children.first().map_or(0, |c| c.span().start);
        let end = children.last().map_or(start, |c| c.span().end);
        Rc::new(Node::new(rule, self.input, start..end, children))
    }

    /// Matches a literal at exactly `pos`.
    fn literal(&mut self, pos: usize, text: &'static str) -> Match<'a> {
        if self.input[pos..].starts_with(text) {
            let end = pos + text.len();
            Some((Rc::new(Node::leaf(Rule::Terminal, self.input, pos..end)), end))
        } else {
            self.fail(pos, Expected::Literal(text));
            None
        }
    }

    /// Matches a literal after skipping whitespace.
    fn token(&mut self, pos: usize, text: &'static str) -> Match<'a> {
        let pos = self.skip_spaces(pos);
        self.literal(pos, text)
    }

    /// `Exp = LogicalExp`
    fn exp(&mut self, pos: usize) -> Match<'a> {
        let (inner, end) = self.logical_exp(pos)?;
        Some((self.node(Rule::Exp, vec![inner]), end))
    }

    /// `LogicalExp`, memoized by start position.
    fn logical_exp(&mut self, pos: usize) -> Match<'a> {
        let pos = self.skip_spaces(pos);
        if let Some(cached) = self.memo.get(&pos) {
            return cached.clone();
        }
        let result = self.logical_exp_uncached(pos);
        self.memo.insert(pos, result.clone());
        result
    }

    /// Tries the `LogicalExp` alternatives in order.
    ///
    /// Every alternative starts with `PriExp` at the same position, so it is matched once and
    /// shared.
    fn logical_exp_uncached(&mut self, pos: usize) -> Match<'a> {
        let (left, left_end) = self.pri_exp(pos)?;

        for (op, rule) in [("AND", Rule::LogicalExpAnd), ("OR", Rule::LogicalExpOr)] {
            let Some((op, op_end)) = self.token(left_end, op) else {
                continue;
            };
            if let Some((right, end)) = self.logical_exp(op_end) {
                return Some((self.node(rule, vec![left, op, right]), end));
            }
        }

        if let Some((right, end)) = self.logical_exp(left_end) {
            return Some((self.node(Rule::LogicalExpJoin, vec![left, right]), end));
        }

        Some((self.node(Rule::LogicalExp, vec![left]), left_end))
    }

    /// `PriExp = "(" Exp ")" | "\"" Exp "\"" | KeywordExp | ident`
    fn pri_exp(&mut self, pos: usize) -> Match<'a> {
        let pos = self.skip_spaces(pos);

        for (open, close, rule) in [
            ("(", ")", Rule::PriExpParen),
            ("\"", "\"", Rule::PriExpQuote),
        ] {
            if let Some(found) = self.delimited(pos, open, close, rule) {
                return Some(found);
            }
        }

        if let Some((keyword, end)) = self.keyword_exp(pos) {
            return Some((self.node(Rule::PriExp, vec![keyword]), end));
        }

        let (ident, end) = self.ident(pos)?;
        Some((self.node(Rule::PriExp, vec![ident]), end))
    }

    /// `open Exp close`
    fn delimited(
        &mut self,
        pos: usize,
        open: &'static str,
        close: &'static str,
        rule: Rule,
    ) -> Match<'a> {
        let (open, open_end) = self.literal(pos, open)?;
        let (exp, exp_end) = self.exp(open_end)?;
        let (close, end) = self.token(exp_end, close)?;
        Some((self.node(rule, vec![open, exp, close]), end))
    }

    /// `KeywordExp = ident ":\"" spacedString "\"" | ident ":" ident`
    fn keyword_exp(&mut self, pos: usize) -> Match<'a> {
        let (key, key_end) = self.ident(pos)?;

        if let Some(found) = self.keyword_quoted(Rc::clone(&key), key_end) {
            return Some(found);
        }

        let (colon, colon_end) = self.token(key_end, ":")?;
        let value_start = self.skip_spaces(colon_end);
        let (value, end) = self.ident(value_start)?;
        Some((
            self.node(Rule::KeywordExpSimple, vec![key, colon, value]),
            end,
        ))
    }

    /// The `quoted` alternative of `KeywordExp`, after its key.
    fn keyword_quoted(&mut self, key: Rc<Node<'a>>, key_end: usize) -> Match<'a> {
        let (open, open_end) = self.token(key_end, ":\"")?;
        let value_start = self.skip_spaces(open_end);
        let (value, value_end) = self.spaced_string(value_start)?;
        let (close, end) = self.token(value_end, "\"")?;
        Some((
            self.node(Rule::KeywordExpQuoted, vec![key, open, value, close]),
            end,
        ))
    }

    /// `spacedString = spacedString spaces ident | ident`
    ///
    /// Left recursive: the seed is a lone identifier, grown one `spaces ident` at a time for as
    /// long as another identifier follows.
    fn spaced_string(&mut self, pos: usize) -> Match<'a> {
        let (first, mut end) = self.ident(pos)?;
        let mut string = self.node(Rule::SpacedString, vec![first]);

        loop {
            let gap_end = self.skip_spaces(end);
            let Some((ident, ident_end)) = self.ident(gap_end) else {
                break;
            };
            let spaces = Rc::new(Node::leaf(Rule::Spaces, self.input, end..gap_end));
            string = self.node(Rule::SpacedStringSpaced, vec![string, spaces, ident]);
            end = ident_end;
        }

        Some((string, end))
    }

    /// `ident = letter alnum*`, matched at exactly `pos`.
    fn ident(&mut self, pos: usize) -> Match<'a> {
        let rest = &self.input[pos..];
        if !rest.starts_with(char::is_alphabetic) {
            self.fail(pos, Expected::Described(IDENT_DESCRIPTION));
            return None;
        }
        let len = rest
            .find(|c: char| !(c.is_alphabetic() || c.is_ascii_digit()))
            .unwrap_or(rest.len());
        let end = pos + len;
        Some((Rc::new(Node::leaf(Rule::Ident, self.input, pos..end)), end))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    fn match_tree(input: &str) -> Node<'_> {
        Matcher::new(input).match_all().unwrap()
    }

    fn match_err(input: &str) -> SyntaxError {
        Matcher::new(input).match_all().unwrap_err()
    }

    /// Renders the tree as `rule(children...)`, with leaves shown as their text.
    fn shape(node: &Node<'_>) -> String {
        match node.rule() {
            Rule::Ident | Rule::Terminal | Rule::Spaces => format!("{:?}", node.text()),
            rule => {
                let children: Vec<String> = node.children().iter().map(|child| shape(child)).collect();
                format!("{}({})", rule.name(), children.join(" "))
            }
        }
    }

    #[test]
    fn single_ident() {
        assert_eq!(
            shape(&match_tree("hello")),
            r#"Exp(LogicalExp(PriExp("hello")))"#
        );
    }

    #[test]
    fn juxtaposition_joins() {
        assert_eq!(
            shape(&match_tree("hello world")),
            r#"Exp(LogicalExp_join(PriExp("hello") LogicalExp(PriExp("world"))))"#
        );
    }

    #[test]
    fn and_chain_leans_right() {
        assert_eq!(
            shape(&match_tree("a AND b AND c")),
            concat!(
                r#"Exp(LogicalExp_and(PriExp("a") "AND" "#,
                r#"LogicalExp_and(PriExp("b") "AND" LogicalExp(PriExp("c")))))"#
            )
        );
    }

    #[test]
    fn and_tried_before_or() {
        assert_eq!(
            shape(&match_tree("a OR b AND c")),
            concat!(
                r#"Exp(LogicalExp_or(PriExp("a") "OR" "#,
                r#"LogicalExp_and(PriExp("b") "AND" LogicalExp(PriExp("c")))))"#
            )
        );
    }

    #[test]
    fn simple_keyword() {
        assert_eq!(
            shape(&match_tree("type:video")),
            r#"Exp(LogicalExp(PriExp(KeywordExp_simple("type" ":" "video"))))"#
        );
    }

    #[test]
    fn quoted_keyword_grows_spaced_string() {
        assert_eq!(
            shape(&match_tree(r#"title:"a b  c""#)),
            concat!(
                r#"Exp(LogicalExp(PriExp(KeywordExp_quoted("title" ":\"" "#,
                r#"spacedString_spaced(spacedString_spaced(spacedString("a") " " "b") "  " "c") "#,
                r#""\""))))"#
            )
        );
    }

    #[test]
    fn paren_and_quote() {
        assert_eq!(
            shape(&match_tree(r#"( "a" )"#)),
            concat!(
                r#"Exp(LogicalExp(PriExp_paren("(" "#,
                r#"Exp(LogicalExp(PriExp_quote("\"" Exp(LogicalExp(PriExp("a"))) "\""))) ")")))"#
            )
        );
    }

    #[test]
    fn spans_exclude_surrounding_whitespace() {
        let tree = match_tree("  hello   world ");
        assert_eq!(tree.text(), "hello   world");
        assert_eq!(tree.span(), 2..15);
    }

    #[test]
    fn keywords_without_operand_are_idents() {
        assert_eq!(
            shape(&match_tree("x AND")),
            r#"Exp(LogicalExp_join(PriExp("x") LogicalExp(PriExp("AND"))))"#
        );
    }

    #[test]
    fn whitespace_is_space_and_controls() {
        assert_eq!(
            shape(&match_tree("a\tb\u{1}c")),
            concat!(
                r#"Exp(LogicalExp_join(PriExp("a") "#,
                r#"LogicalExp_join(PriExp("b") LogicalExp(PriExp("c")))))"#
            )
        );

        let err = match_err("a\u{a0}b");
        assert_eq!(err.position, 1);
        assert!(err.expected.contains(&Expected::End));
    }

    #[test]
    fn digits_continue_identifiers() {
        assert_eq!(match_tree("abc123").children()[0].text(), "abc123");
        assert!(Matcher::new("123").match_all().is_err());
    }

    #[test]
    fn unicode_letters_are_identifiers() {
        assert_eq!(match_tree("café").text(), "café");
    }

    #[test]
    fn missing_keyword_value() {
        let err = match_err("title:");
        assert_eq!(err.position, 6);
        assert_eq!(err.expected, vec![Expected::Described("an identifier")]);
    }

    #[test]
    fn empty_input() {
        let err = match_err("");
        assert_eq!(err.position, 0);
        assert_eq!(
            err.expected,
            vec![
                Expected::Literal("("),
                Expected::Literal("\""),
                Expected::Described("an identifier"),
            ]
        );
    }

    #[test]
    fn trailing_garbage_expects_end() {
        let err = match_err("hello)");
        assert_eq!(err.position, 5);
        assert!(err.expected.contains(&Expected::End));
        assert!(err.expected.contains(&Expected::Literal("AND")));
    }

    #[test]
    fn unclosed_paren() {
        let err = match_err("(hello world");
        assert_eq!(err.position, 12);
        assert!(err.expected.contains(&Expected::Literal(")")));
    }

    #[test]
    fn failed_operand_chain_stays_linear() {
        let input = format!("{} )", ["a AND"; 64].join(" "));
        assert!(Matcher::new(&input).match_all().is_err());
    }

    #[test]
    fn long_word_list_matches_quickly() {
        let input = ["word"; 1000].join(" ");
        let start = Instant::now();
        let tree = Matcher::new(&input).match_all().unwrap();
        let elapsed = start.elapsed();

        assert_eq!(tree.span(), 0..input.len());
        assert!(
            elapsed.as_secs() < 1,
            "Matching 1,000 words took {elapsed:?}, expected < 1s"
        );
    }
}
