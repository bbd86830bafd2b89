//! The query grammar.
//!
//! The grammar is an ordered-choice rule set: each rule's alternatives are tried in order and
//! the first one that matches wins.
//!
//! ```text
//! Exp          = LogicalExp
//! LogicalExp   = PriExp "AND" LogicalExp      -- and
//!              | PriExp "OR"  LogicalExp      -- or
//!              | PriExp LogicalExp            -- join
//!              | PriExp
//! PriExp       = "(" Exp ")"                  -- paren
//!              | "\"" Exp "\""                -- quote
//!              | KeywordExp
//!              | ident
//! KeywordExp   = ident ":\"" spacedString "\"" -- quoted
//!              | ident ":" ident              -- simple
//! spacedString = spacedString spaces ident    -- spaced
//!              | ident
//! ident        = letter alnum*
//! ```
//!
//! # Precedence
//!
//! Precedence is encoded by alternative order and right recursion alone: `AND` is tried before
//! `OR`, which is tried before juxtaposition. Every binary form recurses into `LogicalExp` on
//! its right, so `a OR b AND c` groups as `a OR (b AND c)` and chains lean right.
//!
//! # Whitespace
//!
//! Rules whose names start with an upper-case letter are syntactic and skip whitespace before
//! every item. `spacedString` and `ident` are lexical and skip nothing.

use std::fmt;

use crate::{error::QueryError, matcher::Matcher, node::Node};

/// Source text of the query grammar.
pub const GRAMMAR_SOURCE: &str = r#"Query {
  Exp
    = LogicalExp

  LogicalExp
    = PriExp "AND" LogicalExp -- and
    | PriExp "OR" LogicalExp -- or
    | PriExp LogicalExp -- join
    | PriExp

  PriExp
    = "(" Exp ")" -- paren
    | "\"" Exp "\"" -- quote
    | KeywordExp
    | ident

  KeywordExp
    = ident ":\"" spacedString "\"" -- quoted
    | ident ":" ident -- simple

  spacedString
    = spacedString spaces ident -- spaced
    | ident

  ident (an identifier)
    = letter alnum*
}"#;

/// A rule application or rule alternative that produced a parse tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// `Exp`: the start rule.
    Exp,
    /// `LogicalExp_and`: `PriExp "AND" LogicalExp`.
    LogicalExpAnd,
    /// `LogicalExp_or`: `PriExp "OR" LogicalExp`.
    LogicalExpOr,
    /// `LogicalExp_join`: `PriExp LogicalExp`, implicit conjunction.
    LogicalExpJoin,
    /// `LogicalExp`: a lone `PriExp`.
    LogicalExp,
    /// `PriExp_paren`: `"(" Exp ")"`.
    PriExpParen,
    /// `PriExp_quote`: `"\"" Exp "\""`.
    PriExpQuote,
    /// `PriExp`: a `KeywordExp` or an `ident`.
    PriExp,
    /// `KeywordExp_quoted`: `ident ":\"" spacedString "\""`.
    KeywordExpQuoted,
    /// `KeywordExp_simple`: `ident ":" ident`.
    KeywordExpSimple,
    /// `spacedString_spaced`: `spacedString spaces ident`.
    SpacedStringSpaced,
    /// `spacedString`: a lone `ident`.
    SpacedString,
    /// `ident`: a letter followed by letters or digits.
    Ident,
    /// A run of whitespace inside a quoted keyword value.
    Spaces,
    /// A literal token such as `AND` or `(`.
    Terminal,
}

impl Rule {
    /// Every rule, in grammar order.
    pub const ALL: [Self; 15] = [
        Self::Exp,
        Self::LogicalExpAnd,
        Self::LogicalExpOr,
        Self::LogicalExpJoin,
        Self::LogicalExp,
        Self::PriExpParen,
        Self::PriExpQuote,
        Self::PriExp,
        Self::KeywordExpQuoted,
        Self::KeywordExpSimple,
        Self::SpacedStringSpaced,
        Self::SpacedString,
        Self::Ident,
        Self::Spaces,
        Self::Terminal,
    ];

    /// The name used for this rule in the grammar and in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Exp => "Exp",
            Self::LogicalExpAnd => "LogicalExp_and",
            Self::LogicalExpOr => "LogicalExp_or",
            Self::LogicalExpJoin => "LogicalExp_join",
            Self::LogicalExp => "LogicalExp",
            Self::PriExpParen => "PriExp_paren",
            Self::PriExpQuote => "PriExp_quote",
            Self::PriExp => "PriExp",
            Self::KeywordExpQuoted => "KeywordExp_quoted",
            Self::KeywordExpSimple => "KeywordExp_simple",
            Self::SpacedStringSpaced => "spacedString_spaced",
            Self::SpacedString => "spacedString",
            Self::Ident => "ident",
            Self::Spaces => "spaces",
            Self::Terminal => "_terminal",
        }
    }

    /// Number of children a node of this rule has.
    pub fn arity(self) -> usize {
        match self {
            Self::KeywordExpQuoted => 4,
            Self::LogicalExpAnd
            | Self::LogicalExpOr
            | Self::PriExpParen
            | Self::PriExpQuote
            | Self::KeywordExpSimple
            | Self::SpacedStringSpaced => 3,
            Self::LogicalExpJoin => 2,
            Self::Exp | Self::LogicalExp | Self::PriExp | Self::SpacedString => 1,
            Self::Ident | Self::Spaces | Self::Terminal => 0,
        }
    }

    /// Whether the rule skips whitespace before each of its items.
    pub fn is_syntactic(self) -> bool {
        self.name().starts_with(|c: char| c.is_ascii_uppercase())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shared handle to the query grammar.
///
/// The productions themselves are hand-written in the matcher; this handle only carries the
/// grammar's source text and is the one immutable instance ([`Grammar::shared`]) that every
/// evaluator matches through.
#[derive(Debug)]
pub struct Grammar {
    /// Source text the grammar was built from.
    source: &'static str,
}

/// The process-wide grammar instance.
static GRAMMAR: Grammar = Grammar {
    source: GRAMMAR_SOURCE,
};

impl Grammar {
    /// Returns the shared grammar.
    pub fn shared() -> &'static Self {
        &GRAMMAR
    }

    /// Returns the grammar source text.
    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Matches `input` in full against the start rule `Exp`.
    ///
    /// Returns the parse tree on success, or a syntax error describing the rightmost failure.
    pub fn match_query<'a>(&self, input: &'a str) -> Result<Node<'a>, QueryError> {
        Matcher::new(input).match_all().map_err(QueryError::from)
    }
}

#[cfg(test)]
mod tests {
    use std::ptr;

    use super::*;

    #[test]
    fn rule_names_appear_in_grammar_source() {
        for rule in Rule::ALL {
            let name = rule.name();
            let label = name.rsplit('_').next().unwrap_or(name);
            match rule {
                Rule::Terminal | Rule::Spaces => {}
                _ => assert!(
                    GRAMMAR_SOURCE.contains(label),
                    "{name} missing from grammar source"
                ),
            }
        }
    }

    #[test]
    fn syntactic_rules_are_capitalized() {
        assert!(Rule::LogicalExpJoin.is_syntactic());
        assert!(Rule::KeywordExpQuoted.is_syntactic());
        assert!(!Rule::SpacedStringSpaced.is_syntactic());
        assert!(!Rule::Ident.is_syntactic());
    }

    #[test]
    fn arity_matches_alternatives() {
        assert_eq!(Rule::LogicalExpAnd.arity(), 3);
        assert_eq!(Rule::LogicalExpJoin.arity(), 2);
        assert_eq!(Rule::KeywordExpQuoted.arity(), 4);
        assert_eq!(Rule::Ident.arity(), 0);
    }

    #[test]
    fn shared_grammar_is_static() {
        assert!(ptr::eq(Grammar::shared(), Grammar::shared()));
        assert_eq!(Grammar::shared().source(), GRAMMAR_SOURCE);
    }
}
