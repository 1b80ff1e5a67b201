//! Argument grammars for functional pseudo-classes and pseudo-elements.
//!
//! The parser collects the raw tokens between a function token and its
//! closing parenthesis, then looks up `":name"` (or `"::name"`) here to decide
//! what to turn them into.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::parser::parse_tokens;
use super::PseudoArgument;
use crate::error::{Result, SyntaxError};
use crate::tokenizer::Token;

/// Signature of a caller-supplied argument grammar.
pub type CustomSyntaxFn = dyn Fn(&[Token]) -> std::result::Result<PseudoArgument, SyntaxError> + Send + Sync;

/// A caller-supplied argument grammar.
#[derive(Clone)]
pub struct CustomSyntax(Arc<CustomSyntaxFn>);

impl CustomSyntax {
    /// Wrap a function as a syntax.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Token]) -> std::result::Result<PseudoArgument, SyntaxError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for CustomSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomSyntax(..)")
    }
}

/// How the argument of a functional pseudo-class is interpreted.
#[derive(Debug, Clone)]
pub enum Syntax {
    /// Keep the raw tokens.
    None,
    /// Re-parse the tokens as a full selector list.
    SelectorList,
    /// [CSS Syntax § 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
    AnPlusB,
    /// Hand the tokens to a caller-supplied function.
    Custom(CustomSyntax),
}

impl Syntax {
    /// Build a [`Syntax::Custom`] from a function.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[Token]) -> std::result::Result<PseudoArgument, SyntaxError> + Send + Sync + 'static,
    {
        Self::Custom(CustomSyntax::new(f))
    }

    /// Turn the raw argument tokens into an argument of this shape.
    ///
    /// # Errors
    ///
    /// Propagates parse errors from a nested selector list or a custom syntax.
    pub fn apply(&self, tokens: &[Token], options: &ParseOptions) -> Result<PseudoArgument> {
        match self {
            Self::None => Ok(PseudoArgument::Tokens(tokens.to_vec())),
            Self::SelectorList => parse_tokens(tokens, options).map(PseudoArgument::SelectorList),
            // NOTE: An+B is not evaluated. `:nth-child` only understands a
            // single integer, see the matcher.
            Self::AnPlusB => Ok(PseudoArgument::AnPlusB(tokens.to_vec())),
            Self::Custom(CustomSyntax(f)) => (**f)(tokens).map_err(Into::into),
        }
    }
}

/// Built-in names whose argument is a selector list.
const SELECTOR_LIST_KEYS: &[&str] = &[
    ":is",
    ":matches",
    ":-moz-any",
    ":-webkit-any",
    ":where",
    ":not",
    ":has",
];

/// Built-in names whose argument is `An+B`.
const AN_PLUS_B_KEYS: &[&str] = &[
    ":nth-child",
    ":nth-child-of",
    ":nth-last-child",
    ":nth-of-type",
    ":nth-last-of-type",
    ":nth-col",
    ":nth-last-col",
];

/// Mapping from `":name"` / `"::name"` to the argument [`Syntax`].
///
/// [`Default`] holds the built-in table. Entries inserted later replace
/// built-ins with the same key.
#[derive(Debug, Clone)]
pub struct Microsyntaxes {
    entries: HashMap<String, Syntax>,
}

impl Default for Microsyntaxes {
    fn default() -> Self {
        Self {
            entries: SELECTOR_LIST_KEYS
                .iter()
                .map(|key| ((*key).to_string(), Syntax::SelectorList))
                .chain(
                    AN_PLUS_B_KEYS
                        .iter()
                        .map(|key| ((*key).to_string(), Syntax::AnPlusB)),
                )
                .collect(),
        }
    }
}

impl Microsyntaxes {
    /// A table with no entries at all: every argument stays raw tokens.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register `syntax` under `key` (including its leading colon or colons),
    /// returning the entry it replaced. Keys are ASCII case-insensitive.
    pub fn insert(&mut self, key: impl Into<String>, syntax: Syntax) -> Option<Syntax> {
        let mut key = key.into();
        key.make_ascii_lowercase();
        self.entries.insert(key, syntax)
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, syntax: Syntax) -> Self {
        let _ = self.insert(key, syntax);
        self
    }

    /// Look up the syntax for a key such as `":not"`, ignoring ASCII case.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Syntax> {
        self.entries.get(&key.to_ascii_lowercase())
    }
}

/// Options threaded through a parse, including every nested argument parse.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Argument grammars for functional pseudo-classes.
    pub syntaxes: Microsyntaxes,
}

impl ParseOptions {
    /// Default options plus one extra (or overriding) syntax entry.
    #[must_use]
    pub fn with_syntax(mut self, key: impl Into<String>, syntax: Syntax) -> Self {
        let _ = self.syntaxes.insert(key, syntax);
        self
    }
}
