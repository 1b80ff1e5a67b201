//! Error types for tokenizing, parsing, matching, and serializing selectors.
//!
//! Every failure is local to one call: a parsed [`SelectorList`](crate::SelectorList)
//! stays valid for reuse even after a later call on different input fails.

/// Malformed selector text, raised by the tokenizer or the parser.
///
/// # Example
/// ```text
/// [href="https://
///       ^ unterminated string
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    /// A quoted string ran into the end of input.
    #[error("unexpected end of input, unterminated string \"{0}\"")]
    UnterminatedString(String),

    /// A quoted string contained a raw newline.
    #[error("unexpected newline character inside string")]
    NewlineInString,

    /// `/*` without a closing `*/`.
    #[error("unexpected end of input, unterminated comment")]
    UnterminatedComment,

    /// A backslash was the last code point of the input.
    #[error("unexpected end of input, unterminated escape sequence")]
    UnterminatedEscape,

    /// A backslash followed by a newline outside of a string.
    #[error("invalid escape")]
    InvalidEscape,

    /// `[` was not followed by an attribute name.
    #[error("invalid attribute name")]
    InvalidAttributeName,

    /// An attribute matcher was not followed by a string or identifier.
    #[error("expected attribute value")]
    ExpectedAttributeValue,

    /// An attribute selector was followed by something other than `]`.
    #[error("unclosed attribute selector")]
    UnclosedAttributeSelector,

    /// A namespace prefix `ns|` was not followed by a name.
    #[error("expected a name after namespace prefix `{0}|`")]
    ExpectedNameAfterNamespace(String),

    /// The token stream ended inside a functional pseudo-class argument.
    #[error("parentheses mismatch")]
    ParenthesesMismatch,

    /// A token that cannot continue the selector list.
    #[error("unexpected token {0}")]
    UnexpectedToken(String),

    /// An explicit combinator with nothing after it.
    #[error("expected selector after combinator `{0}`")]
    ExpectedSelectorAfterCombinator(char),
}

/// Selector grammar that parses fine but cannot be evaluated against a node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedFeature {
    /// A recognized-but-unimplemented or unknown pseudo-class.
    #[error("pseudo-class :{0} not implemented yet")]
    PseudoClass(String),

    /// Pseudo-elements never match a tree node.
    #[error("pseudo-elements are not supported (::{0})")]
    PseudoElement(String),

    /// A complex selector without a left-hand side, e.g. the `> img` in `:has(> img)`.
    #[error("relative selectors are not implemented yet")]
    RelativeSelector,

    /// An attribute matcher outside `= ~= |= ^= $= *=`.
    #[error("unsupported attribute matcher {0}=")]
    AttributeMatcher(char),
}

/// Any failure surfaced by the public API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// See [`SyntaxError`].
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// See [`UnsupportedFeature`].
    #[error(transparent)]
    Unsupported(#[from] UnsupportedFeature),

    /// A functional pseudo-class received an argument of the wrong resolved kind,
    /// e.g. `:nth-child(odd)` or a custom syntax registered for `:is`.
    #[error("expected a {expected} argument for :{pseudo}")]
    ArgumentShape {
        /// The pseudo-class name, without the colon.
        pseudo: String,
        /// Human-readable description of the accepted argument.
        expected: &'static str,
    },

    /// The serializer met a custom node it has no rendering for.
    #[error("unknown node type {0}")]
    UnknownNodeType(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
