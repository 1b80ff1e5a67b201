//! Selector AST, parser, and serializer
//!
//! This module implements the selector grammar of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) over the token
//! stream produced by [`crate::tokenizer`].
//!
//! The AST is a sum type with one variant per node kind. It is produced once
//! by the parser and never mutated afterwards, so a parsed [`SelectorList`]
//! can be cached and matched any number of times.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::tokenizer::Token;

/// Microsyntax table for functional pseudo-class arguments.
pub mod microsyntax;
/// Recursive-descent selector parser.
pub mod parser;
/// AST and token serialization back to selector text.
pub mod serialize;

/// Any node of the selector AST.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Selector {
    /// A comma-separated list, see [`SelectorList`].
    #[serde(rename = "SelectorList")]
    List(SelectorList),
    /// See [`ComplexSelector`].
    #[serde(rename = "ComplexSelector")]
    Complex(ComplexSelector),
    /// See [`CompoundSelector`].
    #[serde(rename = "CompoundSelector")]
    Compound(CompoundSelector),
    /// See [`TypeSelector`].
    #[serde(rename = "TypeSelector")]
    Type(TypeSelector),
    /// See [`IdSelector`].
    #[serde(rename = "IdSelector")]
    Id(IdSelector),
    /// See [`ClassSelector`].
    #[serde(rename = "ClassSelector")]
    Class(ClassSelector),
    /// See [`AttributeSelector`].
    #[serde(rename = "AttributeSelector")]
    Attribute(AttributeSelector),
    /// A pseudo-class, written with a single colon.
    #[serde(rename = "PseudoClassSelector")]
    PseudoClass(PseudoSelector),
    /// A pseudo-element, written with a double colon. Never matches a node.
    #[serde(rename = "PseudoElementSelector")]
    PseudoElement(PseudoSelector),
}

/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// "A comma-separated list of selectors represents the union of all elements
/// selected by each of the individual selectors in the list."
///
/// Each member is a complex selector, or the compound or simple selector it
/// collapsed to when no combinator was present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectorList {
    /// The alternatives, in source order.
    pub selectors: Vec<Selector>,
}

impl SelectorList {
    /// Returns true if the list has no members (the parse of empty input).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Number of alternatives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a chain of one or more compound selectors separated
/// by combinators."
///
/// The chain is folded left to right while parsing, so `A > B C` becomes
/// `((A > B) C)`. Matching walks it right to left, starting from `right`.
///
/// Example: `div.container > ul.nav li`
/// ```text
/// Complex {
///     left: Complex { left: [div.container], Child, right: [ul.nav] },
///     combinator: Descendant,
///     right: [li],
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexSelector {
    /// Everything to the left of the last combinator. `None` only for a
    /// relative selector such as the `> img` in `:has(> img)`.
    pub left: Option<Box<Selector>>,
    /// The relationship between `left` and `right`.
    pub combinator: Combinator,
    /// The subject: a compound or simple selector.
    pub right: Box<Selector>,
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
///
/// Always holds at least two members: a single simple selector is never wrapped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundSelector {
    /// The simple selectors, in source order.
    pub selectors: Vec<Selector>,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A descendant combinator is whitespace that separates two compound selectors."
    #[serde(rename = " ")]
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A child combinator is a greater-than sign (>) that separates two compound
    /// selectors."
    #[serde(rename = ">")]
    Child,

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A next-sibling combinator is a plus sign (+) that separates two compound
    /// selectors."
    #[serde(rename = "+")]
    NextSibling,

    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A subsequent-sibling combinator is a tilde (~) that separates two compound
    /// selectors."
    #[serde(rename = "~")]
    SubsequentSibling,
}

impl Combinator {
    /// The character this combinator is written with.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Descendant => ' ',
            Self::Child => '>',
            Self::NextSibling => '+',
            Self::SubsequentSibling => '~',
        }
    }

    /// The combinator written as `c`, whitespace excluded.
    #[must_use]
    pub const fn from_delim(c: char) -> Option<Self> {
        match c {
            '>' => Some(Self::Child),
            '+' => Some(Self::NextSibling),
            '~' => Some(Self::SubsequentSibling),
            _ => None,
        }
    }
}

/// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
/// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
///
/// Examples: `div`, `*`, `svg|rect`, `*|a`, `|p`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSelector {
    /// The element name, or `*` for the universal selector.
    pub identifier: String,
    /// The namespace prefix. `Some("*")` is any namespace, `Some("")` is no namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl TypeSelector {
    /// Returns true for `*`.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.identifier == "*"
    }
}

/// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
///
/// Example: `#main`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdSelector {
    /// The id, without the `#`.
    pub identifier: String,
}

/// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
///
/// Example: `.active`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSelector {
    /// The class name, without the `.`.
    pub identifier: String,
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// Examples: `[href]`, `[type="text"]`, `[lang|=en]`, `[data-x^="a" s]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSelector {
    /// The attribute name.
    pub identifier: String,
    /// Optional namespace prefix, as for [`TypeSelector::namespace`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// `None` means a presence test.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matcher: Option<AttributeMatcher>,
    /// The value to compare against; present whenever `matcher` is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<AttributeModifier>,
}

/// [§ 6.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-4/#attribute-representation)
/// [§ 6.2 Substring matching attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-substrings)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeMatcher {
    /// `[att=val]` "whose value is exactly 'val'"
    Equals,
    /// `[att~=val]` "a whitespace-separated list of words, one of which is exactly 'val'"
    Includes,
    /// `[att|=val]` "either being exactly 'val' or beginning with 'val' immediately followed by '-'"
    DashMatch,
    /// `[att^=val]` "begins with the prefix 'val'"
    Prefix,
    /// `[att$=val]` "ends with the suffix 'val'"
    Suffix,
    /// `[att*=val]` "contains at least one instance of the substring 'val'"
    Substring,
    /// Any other `<delim>=` pair. Parses, but fails to match.
    Other(char),
}

impl AttributeMatcher {
    /// The matcher for `c` followed by `=`, or bare `=` when `c` is `None`.
    #[must_use]
    pub const fn from_prefix(c: Option<char>) -> Self {
        match c {
            None => Self::Equals,
            Some('~') => Self::Includes,
            Some('|') => Self::DashMatch,
            Some('^') => Self::Prefix,
            Some('$') => Self::Suffix,
            Some('*') => Self::Substring,
            Some(other) => Self::Other(other),
        }
    }

    /// The character written before `=`, if any.
    #[must_use]
    pub const fn prefix(self) -> Option<char> {
        match self {
            Self::Equals => None,
            Self::Includes => Some('~'),
            Self::DashMatch => Some('|'),
            Self::Prefix => Some('^'),
            Self::Suffix => Some('$'),
            Self::Substring => Some('*'),
            Self::Other(c) => Some(c),
        }
    }
}

impl fmt::Display for AttributeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(c) = self.prefix() {
            write!(f, "{c}")?;
        }
        f.write_str("=")
    }
}

impl Serialize for AttributeMatcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The `i` / `s` flag at the end of an attribute selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttributeModifier {
    /// `i`: compare ASCII case-insensitively. Also the default with no flag.
    #[serde(rename = "i")]
    CaseInsensitive,
    /// `s`: compare exactly.
    #[serde(rename = "s")]
    CaseSensitive,
}

impl AttributeModifier {
    /// The flag letter.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::CaseInsensitive => 'i',
            Self::CaseSensitive => 's',
        }
    }
}

/// A pseudo-class or pseudo-element, e.g. `:first-child`, `:not(.a)`, `::before`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PseudoSelector {
    /// The name, without colons or parenthesis.
    pub identifier: String,
    /// Present only for the functional form `name(...)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument: Option<PseudoArgument>,
}

/// The argument of a functional pseudo-class, shaped by its
/// [`Syntax`](microsyntax::Syntax).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PseudoArgument {
    /// Raw tokens, for names without a registered syntax.
    Tokens(Vec<Token>),
    /// A re-parsed selector list, e.g. for `:is()` and `:not()`.
    SelectorList(SelectorList),
    /// An `An+B` argument. Kept as tokens; only a single integer is ever evaluated.
    AnPlusB(Vec<Token>),
    /// The result of a caller-supplied syntax.
    Custom(#[serde(serialize_with = "serialize_extension")] ExtensionRef),
}

/// Shared handle to a caller-defined argument node.
pub type ExtensionRef = Arc<dyn ExtensionNode>;

/// A node produced by a custom microsyntax.
///
/// The engine never looks inside one: matching falls back to the pseudo-class's
/// own rules and serialization goes through a
/// [`SerializeExtension`](serialize::SerializeExtension).
pub trait ExtensionNode: fmt::Debug + Send + Sync {
    /// The node's type name, reported by [`Error::UnknownNodeType`](crate::Error::UnknownNodeType).
    fn node_type(&self) -> &str;

    /// Downcasting hook for serializer extensions.
    fn as_any(&self) -> &dyn Any;

    /// JSON form used by the AST's `serde` output and for equality.
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "type": self.node_type() })
    }
}

impl PartialEq for dyn ExtensionNode {
    fn eq(&self, other: &Self) -> bool {
        self.node_type() == other.node_type() && self.to_json() == other.to_json()
    }
}

fn serialize_extension<S: Serializer>(node: &ExtensionRef, serializer: S) -> Result<S::Ok, S::Error> {
    node.to_json().serialize(serializer)
}

impl From<SelectorList> for Selector {
    fn from(list: SelectorList) -> Self {
        Self::List(list)
    }
}

impl Selector {
    /// Node type name, as used in the JSON output.
    #[must_use]
    pub const fn node_type(&self) -> &'static str {
        match self {
            Self::List(_) => "SelectorList",
            Self::Complex(_) => "ComplexSelector",
            Self::Compound(_) => "CompoundSelector",
            Self::Type(_) => "TypeSelector",
            Self::Id(_) => "IdSelector",
            Self::Class(_) => "ClassSelector",
            Self::Attribute(_) => "AttributeSelector",
            Self::PseudoClass(_) => "PseudoClassSelector",
            Self::PseudoElement(_) => "PseudoElementSelector",
        }
    }

    /// Visit this node and every node below it, breadth first.
    ///
    /// Selector-list arguments of functional pseudo-classes are descended into
    /// member by member; token and custom arguments are leaves.
    pub fn walk<'a>(&'a self, mut visitor: impl FnMut(&'a Self)) {
        let mut queue = VecDeque::from([self]);
        while let Some(node) = queue.pop_front() {
            visitor(node);
            match node {
                Self::List(SelectorList { selectors })
                | Self::Compound(CompoundSelector { selectors }) => queue.extend(selectors),
                Self::Complex(complex) => {
                    if let Some(left) = &complex.left {
                        queue.push_back(left);
                    }
                    queue.push_back(&complex.right);
                }
                Self::PseudoClass(pseudo) | Self::PseudoElement(pseudo) => {
                    if let Some(PseudoArgument::SelectorList(list)) = &pseudo.argument {
                        queue.extend(&list.selectors);
                    }
                }
                Self::Type(_) | Self::Id(_) | Self::Class(_) | Self::Attribute(_) => {}
            }
        }
    }
}
