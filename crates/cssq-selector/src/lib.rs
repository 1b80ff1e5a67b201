//! Tree-agnostic CSS selector engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** ([CSS Syntax § 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - The token subset a selector can contain: ident, function, at-keyword, hash,
//!     string, number, dimension, delim, and punctuation
//!   - Comment handling
//!   - Single-code-point escape sequences
//!
//! - **Selector parser** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Selector lists, complex selectors with the four combinators, compound selectors
//!   - Type, universal, id, class, attribute (with namespace prefixes and `i`/`s` flags)
//!   - Pseudo-classes and pseudo-elements, with functional arguments re-parsed
//!     through an extensible microsyntax table
//!
//! - **Serializer** back to selector text, for caching and round-tripping
//!
//! - **Matcher** generic over an [`Adapter`], with `matches`, `query_selector`,
//!   `query_selector_all`, `closest` and `children`
//!
//! - **Adapters** for the arena [`DomTree`](cssq_dom::DomTree) and for JSON
//!   document trees ([`ObjectTree`])
//!
//! # Not Yet Implemented
//!
//! - Hex escape decoding (`\41` is read as `4` followed by `1`)
//! - `An+B` evaluation: `:nth-child()` takes a single 0-based integer
//! - Relative selectors (`:has(> img)`)
//! - `:hover`, `:focus`, `:scope`, `:nth-of-type()`, `:nth-last-*()` and other
//!   dynamic pseudo-classes, which fail with [`UnsupportedFeature`]
//! - Specificity
//!
//! # Example
//!
//! ```
//! use cssq_dom::{DomTree, ElementData, NodeId};
//! use cssq_selector::{parse, query_selector_all};
//!
//! let mut tree = DomTree::new();
//! let ul = tree.append_element(NodeId::ROOT, ElementData::new("ul"));
//! let first = tree.append_element(ul, ElementData::new("li"));
//! let second = tree.append_element(ul, ElementData::new("li").with_attr("class", "active"));
//!
//! let selector = parse("ul > li:first-child, ul > li.active").unwrap();
//! let found = query_selector_all(&tree, NodeId::ROOT, &selector).unwrap();
//! assert_eq!(found, [first, second]);
//! ```

/// Tree capability interface and the bundled adapters.
pub mod adapter;
/// Error types.
pub mod error;
/// AST evaluation against adapter nodes.
pub mod matcher;
/// Query entry points.
pub mod query;
/// Selector AST, parser, and serializer.
pub mod selector;
/// Selector tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;

pub use adapter::{Adapter, ObjectNode, ObjectTree};
pub use error::{Error, Result, SyntaxError, UnsupportedFeature};
pub use matcher::PseudoClassKind;
pub use query::{Engine, SelectorInput, children, closest, matches, query_selector, query_selector_all};
pub use selector::microsyntax::{CustomSyntax, Microsyntaxes, ParseOptions, Syntax};
pub use selector::parser::{SelectorParser, parse, parse_tokens, parse_with_options};
pub use selector::serialize::{
    SerializeExtension, serialize, serialize_list, serialize_tokens, serialize_with,
};
pub use selector::{
    AttributeMatcher, AttributeModifier, AttributeSelector, ClassSelector, Combinator,
    ComplexSelector, CompoundSelector, ExtensionNode, ExtensionRef, IdSelector, PseudoArgument,
    PseudoSelector, Selector, SelectorList, TypeSelector,
};
pub use tokenizer::{CSSTokenizer, HashType, Numeric, NumericType, Token, tokenize};
