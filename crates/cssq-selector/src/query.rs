//! Public query surface: `matches`, `query_selector`, `query_selector_all`,
//! `closest` and `children`.
//!
//! Each call normalizes its selector argument once (parsing text or tokens),
//! checks that it can be evaluated, then drives the adapter.

use std::borrow::Cow;

use crate::adapter::Adapter;
use crate::error::{Result, UnsupportedFeature};
use crate::matcher::{Matcher, Subject};
use crate::selector::microsyntax::ParseOptions;
use crate::selector::parser::{parse_tokens, parse_with_options};
use crate::selector::{Selector, SelectorList};
use crate::tokenizer::Token;

/// A selector argument in any of the accepted forms.
///
/// Text and tokens are parsed on every call; callers running the same query
/// repeatedly should parse once and pass the [`SelectorList`].
#[derive(Debug, Clone, Copy)]
pub enum SelectorInput<'s> {
    /// Selector text.
    Text(&'s str),
    /// Already-tokenized selector text.
    Tokens(&'s [Token]),
    /// A parsed list.
    List(&'s SelectorList),
    /// Any single AST node.
    Node(&'s Selector),
    /// No selector at all, e.g. a failed optional parse. Never matches.
    Absent,
}

impl<'s> From<&'s str> for SelectorInput<'s> {
    fn from(text: &'s str) -> Self {
        Self::Text(text)
    }
}

impl<'s> From<&'s String> for SelectorInput<'s> {
    fn from(text: &'s String) -> Self {
        Self::Text(text)
    }
}

impl<'s> From<&'s [Token]> for SelectorInput<'s> {
    fn from(tokens: &'s [Token]) -> Self {
        Self::Tokens(tokens)
    }
}

impl<'s> From<&'s Vec<Token>> for SelectorInput<'s> {
    fn from(tokens: &'s Vec<Token>) -> Self {
        Self::Tokens(tokens)
    }
}

impl<'s> From<&'s SelectorList> for SelectorInput<'s> {
    fn from(list: &'s SelectorList) -> Self {
        Self::List(list)
    }
}

impl<'s> From<&'s Selector> for SelectorInput<'s> {
    fn from(selector: &'s Selector) -> Self {
        Self::Node(selector)
    }
}

impl<'s> From<Option<&'s SelectorList>> for SelectorInput<'s> {
    fn from(list: Option<&'s SelectorList>) -> Self {
        list.map_or(Self::Absent, Self::List)
    }
}

/// A selector argument after parsing.
enum Resolved<'s> {
    List(Cow<'s, SelectorList>),
    Node(&'s Selector),
    Absent,
}

impl Resolved<'_> {
    fn subject(&self) -> Option<Subject<'_>> {
        match self {
            Self::List(list) => Some(Subject::List(&**list)),
            Self::Node(selector) => Some(Subject::Node(selector)),
            Self::Absent => None,
        }
    }
}

/// Relative selectors are rejected before any node is looked at, so the
/// error does not depend on which nodes happen to be visited.
fn check_supported(selector: &Selector) -> Result<()> {
    let mut relative = false;
    selector.walk(|node| {
        if let Selector::Complex(complex) = node {
            relative |= complex.left.is_none();
        }
    });
    if relative {
        return Err(UnsupportedFeature::RelativeSelector.into());
    }
    Ok(())
}

/// A selector engine bound to one adapter and one set of parse options.
///
/// ```
/// use cssq_dom::{DomTree, ElementData, NodeId};
/// use cssq_selector::Engine;
///
/// let mut tree = DomTree::new();
/// let ul = tree.append_element(NodeId::ROOT, ElementData::new("ul"));
/// let li = tree.append_element(ul, ElementData::new("li"));
///
/// let engine = Engine::new(&tree);
/// assert_eq!(engine.query_selector(NodeId::ROOT, "ul > li").unwrap(), Some(li));
/// ```
#[derive(Debug)]
pub struct Engine<'a, A: Adapter> {
    adapter: &'a A,
    options: ParseOptions,
}

impl<'a, A: Adapter> Engine<'a, A> {
    /// Bind `adapter` with the built-in microsyntax table.
    #[must_use]
    pub fn new(adapter: &'a A) -> Self {
        Self::with_options(adapter, ParseOptions::default())
    }

    /// Bind `adapter` with custom parse options.
    #[must_use]
    pub const fn with_options(adapter: &'a A, options: ParseOptions) -> Self {
        Self { adapter, options }
    }

    /// The bound adapter.
    #[must_use]
    pub const fn adapter(&self) -> &'a A {
        self.adapter
    }

    /// The options used for text and token selectors.
    #[must_use]
    pub const fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse `input` with this engine's options, for reuse across queries.
    ///
    /// # Errors
    ///
    /// See [`parse_with_options`].
    pub fn parse(&self, input: &str) -> Result<SelectorList> {
        parse_with_options(input, &self.options)
    }

    fn resolve<'s>(&self, input: SelectorInput<'s>) -> Result<Resolved<'s>> {
        let resolved = match input {
            SelectorInput::Text(text) => Resolved::List(Cow::Owned(self.parse(text)?)),
            SelectorInput::Tokens(tokens) => {
                Resolved::List(Cow::Owned(parse_tokens(tokens, &self.options)?))
            }
            SelectorInput::List(list) => Resolved::List(Cow::Borrowed(list)),
            SelectorInput::Node(selector) => Resolved::Node(selector),
            SelectorInput::Absent => Resolved::Absent,
        };
        match &resolved {
            Resolved::List(list) => list.selectors.iter().try_for_each(check_supported)?,
            Resolved::Node(selector) => check_supported(selector)?,
            Resolved::Absent => {}
        }
        Ok(resolved)
    }

    /// [`Element.matches()`](https://dom.spec.whatwg.org/#dom-element-matches)
    ///
    /// Returns true if `node` matches `selector`. An absent selector never
    /// matches; non-element nodes never match.
    ///
    /// # Errors
    ///
    /// Syntax errors from parsing, [`UnsupportedFeature`] for pseudo-elements,
    /// relative selectors and unimplemented pseudo-classes, and
    /// [`ArgumentShape`](crate::Error::ArgumentShape) for malformed arguments.
    pub fn matches<'s>(&self, node: A::Node, selector: impl Into<SelectorInput<'s>>) -> Result<bool> {
        let resolved = self.resolve(selector.into())?;
        match resolved.subject() {
            Some(subject) => Matcher::new(self.adapter).matches_subject(node, subject),
            None => Ok(false),
        }
    }

    /// [`querySelector()`](https://dom.spec.whatwg.org/#dom-parentnode-queryselector)
    ///
    /// The first node below `root` (never `root` itself), in pre-order, that
    /// matches `selector`.
    ///
    /// # Errors
    ///
    /// See [`matches`](Self::matches).
    pub fn query_selector<'s>(
        &self,
        root: A::Node,
        selector: impl Into<SelectorInput<'s>>,
    ) -> Result<Option<A::Node>> {
        let resolved = self.resolve(selector.into())?;
        match resolved.subject() {
            Some(subject) => Matcher::new(self.adapter).find_first(root, subject),
            None => Ok(None),
        }
    }

    /// [`querySelectorAll()`](https://dom.spec.whatwg.org/#dom-parentnode-queryselectorall)
    ///
    /// Every node below `root` matching `selector`, in pre-order.
    ///
    /// # Errors
    ///
    /// See [`matches`](Self::matches).
    pub fn query_selector_all<'s>(
        &self,
        root: A::Node,
        selector: impl Into<SelectorInput<'s>>,
    ) -> Result<Vec<A::Node>> {
        self.find(root, selector.into(), None)
    }

    /// The children of `parent` matching `selector`, in order.
    ///
    /// # Errors
    ///
    /// See [`matches`](Self::matches).
    pub fn children<'s>(
        &self,
        parent: A::Node,
        selector: impl Into<SelectorInput<'s>>,
    ) -> Result<Vec<A::Node>> {
        self.find(parent, selector.into(), Some(1))
    }

    /// [`Element.closest()`](https://dom.spec.whatwg.org/#dom-element-closest)
    ///
    /// `node` itself or its nearest ancestor matching `selector`.
    ///
    /// # Errors
    ///
    /// See [`matches`](Self::matches).
    pub fn closest<'s>(
        &self,
        node: A::Node,
        selector: impl Into<SelectorInput<'s>>,
    ) -> Result<Option<A::Node>> {
        let resolved = self.resolve(selector.into())?;
        let Some(subject) = resolved.subject() else {
            return Ok(None);
        };
        let matcher = Matcher::new(self.adapter);

        let mut current = Some(node);
        while let Some(candidate) = current {
            if matcher.matches_subject(candidate, subject)? {
                return Ok(Some(candidate));
            }
            current = self.adapter.closest_parent(candidate);
        }
        Ok(None)
    }

    fn find(&self, root: A::Node, input: SelectorInput<'_>, depth: Option<usize>) -> Result<Vec<A::Node>> {
        let resolved = self.resolve(input)?;
        match resolved.subject() {
            Some(subject) => Matcher::new(self.adapter).find(root, subject, depth, false),
            None => Ok(Vec::new()),
        }
    }
}

/// [`Engine::matches`] with default options.
///
/// # Errors
///
/// See [`Engine::matches`].
pub fn matches<'s, A: Adapter>(
    adapter: &A,
    node: A::Node,
    selector: impl Into<SelectorInput<'s>>,
) -> Result<bool> {
    Engine::new(adapter).matches(node, selector)
}

/// [`Engine::query_selector`] with default options.
///
/// # Errors
///
/// See [`Engine::matches`].
pub fn query_selector<'s, A: Adapter>(
    adapter: &A,
    root: A::Node,
    selector: impl Into<SelectorInput<'s>>,
) -> Result<Option<A::Node>> {
    Engine::new(adapter).query_selector(root, selector)
}

/// [`Engine::query_selector_all`] with default options.
///
/// # Errors
///
/// See [`Engine::matches`].
pub fn query_selector_all<'s, A: Adapter>(
    adapter: &A,
    root: A::Node,
    selector: impl Into<SelectorInput<'s>>,
) -> Result<Vec<A::Node>> {
    Engine::new(adapter).query_selector_all(root, selector)
}

/// [`Engine::closest`] with default options.
///
/// # Errors
///
/// See [`Engine::matches`].
pub fn closest<'s, A: Adapter>(
    adapter: &A,
    node: A::Node,
    selector: impl Into<SelectorInput<'s>>,
) -> Result<Option<A::Node>> {
    Engine::new(adapter).closest(node, selector)
}

/// [`Engine::children`] with default options.
///
/// # Errors
///
/// See [`Engine::matches`].
pub fn children<'s, A: Adapter>(
    adapter: &A,
    parent: A::Node,
    selector: impl Into<SelectorInput<'s>>,
) -> Result<Vec<A::Node>> {
    Engine::new(adapter).children(parent, selector)
}
