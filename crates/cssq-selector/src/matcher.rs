//! [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
//!
//! Evaluates an AST node against one tree node through an [`Adapter`].
//! Complex selectors are evaluated right to left: the subject must match the
//! node before any combinator is followed.
//!
//! Matching never mutates the AST or the tree, so one parsed selector may be
//! matched from any number of calls.

use std::borrow::Cow;
use std::cell::RefCell;

use strum_macros::{EnumString, IntoStaticStr};

use crate::adapter::Adapter;
use crate::error::{Error, Result, UnsupportedFeature};
use crate::selector::{
    AttributeMatcher, AttributeModifier, AttributeSelector, Combinator, ComplexSelector,
    PseudoArgument, PseudoSelector, Selector, SelectorList, TypeSelector,
};
use crate::tokenizer::Token;

/// [§ 3.6 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
///
/// Every pseudo-class name the matcher recognizes. Names are ASCII
/// case-insensitive. Anything that does not parse into this enum is
/// [`UnsupportedFeature::PseudoClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PseudoClassKind {
    /// [§ 4.2 :is()](https://www.w3.org/TR/selectors-4/#matches)
    Is,
    /// Legacy name of `:is()`.
    Matches,
    /// Vendor-prefixed `:is()`.
    #[strum(serialize = "-moz-any")]
    MozAny,
    /// Vendor-prefixed `:is()`.
    #[strum(serialize = "-webkit-any")]
    WebkitAny,
    /// [§ 4.4 :where()](https://www.w3.org/TR/selectors-4/#zero-matches)
    Where,
    /// [§ 4.3 :not()](https://www.w3.org/TR/selectors-4/#negation)
    Not,
    /// [§ 4.5 :has()](https://www.w3.org/TR/selectors-4/#relational)
    Has,
    /// [§ 14.4.1 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    FirstChild,
    /// [§ 14.4.2 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,
    /// [§ 14.4.3 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    OnlyChild,
    /// [§ 14.5.1 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
    FirstOfType,
    /// [§ 14.5.2 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
    LastOfType,
    /// [§ 14.5.3 :only-of-type](https://www.w3.org/TR/selectors-4/#the-only-of-type-pseudo)
    OnlyOfType,
    /// [§ 14.1 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    Root,
    /// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    Empty,
    /// [§ 13.1 :enabled](https://www.w3.org/TR/selectors-4/#enableddisabled)
    Enabled,
    /// [§ 13.1 :disabled](https://www.w3.org/TR/selectors-4/#enableddisabled)
    Disabled,
    /// [§ 8.2 :link](https://www.w3.org/TR/selectors-4/#link)
    Link,
    /// [§ 8.2 :visited](https://www.w3.org/TR/selectors-4/#link)
    Visited,
    /// [§ 13.5.1 :checked](https://www.w3.org/TR/selectors-4/#checked)
    Checked,
    /// [§ 13.5.2 :indeterminate](https://www.w3.org/TR/selectors-4/#indeterminate)
    Indeterminate,
    /// `:nth-child(n)`, 0-based index among all siblings.
    NthChild,
    /// `:nth-child-of(n)`, 0-based index among same-type siblings.
    NthChildOf,
    /// [§ 13.3.1 :default](https://www.w3.org/TR/selectors-4/#the-default-pseudo)
    Default,
    /// [§ 12.1 :defined](https://www.w3.org/TR/selectors-4/#the-defined-pseudo)
    Defined,
    /// [§ 9.4 :active](https://www.w3.org/TR/selectors-4/#the-active-pseudo)
    Active,
    /// [§ 9.2 :hover](https://www.w3.org/TR/selectors-4/#the-hover-pseudo)
    Hover,
    /// [§ 9.5 :focus](https://www.w3.org/TR/selectors-4/#the-focus-pseudo)
    Focus,
    /// [§ 8.4 :target](https://www.w3.org/TR/selectors-4/#the-target-pseudo)
    Target,
    /// [§ 14.5.4 :nth-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-of-type-pseudo)
    NthOfType,
    /// [§ 14.4.5 :nth-last-child()](https://www.w3.org/TR/selectors-4/#the-nth-last-child-pseudo)
    NthLastChild,
    /// [§ 14.5.5 :nth-last-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-last-of-type-pseudo)
    NthLastOfType,
    /// [§ 8.6 :scope](https://www.w3.org/TR/selectors-4/#the-scope-pseudo)
    Scope,
}

/// What a query runs: a whole list or a single AST node.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Subject<'s> {
    List(&'s SelectorList),
    Node(&'s Selector),
}

/// Matches AST nodes against the nodes of one adapter's tree.
pub(crate) struct Matcher<'a, A: Adapter> {
    adapter: &'a A,
}

impl<'a, A: Adapter> Matcher<'a, A> {
    pub(crate) const fn new(adapter: &'a A) -> Self {
        Self { adapter }
    }

    pub(crate) fn matches_subject(&self, node: A::Node, subject: Subject<'_>) -> Result<bool> {
        match subject {
            Subject::List(list) => self.matches_list(node, list),
            Subject::Node(selector) => self.matches(node, selector),
        }
    }

    /// Dispatch on the AST node type.
    pub(crate) fn matches(&self, node: A::Node, selector: &Selector) -> Result<bool> {
        if !self.adapter.is_element(node) {
            return Ok(false);
        }
        match selector {
            Selector::List(list) => self.matches_list(node, list),
            Selector::Complex(complex) => self.matches_complex(node, complex),
            // [§ 4.2](https://www.w3.org/TR/selectors-4/#compound)
            // "represents a set of simultaneous conditions on a single element"
            Selector::Compound(compound) => {
                for simple in &compound.selectors {
                    if !self.matches(node, simple)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Selector::Type(type_selector) => Ok(self.matches_type(node, type_selector)),
            Selector::Id(id) => Ok(self.adapter.has_id(node, &id.identifier)),
            Selector::Class(class) => Ok(self.adapter.has_class(node, &class.identifier)),
            Selector::Attribute(attribute) => self.matches_attribute(node, attribute),
            Selector::PseudoClass(pseudo) => self.matches_pseudo_class(node, pseudo),
            Selector::PseudoElement(pseudo) => {
                Err(UnsupportedFeature::PseudoElement(pseudo.identifier.clone()).into())
            }
        }
    }

    /// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
    ///
    /// True if any member matches; stops at the first that does.
    pub(crate) fn matches_list(&self, node: A::Node, list: &SelectorList) -> Result<bool> {
        for selector in &list.selectors {
            if self.matches(node, selector)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
    fn matches_complex(&self, node: A::Node, complex: &ComplexSelector) -> Result<bool> {
        let Some(left) = &complex.left else {
            return Err(UnsupportedFeature::RelativeSelector.into());
        };

        // The subject (rightmost compound) must match the node itself first.
        if !self.matches(node, &complex.right)? {
            return Ok(false);
        }

        match complex.combinator {
            // [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators)
            // "an element B that is an arbitrary descendant of some ancestor element A"
            Combinator::Descendant => {
                let mut current = self.adapter.closest_parent(node);
                while let Some(ancestor) = current {
                    if self.matches(ancestor, left)? {
                        return Ok(true);
                    }
                    current = self.adapter.closest_parent(ancestor);
                }
                Ok(false)
            }

            // [§ 16.2](https://www.w3.org/TR/selectors-4/#child-combinators)
            // "an element B that is a direct child of element A"
            Combinator::Child => match self.adapter.closest_parent(node) {
                Some(parent) => self.matches(parent, left),
                None => Ok(false),
            },

            // [§ 16.3](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
            // "an element B that immediately follows element A"
            Combinator::NextSibling => match self.adapter.prev_sibling(node) {
                Some(previous) => self.matches(previous, left),
                None => Ok(false),
            },

            // [§ 16.4](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
            // "an element B that follows element A (not necessarily immediately)"
            Combinator::SubsequentSibling => {
                for sibling in self.preceding_siblings(node) {
                    if self.matches(sibling, left)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// [§ 5.3 Namespaces](https://www.w3.org/TR/selectors-4/#type-nmsp)
    fn matches_type(&self, node: A::Node, selector: &TypeSelector) -> bool {
        if !selector.is_universal() && self.adapter.name(node) != selector.identifier {
            return false;
        }
        match selector.namespace.as_deref() {
            // "ns|E": elements with name E in namespace ns
            // "*|E": elements with name E in any namespace, including those without a namespace
            // "|E": elements with name E without a namespace
            None | Some("*") => true,
            Some("") => self.adapter.namespace(node).is_none(),
            Some(ns) => self.adapter.namespace(node) == Some(ns),
        }
    }

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Values compare case-insensitively unless the `s` flag is given.
    /// NOTE: an attribute namespace prefix is parsed but not consulted.
    fn matches_attribute(&self, node: A::Node, selector: &AttributeSelector) -> Result<bool> {
        let Some(matcher) = selector.matcher else {
            return Ok(self.adapter.has_attribute(node, &selector.identifier));
        };
        let Some(value) = self.adapter.attribute(node, &selector.identifier) else {
            return Ok(false);
        };
        let expected = selector.value.as_deref().unwrap_or_default();

        let (haystack, needle): (Cow<'_, str>, Cow<'_, str>) =
            if selector.modifier == Some(AttributeModifier::CaseSensitive) {
                (value, Cow::Borrowed(expected))
            } else {
                (
                    Cow::Owned(value.to_lowercase()),
                    Cow::Owned(expected.to_lowercase()),
                )
            };
        let (haystack, needle) = (haystack.as_ref(), needle.as_ref());

        Ok(match matcher {
            AttributeMatcher::Equals => haystack == needle,
            AttributeMatcher::Prefix => haystack.starts_with(needle),
            AttributeMatcher::Suffix => haystack.ends_with(needle),
            AttributeMatcher::Substring => haystack.contains(needle),
            AttributeMatcher::Includes => haystack.split_whitespace().any(|word| word == needle),
            AttributeMatcher::DashMatch => {
                haystack == needle
                    || haystack
                        .strip_prefix(needle)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            AttributeMatcher::Other(c) => {
                return Err(UnsupportedFeature::AttributeMatcher(c).into());
            }
        })
    }

    /// [§ 3.6 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    fn matches_pseudo_class(&self, node: A::Node, pseudo: &PseudoSelector) -> Result<bool> {
        let kind: PseudoClassKind = pseudo
            .identifier
            .parse()
            .map_err(|_| UnsupportedFeature::PseudoClass(pseudo.identifier.clone()))?;
        let adapter = self.adapter;

        Ok(match kind {
            // Logical combinations. A missing argument is a no-match.
            PseudoClassKind::Is
            | PseudoClassKind::Matches
            | PseudoClassKind::Where
            | PseudoClassKind::MozAny
            | PseudoClassKind::WebkitAny => match selector_list_argument(pseudo)? {
                Some(list) => self.matches_list(node, list)?,
                None => false,
            },
            // A missing argument negates nothing.
            PseudoClassKind::Not => match selector_list_argument(pseudo)? {
                Some(list) => !self.matches_list(node, list)?,
                None => true,
            },
            PseudoClassKind::Has => match selector_list_argument(pseudo)? {
                Some(list) => self.find_first(node, Subject::List(list))?.is_some(),
                None => false,
            },

            // Tree-structural
            PseudoClassKind::FirstChild => adapter.prev_sibling(node).is_none(),
            PseudoClassKind::LastChild => adapter.next_sibling(node).is_none(),
            PseudoClassKind::OnlyChild => {
                adapter.prev_sibling(node).is_none() && adapter.next_sibling(node).is_none()
            }
            PseudoClassKind::FirstOfType => self.is_first_of_type(node),
            PseudoClassKind::LastOfType => self.is_last_of_type(node),
            PseudoClassKind::OnlyOfType => self.is_first_of_type(node) && self.is_last_of_type(node),
            PseudoClassKind::Root => adapter.is_root(node),
            PseudoClassKind::Empty => adapter.is_empty(node),

            // Input pseudo-classes, by attribute presence
            PseudoClassKind::Enabled => !adapter.has_attribute(node, "disabled"),
            PseudoClassKind::Disabled => adapter.has_attribute(node, "disabled"),
            PseudoClassKind::Link => {
                matches!(adapter.name(node), "a" | "area" | "link")
                    && adapter.has_attribute(node, "href")
            }
            // History is never exposed.
            PseudoClassKind::Visited => false,
            PseudoClassKind::Checked => {
                adapter.has_attribute(node, "checked") || adapter.has_attribute(node, "selected")
            }
            PseudoClassKind::Indeterminate => adapter.has_attribute(node, "indeterminate"),

            PseudoClassKind::NthChild => self.matches_nth_child(node, pseudo, false)?,
            PseudoClassKind::NthChildOf => self.matches_nth_child(node, pseudo, true)?,

            PseudoClassKind::Default
            | PseudoClassKind::Defined
            | PseudoClassKind::Active
            | PseudoClassKind::Hover
            | PseudoClassKind::Focus
            | PseudoClassKind::Target
            | PseudoClassKind::NthOfType
            | PseudoClassKind::NthLastChild
            | PseudoClassKind::NthLastOfType
            | PseudoClassKind::Scope => {
                return Err(UnsupportedFeature::PseudoClass(pseudo.identifier.clone()).into());
            }
        })
    }

    /// Compare the node's 0-based sibling index against a single integer
    /// argument. General `An+B` forms are rejected.
    fn matches_nth_child(&self, node: A::Node, pseudo: &PseudoSelector, type_filtered: bool) -> Result<bool> {
        let tokens = match &pseudo.argument {
            Some(PseudoArgument::AnPlusB(tokens) | PseudoArgument::Tokens(tokens)) => tokens,
            _ => return Err(argument_shape(pseudo, "single integer")),
        };

        let mut significant = tokens.iter().filter(|t| !t.is_whitespace());
        let index = match (significant.next(), significant.next()) {
            (Some(Token::Number(number)), None) => number.int_value,
            _ => None,
        }
        .ok_or_else(|| argument_shape(pseudo, "single integer"))?;

        Ok(self
            .adapter
            .child_index(node, type_filtered)
            .and_then(|i| i64::try_from(i).ok())
            == Some(index))
    }

    /// No preceding sibling with the same name and namespace.
    fn is_first_of_type(&self, node: A::Node) -> bool {
        !self
            .preceding_siblings(node)
            .any(|sibling| self.same_type(sibling, node))
    }

    /// No following sibling with the same name and namespace.
    fn is_last_of_type(&self, node: A::Node) -> bool {
        !std::iter::successors(self.adapter.next_sibling(node), |&n| self.adapter.next_sibling(n))
            .any(|sibling| self.same_type(sibling, node))
    }

    fn same_type(&self, a: A::Node, b: A::Node) -> bool {
        self.adapter.name(a) == self.adapter.name(b)
            && self.adapter.namespace(a) == self.adapter.namespace(b)
    }

    fn preceding_siblings(&self, node: A::Node) -> impl Iterator<Item = A::Node> + '_ {
        std::iter::successors(self.adapter.prev_sibling(node), |&n| self.adapter.prev_sibling(n))
    }

    /// Every node below `root` (never `root` itself) matching `subject`, in
    /// pre-order. `depth` bounds the search; `first_only` stops at the first hit.
    pub(crate) fn find(
        &self,
        root: A::Node,
        subject: Subject<'_>,
        depth: Option<usize>,
        first_only: bool,
    ) -> Result<Vec<A::Node>> {
        let error: RefCell<Option<Error>> = RefCell::new(None);
        let mut found = Vec::new();

        self.adapter.visit(
            root,
            depth,
            &mut |node| {
                if node == root {
                    return false;
                }
                self.matches_subject(node, subject).unwrap_or_else(|e| {
                    *error.borrow_mut() = Some(e);
                    true
                })
            },
            &mut |node| {
                if error.borrow().is_some() {
                    return true;
                }
                found.push(node);
                first_only
            },
        );

        match error.into_inner() {
            Some(e) => Err(e),
            None => Ok(found),
        }
    }

    /// First node below `root` matching `subject`.
    pub(crate) fn find_first(&self, root: A::Node, subject: Subject<'_>) -> Result<Option<A::Node>> {
        Ok(self.find(root, subject, None, true)?.into_iter().next())
    }
}

/// The selector-list argument of a logical pseudo-class, if it has one.
fn selector_list_argument(pseudo: &PseudoSelector) -> Result<Option<&SelectorList>> {
    match &pseudo.argument {
        None => Ok(None),
        Some(PseudoArgument::SelectorList(list)) => Ok(Some(list)),
        Some(_) => Err(argument_shape(pseudo, "selector list")),
    }
}

fn argument_shape(pseudo: &PseudoSelector, expected: &'static str) -> Error {
    Error::ArgumentShape {
        pseudo: pseudo.identifier.clone(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_class_names() {
        assert_eq!("first-child".parse(), Ok(PseudoClassKind::FirstChild));
        assert_eq!("-webkit-any".parse(), Ok(PseudoClassKind::WebkitAny));
        assert_eq!("NTH-CHILD-OF".parse(), Ok(PseudoClassKind::NthChildOf));
        assert!("nth-col".parse::<PseudoClassKind>().is_err());
        let name: &'static str = PseudoClassKind::OnlyOfType.into();
        assert_eq!(name, "only-of-type");
    }
}
