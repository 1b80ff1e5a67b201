//! The tree capability interface the matcher is generic over.
//!
//! An [`Adapter`] is a read-only view over a caller-owned tree. The engine
//! never builds, copies or mutates nodes; it only passes [`Adapter::Node`]
//! handles back to the adapter and compares them for equality.
//!
//! Two bindings ship with the crate:
//! - [`dom`]: the arena [`DomTree`](cssq_dom::DomTree), element nodes only.
//! - [`object`]: an [`ObjectTree`](object::ObjectTree) over a JSON document,
//!   where every JSON object is a node.

use std::borrow::Cow;

/// [`Adapter`] for [`cssq_dom::DomTree`].
pub mod dom;
/// [`Adapter`] for JSON object trees.
pub mod object;

pub use object::{ObjectNode, ObjectTree};

/// Navigation, inspection and traversal over one kind of tree.
///
/// Every method takes the node handle by value; handles are cheap `Copy`
/// values such as an arena index.
pub trait Adapter {
    /// Opaque node handle.
    type Node: Copy + Eq;

    /// The parent node, if it is one the engine should see. A document or
    /// other non-element container is reported as `None`.
    fn closest_parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// The previous sibling node, skipping anything that is not a node in
    /// the selector sense (text, comments).
    fn prev_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// The next sibling node, with the same skipping rules as [`prev_sibling`](Self::prev_sibling).
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// 0-based index among siblings. With `type_filtered`, only siblings
    /// with the same name and namespace are counted.
    fn child_index(&self, node: Self::Node, type_filtered: bool) -> Option<usize>;

    /// Returns true if `node` carries attribute `name`, whatever its value.
    fn has_attribute(&self, node: Self::Node, name: &str) -> bool;

    /// The value of attribute `name`.
    fn attribute(&self, node: Self::Node, name: &str) -> Option<Cow<'_, str>>;

    /// Returns true if `node`'s id is `id`.
    fn has_id(&self, node: Self::Node, id: &str) -> bool;

    /// Returns true if `node` belongs to class `class`.
    fn has_class(&self, node: Self::Node, class: &str) -> bool;

    /// The namespace (prefix) of `node`, `None` if it has none.
    fn namespace(&self, node: Self::Node) -> Option<&str>;

    /// The name compared by type selectors.
    fn name(&self, node: Self::Node) -> &str;

    /// [§ 14.1 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    fn is_root(&self, node: Self::Node) -> bool;

    /// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    fn is_empty(&self, node: Self::Node) -> bool;

    /// Returns true if `node` is something selectors can match at all.
    /// Non-elements never match, not even `*`.
    fn is_element(&self, _node: Self::Node) -> bool {
        true
    }

    /// Pre-order traversal starting at `root` (inclusive).
    ///
    /// Each visited node is passed to `filter`; every node it accepts is then
    /// passed to `on_match`, and traversal stops as soon as `on_match`
    /// returns `true`. `depth` bounds how far below `root` to go: `Some(1)`
    /// visits `root` and its children only.
    fn visit(
        &self,
        root: Self::Node,
        depth: Option<usize>,
        filter: &mut dyn FnMut(Self::Node) -> bool,
        on_match: &mut dyn FnMut(Self::Node) -> bool,
    );
}
