//! A small arena DOM for running selectors against HTML-shaped documents.
//!
//! Nodes are stored in one `Vec` and addressed by [`NodeId`]. Each node knows
//! its parent, its children, and its own position among its parent's
//! children, so sibling steps are a slice lookup rather than a linked walk.
//!
//! Only what selector matching needs is modelled: element local names, an
//! optional namespace prefix and an attribute map. Text and comment nodes are
//! kept so that `:empty` and the element-sibling helpers can see them.
//!
//! See [DOM § 4.2.1 Trees](https://dom.spec.whatwg.org/#trees) for the
//! vocabulary used below (parent, child, sibling, tree order).

use std::collections::HashMap;
use std::iter;

/// Attribute name to value.
pub type AttributesMap = HashMap<String, String>;

/// Index of a node inside a [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The Document node. Every tree has one, at slot zero.
    pub const ROOT: Self = Self(0);
}

/// What a node is.
///
/// [DOM § 4.4](https://dom.spec.whatwg.org/#interface-node) lists more node
/// types; the ones selectors can observe are kept.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The tree's root. Never an element, never matched.
    Document,
    /// An element with a name and attributes.
    Element(ElementData),
    /// Character data.
    Text(String),
    /// A comment; invisible to selectors.
    Comment(String),
}

/// Name, prefix and attributes of an element.
///
/// The namespace prefix is stored as written. There is no namespace URL
/// resolution, so `svg|rect` means "prefix `svg`".
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Local name, compared case-sensitively.
    pub tag_name: String,
    /// Namespace prefix, if the element has one.
    pub prefix: Option<String>,
    /// Attributes by name.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// An element called `tag_name` with no prefix or attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    /// Set an attribute, replacing any previous value.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attrs.insert(name.into(), value.into());
        self
    }

    /// Set the namespace prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Value of the `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// Whitespace-separated tokens of the `class` attribute.
    ///
    /// Splits on ASCII whitespace only, like
    /// [`DOMTokenList`](https://dom.spec.whatwg.org/#interface-domtokenlist).
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get("class")
            .into_iter()
            .flat_map(|list| list.split_ascii_whitespace())
    }
}

/// One slot of the arena.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeType,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Position in `parent.children`. Zero for detached nodes.
    slot: usize,
}

impl Node {
    const fn detached(kind: NodeType) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            slot: 0,
        }
    }

    /// The node's type and payload.
    #[must_use]
    pub const fn node_type(&self) -> &NodeType {
        &self.kind
    }
}

/// A document tree stored in an arena.
///
/// Nodes are never removed, so a [`NodeId`] stays valid for the life of the
/// tree. Lookups with an id from another tree return `None` or an empty
/// slice instead of panicking.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// A tree holding only the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeType::Document)],
        }
    }

    /// The Document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, attached or not, including the Document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the Document node is created with the tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a node without attaching it anywhere.
    pub fn alloc(&mut self, kind: NodeType) -> NodeId {
        self.nodes.push(Node::detached(kind));
        NodeId(self.nodes.len() - 1)
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// A child that is already attached is moved: it is removed from its old
    /// parent first. Out-of-range ids and `parent == child` are ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let len = self.nodes.len();
        if child.0 >= len || parent.0 >= len || parent == child {
            return;
        }
        self.detach(child);

        let siblings = &mut self.nodes[parent.0].children;
        let slot = siblings.len();
        siblings.push(child);

        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.slot = slot;
    }

    /// Unlink `id` from its parent and renumber the siblings after it.
    fn detach(&mut self, id: NodeId) {
        let Some(old_parent) = self.nodes[id.0].parent.take() else {
            return;
        };
        let slot = std::mem::take(&mut self.nodes[id.0].slot);

        let siblings = &mut self.nodes[old_parent.0].children;
        let _ = siblings.remove(slot);
        let shifted = siblings[slot..].to_vec();
        for (offset, sibling) in shifted.into_iter().enumerate() {
            self.nodes[sibling.0].slot = slot + offset;
        }
    }

    /// Create an element under `parent` and return it.
    pub fn append_element(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        let id = self.alloc(NodeType::Element(data));
        self.append_child(parent, id);
        id
    }

    /// Create a text node under `parent` and return it.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.alloc(NodeType::Text(text.into()));
        self.append_child(parent, id);
        id
    }

    /// Parent node. The Document and detached nodes have none.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// All children, in tree order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |node| node.children.as_slice())
    }

    /// The node's siblings including itself, and its position among them.
    fn siblings(&self, id: NodeId) -> Option<(&[NodeId], usize)> {
        let node = self.get(id)?;
        Some((self.children(node.parent?), node.slot))
    }

    /// The sibling directly after this one.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (siblings, slot) = self.siblings(id)?;
        siblings.get(slot + 1).copied()
    }

    /// The sibling directly before this one.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (siblings, slot) = self.siblings(id)?;
        siblings[..slot].last().copied()
    }

    /// Siblings before this node, nearest first.
    pub fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let before = self
            .siblings(id)
            .map_or(&[][..], |(siblings, slot)| &siblings[..slot]);
        before.iter().rev().copied()
    }

    /// Siblings after this node, nearest first.
    pub fn following_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let after = self
            .siblings(id)
            .map_or(&[][..], |(siblings, slot)| &siblings[slot + 1..]);
        after.iter().copied()
    }

    /// Nearest preceding sibling that is an element
    /// ([`previousElementSibling`](https://dom.spec.whatwg.org/#dom-nondocumenttypechildnode-previouselementsibling)).
    #[must_use]
    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.preceding_siblings(id).find(|&n| self.is_element(n))
    }

    /// Nearest following sibling that is an element.
    #[must_use]
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.following_siblings(id).find(|&n| self.is_element(n))
    }

    /// Element children, in tree order.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&n| self.is_element(n))
    }

    /// Parent, grandparent and so on up to the Document.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.parent(id), |&n| self.parent(n))
    }

    /// `id` followed by everything below it, in tree order (pre-order,
    /// depth-first).
    pub fn inclusive_descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut pending = vec![id];
        iter::from_fn(move || {
            let next = pending.pop()?;
            pending.extend(self.children(next).iter().rev());
            Some(next)
        })
    }

    fn is_element(&self, id: NodeId) -> bool {
        self.as_element(id).is_some()
    }

    /// Element payload, if `id` is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        match self.get(id)?.node_type() {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Character data, if `id` is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match self.get(id)?.node_type() {
            NodeType::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The first element child of the Document, which selectors call `:root`.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(NodeId::ROOT).next()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
