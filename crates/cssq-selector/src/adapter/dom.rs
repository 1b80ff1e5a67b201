use std::borrow::Cow;

use cssq_dom::{DomTree, ElementData, NodeId};

use super::Adapter;

/// Element-only view of a [`DomTree`].
///
/// Text and comment nodes are invisible to navigation, and the Document node
/// is never reported as a parent: the document element has no parent and is
/// the `:root`.
impl Adapter for DomTree {
    type Node = NodeId;

    fn closest_parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node)
            .filter(|&parent| self.as_element(parent).is_some())
    }

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.prev_element_sibling(node)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.next_element_sibling(node)
    }

    fn child_index(&self, node: NodeId, type_filtered: bool) -> Option<usize> {
        let element = self.as_element(node)?;
        let count = self
            .preceding_siblings(node)
            .filter_map(|sibling| self.as_element(sibling))
            .filter(|sibling| !type_filtered || same_type(sibling, element))
            .count();
        Some(count)
    }

    fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.as_element(node)
            .is_some_and(|e| e.attrs.contains_key(name))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<Cow<'_, str>> {
        self.as_element(node)?
            .attrs
            .get(name)
            .map(|value| Cow::Borrowed(value.as_str()))
    }

    fn has_id(&self, node: NodeId, id: &str) -> bool {
        self.as_element(node).and_then(ElementData::id) == Some(id)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.as_element(node)
            .is_some_and(|e| e.classes().any(|c| c == class))
    }

    fn namespace(&self, node: NodeId) -> Option<&str> {
        self.as_element(node)?.prefix.as_deref()
    }

    fn name(&self, node: NodeId) -> &str {
        self.as_element(node).map_or("", |e| e.tag_name.as_str())
    }

    fn is_root(&self, node: NodeId) -> bool {
        self.document_element() == Some(node)
    }

    /// No children, or a single text child that is all whitespace.
    fn is_empty(&self, node: NodeId) -> bool {
        match self.children(node) {
            [] => true,
            [only] => self.as_text(*only).is_some_and(|t| t.trim().is_empty()),
            _ => false,
        }
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.as_element(node).is_some()
    }

    fn visit(
        &self,
        root: NodeId,
        depth: Option<usize>,
        filter: &mut dyn FnMut(NodeId) -> bool,
        on_match: &mut dyn FnMut(NodeId) -> bool,
    ) {
        let mut stack = vec![(root, 0_usize)];
        while let Some((node, level)) = stack.pop() {
            if filter(node) && on_match(node) {
                return;
            }
            if depth.is_none_or(|max| level < max) {
                stack.extend(
                    self.children(node)
                        .iter()
                        .rev()
                        .filter(|&&child| self.as_element(child).is_some())
                        .map(|&child| (child, level + 1)),
                );
            }
        }
    }
}

fn same_type(a: &ElementData, b: &ElementData) -> bool {
    a.tag_name == b.tag_name && a.prefix == b.prefix
}
