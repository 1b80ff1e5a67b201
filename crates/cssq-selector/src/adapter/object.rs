use std::borrow::Cow;

use serde_json::{Map, Value};

use super::Adapter;

/// Name given to objects without a string `"type"` field.
pub const DEFAULT_NODE_NAME: &str = "Object";

/// Name of the synthetic node holding the top-level objects.
const DOCUMENT_NAME: &str = "#document";

/// Handle to a node of an [`ObjectTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectNode(usize);

impl ObjectNode {
    /// The synthetic document node every tree starts with.
    pub const DOCUMENT: Self = Self(0);
}

#[derive(Debug)]
struct Entry<'a> {
    /// `None` only for the document node.
    object: Option<&'a Map<String, Value>>,
    name: &'a str,
    parent: Option<usize>,
    children: Vec<usize>,
    /// Position in the parent's `children`.
    position: usize,
}

/// A selector-matchable view over a JSON document, such as a parsed-document
/// AST exported as JSON.
///
/// Every JSON object is a node. Its name is the value of its `"type"` field
/// (or `"Object"`), its scalar fields are its attributes, and the objects
/// found in its object- or array-valued fields are its children, in field
/// order. Objects have no ids, classes or namespaces.
///
/// ```text
/// { "type": "List", "ordered": false, "children": [
///     { "type": "ListItem", "checked": true },
///     { "type": "ListItem" } ] }
///
/// List > ListItem[checked=true]:first-child
/// ```
///
/// The top-level value sits under a synthetic document node, which is never
/// reported as a parent: top-level objects are `:root`. A top-level array
/// yields several roots.
#[derive(Debug)]
pub struct ObjectTree<'a> {
    entries: Vec<Entry<'a>>,
}

impl<'a> ObjectTree<'a> {
    /// Index every object in `document`.
    #[must_use]
    pub fn new(document: &'a Value) -> Self {
        let mut tree = Self {
            entries: vec![Entry {
                object: None,
                name: DOCUMENT_NAME,
                parent: None,
                children: Vec::new(),
                position: 0,
            }],
        };
        tree.add_value(0, document);
        tree
    }

    /// The synthetic document node.
    #[must_use]
    pub const fn document(&self) -> ObjectNode {
        ObjectNode::DOCUMENT
    }

    /// The top-level objects.
    pub fn roots(&self) -> impl Iterator<Item = ObjectNode> + '_ {
        self.entries[0].children.iter().map(|&i| ObjectNode(i))
    }

    /// Child nodes of `node`, in field order.
    pub fn child_nodes(&self, node: ObjectNode) -> impl Iterator<Item = ObjectNode> + '_ {
        self.entry(node)
            .into_iter()
            .flat_map(|entry| entry.children.iter().map(|&i| ObjectNode(i)))
    }

    /// The JSON object behind `node`; `None` for the document node.
    #[must_use]
    pub fn object(&self, node: ObjectNode) -> Option<&'a Map<String, Value>> {
        self.entry(node)?.object
    }

    fn entry(&self, node: ObjectNode) -> Option<&Entry<'a>> {
        self.entries.get(node.0)
    }

    fn add_value(&mut self, parent: usize, value: &'a Value) {
        match value {
            Value::Object(object) => self.add_object(parent, object),
            Value::Array(items) => {
                for item in items {
                    self.add_value(parent, item);
                }
            }
            _ => {}
        }
    }

    fn add_object(&mut self, parent: usize, object: &'a Map<String, Value>) {
        let id = self.entries.len();
        let position = self.entries[parent].children.len();
        self.entries[parent].children.push(id);
        self.entries.push(Entry {
            object: Some(object),
            name: object
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_NODE_NAME),
            parent: Some(parent),
            children: Vec::new(),
            position,
        });

        for field in object.values() {
            if matches!(field, Value::Object(_) | Value::Array(_)) {
                self.add_value(id, field);
            }
        }
    }

    fn sibling_at(&self, node: ObjectNode, offset: isize) -> Option<ObjectNode> {
        let entry = self.entry(node)?;
        let parent = self.entries.get(entry.parent?)?;
        let position = entry.position.checked_add_signed(offset)?;
        parent.children.get(position).map(|&i| ObjectNode(i))
    }
}

/// The attribute text of a field: scalars as written, arrays as their
/// scalar items joined by spaces. Objects are children, not attributes.
fn attribute_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        Value::Null => Some(Cow::Borrowed("")),
        Value::Array(items) => {
            let words: Vec<_> = items
                .iter()
                .filter(|item| !matches!(item, Value::Object(_) | Value::Array(_)))
                .filter_map(attribute_text)
                .collect();
            (!words.is_empty()).then(|| Cow::Owned(words.join(" ")))
        }
        Value::Object(_) => None,
    }
}

impl Adapter for ObjectTree<'_> {
    type Node = ObjectNode;

    fn closest_parent(&self, node: ObjectNode) -> Option<ObjectNode> {
        self.entry(node)?
            .parent
            .filter(|&parent| parent != ObjectNode::DOCUMENT.0)
            .map(ObjectNode)
    }

    fn prev_sibling(&self, node: ObjectNode) -> Option<ObjectNode> {
        self.sibling_at(node, -1)
    }

    fn next_sibling(&self, node: ObjectNode) -> Option<ObjectNode> {
        self.sibling_at(node, 1)
    }

    fn child_index(&self, node: ObjectNode, type_filtered: bool) -> Option<usize> {
        let entry = self.entry(node)?;
        if !type_filtered {
            return Some(entry.position);
        }
        let parent = self.entries.get(entry.parent?)?;
        let same_name = parent.children[..entry.position]
            .iter()
            .filter(|&&sibling| self.entries[sibling].name == entry.name)
            .count();
        Some(same_name)
    }

    fn has_attribute(&self, node: ObjectNode, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    fn attribute(&self, node: ObjectNode, name: &str) -> Option<Cow<'_, str>> {
        attribute_text(self.object(node)?.get(name)?)
    }

    fn has_id(&self, _node: ObjectNode, _id: &str) -> bool {
        false
    }

    fn has_class(&self, _node: ObjectNode, _class: &str) -> bool {
        false
    }

    fn namespace(&self, _node: ObjectNode) -> Option<&str> {
        None
    }

    fn name(&self, node: ObjectNode) -> &str {
        self.entry(node).map_or("", |entry| entry.name)
    }

    fn is_root(&self, node: ObjectNode) -> bool {
        self.entry(node)
            .is_some_and(|entry| entry.parent == Some(ObjectNode::DOCUMENT.0))
    }

    fn is_empty(&self, node: ObjectNode) -> bool {
        self.entry(node).is_some_and(|entry| entry.children.is_empty())
    }

    fn is_element(&self, node: ObjectNode) -> bool {
        node != ObjectNode::DOCUMENT && node.0 < self.entries.len()
    }

    fn visit(
        &self,
        root: ObjectNode,
        depth: Option<usize>,
        filter: &mut dyn FnMut(ObjectNode) -> bool,
        on_match: &mut dyn FnMut(ObjectNode) -> bool,
    ) {
        let mut stack = vec![(root, 0_usize)];
        while let Some((node, level)) = stack.pop() {
            if filter(node) && on_match(node) {
                return;
            }
            if depth.is_none_or(|max| level < max) {
                if let Some(entry) = self.entry(node) {
                    stack.extend(
                        entry
                            .children
                            .iter()
                            .rev()
                            .map(|&child| (ObjectNode(child), level + 1)),
                    );
                }
            }
        }
    }
}
