//! Tests for DOM tree construction and element-only navigation.

use cssq_dom::{DomTree, ElementData, NodeId, NodeType};

/// Build `<html><body>text<p/><!--c--><div/></body></html>` and return (tree, body, p, div).
fn build() -> (DomTree, NodeId, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let body = tree.append_element(html, ElementData::new("body"));
    let _ = tree.append_text(body, "text");
    let p = tree.append_element(body, ElementData::new("p"));
    let comment = tree.alloc(NodeType::Comment("c".to_string()));
    tree.append_child(body, comment);
    let div = tree.append_element(body, ElementData::new("div"));
    (tree, body, p, div)
}

#[test]
fn test_append_child_links_siblings() {
    let (tree, body, p, div) = build();
    assert_eq!(tree.children(body).len(), 4);
    assert_eq!(tree.parent(p), Some(body));
    assert_eq!(tree.prev_sibling(div).and_then(|c| tree.prev_sibling(c)), Some(p));
}

#[test]
fn test_element_siblings_skip_text_and_comments() {
    let (tree, body, p, div) = build();
    assert_eq!(tree.prev_element_sibling(div), Some(p));
    assert_eq!(tree.next_element_sibling(p), Some(div));
    assert_eq!(tree.prev_element_sibling(p), None);
    assert_eq!(tree.next_element_sibling(div), None);
    assert_eq!(tree.element_children(body).collect::<Vec<_>>(), vec![p, div]);
}

#[test]
fn test_document_element() {
    let (tree, body, _, _) = build();
    let html = tree.document_element().unwrap();
    assert_eq!(tree.as_element(html).unwrap().tag_name, "html");
    assert_eq!(tree.parent(body), Some(html));
}

#[test]
fn test_ancestors_walk_to_document() {
    let (tree, body, p, _) = build();
    let ancestors: Vec<NodeId> = tree.ancestors(p).collect();
    assert_eq!(ancestors.len(), 3);
    assert_eq!(ancestors[0], body);
    assert_eq!(*ancestors.last().unwrap(), NodeId::ROOT);
}

#[test]
fn test_inclusive_descendants_in_tree_order() {
    let (tree, body, p, div) = build();
    let order: Vec<NodeId> = tree
        .inclusive_descendants(body)
        .filter(|&id| tree.as_element(id).is_some())
        .collect();
    assert_eq!(order, vec![body, p, div]);
}

#[test]
fn test_element_data_helpers() {
    let data = ElementData::new("svg")
        .with_prefix("svg")
        .with_attr("id", "logo")
        .with_attr("class", "a  b\tc");
    assert_eq!(data.id(), Some("logo"));
    assert_eq!(data.prefix.as_deref(), Some("svg"));
    assert_eq!(data.classes().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert_eq!(ElementData::new("p").classes().count(), 0);
}
