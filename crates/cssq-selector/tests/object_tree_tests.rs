//! Tests for querying JSON documents through `ObjectTree`.

use serde_json::{Value, json};

use cssq_selector::{
    Adapter, ObjectNode, ObjectTree, children, closest, matches, query_selector,
    query_selector_all,
};

fn document() -> Value {
    json!({
        "type": "Root",
        "children": [
            { "type": "Heading", "depth": 1, "children": [
                { "type": "Text", "value": "Title" }
            ] },
            { "type": "List", "ordered": false, "children": [
                { "type": "ListItem", "checked": true, "children": [
                    { "type": "Text", "value": "one" }
                ] },
                { "type": "ListItem", "checked": null },
                { "type": "ListItem", "tags": ["x", "y"] }
            ] },
            { "type": "Paragraph", "children": [] },
            { "name": "untyped" }
        ]
    })
}

fn names(tree: &ObjectTree<'_>, nodes: &[ObjectNode]) -> Vec<String> {
    nodes.iter().map(|&n| tree.name(n).to_string()).collect()
}

fn one(tree: &ObjectTree<'_>, selector: &str) -> ObjectNode {
    let found = query_selector_all(tree, tree.document(), selector).unwrap();
    assert_eq!(found.len(), 1, "expected one match for {selector}");
    found[0]
}

#[test]
fn test_nodes_in_field_order() {
    let value = document();
    let tree = ObjectTree::new(&value);
    let all = query_selector_all(&tree, tree.document(), "*").unwrap();
    assert_eq!(
        names(&tree, &all),
        [
            "Root", "Heading", "Text", "List", "ListItem", "Text", "ListItem", "ListItem",
            "Paragraph", "Object",
        ]
    );
}

#[test]
fn test_document_node_is_hidden() {
    let value = document();
    let tree = ObjectTree::new(&value);
    let root = one(&tree, "Root");
    assert_eq!(tree.roots().collect::<Vec<_>>(), vec![root]);
    assert_eq!(tree.closest_parent(root), None);
    assert!(tree.is_root(root));
    assert!(!matches(&tree, tree.document(), "*").unwrap());
    assert!(tree.object(tree.document()).is_none());
}

#[test]
fn test_combinators() {
    let value = document();
    let tree = ObjectTree::new(&value);
    let list = one(&tree, "Root > List");
    assert_eq!(one(&tree, "Heading + List"), list);
    assert_eq!(one(&tree, "Heading ~ Object"), one(&tree, "Object"));
    assert_eq!(
        names(&tree, &query_selector_all(&tree, tree.document(), "Root > *").unwrap()),
        ["Heading", "List", "Paragraph", "Object"]
    );
    assert_eq!(
        query_selector_all(&tree, tree.document(), "List Text").unwrap().len(),
        1
    );
}

#[test]
fn test_scalar_fields_are_attributes() {
    let value = document();
    let tree = ObjectTree::new(&value);
    let heading = one(&tree, "Heading");
    assert_eq!(one(&tree, r#"[depth="1"]"#), heading);
    assert_eq!(one(&tree, "[ordered=false]"), one(&tree, "List"));
    assert_eq!(one(&tree, "[name=untyped]"), one(&tree, "Object"));
    assert_eq!(one(&tree, "[tags~=y]"), one(&tree, "ListItem:last-child"));
    assert_eq!(tree.attribute(heading, "depth").as_deref(), Some("1"));
    // Object- and array-of-object fields are children, not attributes.
    assert!(!tree.has_attribute(heading, "children"));
}

#[test]
fn test_null_is_an_empty_attribute() {
    let value = document();
    let tree = ObjectTree::new(&value);
    assert_eq!(
        query_selector_all(&tree, tree.document(), "[checked]").unwrap().len(),
        2
    );
    assert_eq!(one(&tree, r#"[checked=""]"#), one(&tree, "ListItem:nth-child(1)"));
}

#[test]
fn test_readme_example() {
    let value = document();
    let tree = ObjectTree::new(&value);
    let first = one(&tree, "List > ListItem[checked=true]:first-child");
    let text = query_selector(&tree, first, "Text").unwrap().unwrap();
    assert_eq!(tree.object(text).unwrap()["value"], "one");
}

#[test]
fn test_structural_pseudo_classes() {
    let value = document();
    let tree = ObjectTree::new(&value);
    assert_eq!(one(&tree, ":root"), one(&tree, "Root"));
    assert_eq!(one(&tree, "Paragraph:empty"), one(&tree, "Paragraph"));
    assert!(query_selector_all(&tree, tree.document(), "Heading:empty")
        .unwrap()
        .is_empty());
    assert_eq!(one(&tree, "ListItem:nth-child-of(2)"), one(&tree, "[tags]"));
    assert_eq!(
        names(&tree, &query_selector_all(&tree, tree.document(), "Root > :only-of-type").unwrap()),
        ["Heading", "List", "Paragraph", "Object"]
    );
}

#[test]
fn test_no_ids_or_classes() {
    let value = json!({ "type": "Node", "id": "x", "class": "y" });
    let tree = ObjectTree::new(&value);
    assert!(query_selector_all(&tree, tree.document(), "#x").unwrap().is_empty());
    assert!(query_selector_all(&tree, tree.document(), ".y").unwrap().is_empty());
    assert_eq!(query_selector_all(&tree, tree.document(), "[id=x]").unwrap().len(), 1);
}

#[test]
fn test_closest_and_children() {
    let value = document();
    let tree = ObjectTree::new(&value);
    let list = one(&tree, "List");
    let text = one(&tree, "ListItem > Text");
    assert_eq!(closest(&tree, text, "List").unwrap(), Some(list));
    assert_eq!(closest(&tree, list, "Heading").unwrap(), None);
    assert_eq!(children(&tree, list, "*").unwrap().len(), 3);
    assert_eq!(tree.child_nodes(list).count(), 3);
    assert!(children(&tree, list, "Text").unwrap().is_empty());
}

#[test]
fn test_top_level_array_has_several_roots() {
    let value = json!([{ "type": "A" }, { "type": "B" }, 3, "skip"]);
    let tree = ObjectTree::new(&value);
    assert_eq!(tree.roots().count(), 2);
    assert_eq!(
        query_selector_all(&tree, tree.document(), ":root").unwrap().len(),
        2
    );
    let b = one(&tree, "A + B");
    assert_eq!(tree.name(b), "B");
}

#[test]
fn test_scalar_document_has_no_nodes() {
    let value = json!("just text");
    let tree = ObjectTree::new(&value);
    assert_eq!(tree.roots().count(), 0);
    assert!(query_selector_all(&tree, tree.document(), "*").unwrap().is_empty());
}
