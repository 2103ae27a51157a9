//! Cursor behavior through whole edit sessions.

use malange_parser::{Cursor, Down, Item, Parser, Pointer, Tree, TreeError};
use pretty_assertions::assert_eq;

#[test]
fn test_nest_then_up_without_add() {
    let mut tree: Tree<u32> = Tree::new("root");
    let mut cursor = Cursor::new(&mut tree);
    let a = cursor.nest("A");
    assert_eq!(cursor.history(), &[Some(0), None]);

    cursor.up().unwrap();
    assert_eq!(cursor.pointer(), Pointer { depth: 0, position: Some(0) });
    assert_eq!(cursor.history(), &[Some(0)]);
    assert_eq!(cursor.tree().node(a).position, 0);
    assert!(cursor.tree().children(a).is_empty());
}

#[test]
fn test_up_after_siblings_restores_own_position() {
    let mut tree: Tree<u32> = Tree::new("root");
    let mut cursor = Cursor::new(&mut tree);
    cursor.add(1);
    cursor.add(2);
    cursor.previous().unwrap();
    cursor.nest("B");
    cursor.add(9);
    cursor.up().unwrap();
    assert_eq!(cursor.pointer(), Pointer { depth: 0, position: Some(1) });
    cursor.add(3);

    let root = tree.root();
    let kinds: Vec<String> = tree
        .children(root)
        .iter()
        .map(|item| match item {
            Item::Leaf(v) => v.to_string(),
            Item::Node(id) => tree.node(*id).name.clone(),
        })
        .collect();
    assert_eq!(kinds, vec!["1", "B", "3", "2"]);
}

#[test]
fn test_walk_built_tree() {
    let mut tree: Tree<&str> = Tree::new("root");
    let mut cursor = Cursor::new(&mut tree);
    cursor.nest("html");
    cursor.nest("body");
    cursor.add("hello");
    cursor.up().unwrap();
    cursor.up().unwrap();
    assert_eq!(cursor.up(), Err(TreeError::NoParent));

    assert!(matches!(cursor.down(), Ok(Down::Entered(_))));
    assert!(matches!(cursor.down(), Ok(Down::Entered(_))));
    assert_eq!(cursor.down(), Ok(Down::Leaf(&"hello")));
    assert_eq!(cursor.depth(), 2);
    assert_eq!(cursor.next(), Err(TreeError::OutOfBounds));
}

#[test]
fn test_parsed_page_structure() {
    let doc = Parser::parse(
        "<html><body>[for item in items/]<li>{item}</li>[/for]<hr>[/Footer/]</body></html>",
    )
    .unwrap();
    let dump = doc.tree.to_string();
    assert!(dump.starts_with("root(0, 0) {\n  html(1, 0) {\n"));
    assert!(dump.contains("      for(3, 1) {\n"));
    assert!(dump.contains("        li(4, 1) {\n"));
    assert!(dump.contains("      hr(3, 2) {\n"));
    assert!(dump.contains("Component [59] : 'Footer'"));
}

#[test]
fn test_flat_build_keeps_sibling_positions() {
    let mut tree: Tree<u32> = Tree::new("root");
    let mut cursor = Cursor::new(&mut tree);
    for i in 0..4000 {
        cursor.nest("n");
        cursor.up().unwrap();
        cursor.add(i);
    }
    assert_eq!(cursor.pointer(), Pointer { depth: 0, position: Some(7999) });

    let root = tree.root();
    let nodes: Vec<_> = tree.child_nodes(root).collect();
    assert_eq!(nodes.len(), 4000);
    for (i, id) in nodes.into_iter().enumerate() {
        assert_eq!(tree.node(id).position, 2 * i);
    }
}

#[test]
fn test_deeply_nested_document_prints() {
    let depth = 3000;
    let source = format!("{}{}", "<div>".repeat(depth), "</div>".repeat(depth));
    let doc = Parser::parse(&source).unwrap();
    let dump = std::thread::Builder::new()
        .stack_size(128 * 1024)
        .spawn(move || doc.tree.to_string())
        .unwrap()
        .join()
        .unwrap();
    assert!(dump.starts_with("root(0, 0) {\n  div(1, 0) {\n"));
    assert!(dump.contains(&format!("div({depth}, 0) {{\n")));
    assert!(dump.ends_with("}\n"));
}
