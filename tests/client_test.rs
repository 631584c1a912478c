//! Tests for the client code and the demonstration

use composite_tree::application::demo::{DemoReport, MANAGING_HEADER, SIMPLE_HEADER, TREE_HEADER};
use composite_tree::application::{run_demo, Client};
use composite_tree::config::Settings;
use composite_tree::domain::{ComponentArena, Labels, NodeId, TreeBuilder};
use composite_tree::util::testing;

fn output_of(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).unwrap()
}

// ============================================================
// Simple Client Tests
// ============================================================

#[test]
fn given_leaf_when_simple_client_then_reports_leaf() {
    testing::init_test_setup();
    let settings = Settings::default();
    let mut arena = ComponentArena::new();
    let leaf = arena.new_leaf();
    let mut client = Client::new(&settings, Vec::new());

    let result = client.code_client_simple(&arena, leaf.id()).unwrap();

    assert_eq!(result, "Leaf");
    assert_eq!(output_of(client.into_inner()), "Resultado: Leaf\n\n");
}

#[test]
fn given_composite_when_simple_client_then_reports_whole_tree() {
    let settings = Settings::default();
    let mut arena = ComponentArena::new();
    let root = TreeBuilder::default()
        .build(&mut arena, "Branch(Branch(Leaf+Leaf)+Branch(Leaf))")
        .unwrap();
    let mut client = Client::new(&settings, Vec::new());

    client.code_client_simple(&arena, root).unwrap();

    assert_eq!(
        output_of(client.into_inner()),
        "Resultado: Branch(Branch(Leaf+Leaf)+Branch(Leaf))\n\n"
    );
}

#[test]
fn given_custom_settings_when_simple_client_then_uses_prefix_and_labels() {
    let settings = Settings {
        result_prefix: "RESULT".into(),
        labels: Labels {
            leaf: "Hoja".into(),
            branch: "Rama".into(),
            separator: "+".into(),
        },
    };
    let mut arena = ComponentArena::new();
    let root = arena.new_composite();
    let leaf = arena.new_leaf();
    arena.add(root, leaf).unwrap();
    let mut client = Client::new(&settings, Vec::new());

    client.code_client_simple(&arena, root.id()).unwrap();

    assert_eq!(output_of(client.into_inner()), "RESULT: Rama(Hoja)\n\n");
}

// ============================================================
// Managing Client Tests
// ============================================================

#[test]
fn given_composite_when_managing_client_then_attaches_and_reports() {
    let settings = Settings::default();
    let mut arena = ComponentArena::new();
    let builder = TreeBuilder::default();
    let tree = builder
        .build(&mut arena, "Branch(Branch(Leaf+Leaf)+Branch(Leaf))")
        .unwrap();
    let leaf = builder.build(&mut arena, "Leaf").unwrap();
    let mut client = Client::new(&settings, Vec::new());

    let result = client.code_client_managing(&mut arena, tree, leaf).unwrap();

    assert_eq!(result, "Branch(Branch(Leaf+Leaf)+Branch(Leaf)+Leaf)");
    assert_eq!(
        output_of(client.into_inner()),
        "Resultado: Branch(Branch(Leaf+Leaf)+Branch(Leaf)+Leaf)\n"
    );
}

#[test]
fn given_leaf_receiver_when_managing_client_then_no_mutation_attempted() {
    let settings = Settings::default();
    let mut arena = ComponentArena::new();
    let receiver = arena.new_leaf();
    let other = arena.new_composite();
    let mut client = Client::new(&settings, Vec::new());

    let result = client
        .code_client_managing(&mut arena, receiver.id(), other.id())
        .unwrap();

    assert_eq!(result, "Leaf");
    assert_eq!(arena.get_node(other.id()).unwrap().owners(), 0);
}

#[test]
fn given_receiver_inside_child_when_managing_client_then_cycle_error() {
    let settings = Settings::default();
    let mut arena = ComponentArena::new();
    let outer = arena.new_composite();
    let inner = arena.new_composite();
    arena.add(outer, inner).unwrap();
    let mut client = Client::new(&settings, Vec::new());

    let result = client.code_client_managing(&mut arena, inner.id(), outer.id());

    assert!(result.is_err());
    assert!(client.into_inner().is_empty());
}

#[test]
fn given_stale_handle_when_simple_client_then_error_and_no_output() {
    let settings = Settings::default();
    let mut arena = ComponentArena::new();
    let leaf = arena.new_leaf();
    let id: NodeId = leaf.into();
    arena.release(leaf).unwrap();
    let mut client = Client::new(&settings, Vec::new());

    assert!(client.code_client_simple(&arena, id).is_err());
    assert!(client.into_inner().is_empty());
}

// ============================================================
// Demonstration Tests
// ============================================================

#[test]
fn given_default_settings_when_running_demo_then_reports_three_scenarios() {
    let settings = Settings::default();
    let mut out = Vec::new();

    let report = run_demo(&settings, &mut out).unwrap();

    assert_eq!(
        report,
        DemoReport {
            simple: "Leaf".into(),
            tree: "Branch(Branch(Leaf+Leaf)+Branch(Leaf))".into(),
            managed: "Branch(Branch(Leaf+Leaf)+Branch(Leaf)+Leaf)".into(),
        }
    );
    let expected = format!(
        "{}\nResultado: Leaf\n\n{}\nResultado: Branch(Branch(Leaf+Leaf)+Branch(Leaf))\n\n{}\nResultado: Branch(Branch(Leaf+Leaf)+Branch(Leaf)+Leaf)\n",
        SIMPLE_HEADER, TREE_HEADER, MANAGING_HEADER
    );
    assert_eq!(output_of(out), expected);
}
