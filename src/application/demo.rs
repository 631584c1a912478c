//! The three-step demonstration: a lone leaf, a composite tree, and the
//! same tree after the client attaches the lone leaf to it.

use std::io::Write;

use tracing::{info, instrument};

use crate::application::{ApplicationResult, Client};
use crate::config::Settings;
use crate::domain::ComponentArena;

pub const SIMPLE_HEADER: &str = "Client: I've got a simple component:";
pub const TREE_HEADER: &str = "Client: Now I've got a composite tree:";
pub const MANAGING_HEADER: &str =
    "Client: I don't need to check the components classes even when managing the tree:";

/// Results reported by each step, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoReport {
    pub simple: String,
    pub tree: String,
    pub managed: String,
}

#[instrument(level = "debug", skip_all)]
pub fn run_demo<W: Write>(settings: &Settings, out: W) -> ApplicationResult<DemoReport> {
    let mut arena = ComponentArena::new();
    let mut client = Client::new(settings, out);

    let leaf = arena.new_leaf();
    client.narrate(SIMPLE_HEADER)?;
    let simple = client.code_client_simple(&arena, leaf.id())?;

    let tree = arena.new_composite();
    let branch1 = arena.new_composite();
    let (first, second) = (arena.new_leaf(), arena.new_leaf());
    arena.add(branch1, first)?;
    arena.add(branch1, second)?;
    let branch2 = arena.new_composite();
    let third = arena.new_leaf();
    arena.add(branch2, third)?;
    arena.add(tree, branch1)?;
    arena.add(tree, branch2)?;
    client.narrate(TREE_HEADER)?;
    let tree_result = client.code_client_simple(&arena, tree.id())?;

    client.narrate(MANAGING_HEADER)?;
    let managed = client.code_client_managing(&mut arena, tree.id(), leaf.id())?;

    info!(nodes = arena.len(), "demo complete");
    Ok(DemoReport {
        simple,
        tree: tree_result,
        managed,
    })
}
