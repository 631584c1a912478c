//! Domain layer: component tree, notation builder and display
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod display;
pub mod entities;
pub mod error;

pub use arena::{ComponentArena, ComponentNode, CompositeId, LeafId, NodeId};
pub use builder::{TreeBuilder, MAX_NESTING};
pub use display::ToTermTree;
pub use entities::{ComponentKind, Labels};
pub use error::{DomainError, DomainResult};
