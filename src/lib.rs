//! Composite pattern on an arena-backed component tree.
//!
//! Leaves and composites are both addressed through a [`domain::NodeId`];
//! client code renders and extends trees without knowing which variant a
//! handle points at.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
