//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Composite pattern on an arena-backed tree: uniform leaf/branch rendering and child management
#[derive(Parser, Debug)]
#[command(name = "composite")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output to stderr (repeat for more: -d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global one
    #[arg(short, long, global = true, env = "COMPOSITE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the demonstration (default)
    Demo,

    /// Build a tree from notation and report it through the client
    Render {
        /// Tree notation, e.g. "Branch(Leaf+Branch(Leaf))"
        expr: String,
    },

    /// Attach CHILD to TREE if TREE can hold children, then report TREE
    Attach {
        /// Tree notation of the receiving component
        tree: String,
        /// Tree notation of the component to attach
        child: String,
    },

    /// Show a tree built from notation as an indented hierarchy
    Tree {
        /// Tree notation
        expr: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings as TOML
    Show,
    /// Show global config file location
    Path,
}
