pub mod config;
pub mod graph;
pub mod target;
pub mod tree;

use crate::errors::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "repodeps",
    version,
    about = "File-level import graph and folder tree for a repository"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the file dependency graph
    Graph(graph::GraphArgs),
    /// Print the folder/file hierarchy
    Tree(tree::TreeArgs),
    /// Inspect resolved configuration
    Config(config::ConfigArgs),
}

/// Dispatch to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Graph(args) => graph::run(&args),
        Commands::Tree(args) => tree::run(&args),
        Commands::Config(args) => config::run(&args),
    }
}
