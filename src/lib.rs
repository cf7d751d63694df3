//! Heuristic import extraction and file-level dependency graphs for
//! repositories, plus a folder tree of the same file listing.
//!
//! The pipeline: a file listing ([`walk::discover_files`] or
//! [`source::GitSource::list_files`]) and a [`source::ContentSource`] go into
//! [`graph::DependencyGraphBuilder`], which extracts import specifiers with
//! [`parse::extract`] and resolves them with [`parse::resolver`].

pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod graph;
pub mod metrics;
pub mod output;
pub mod parse;
pub mod source;
pub mod tree;
pub mod walk;
