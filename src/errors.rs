use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum RepodepsError {
    #[error("No files found in {path}")]
    #[diagnostic(code(repodeps::no_files))]
    NoFiles { path: PathBuf },

    #[error("Could not resolve ref: {reference}")]
    #[diagnostic(code(repodeps::bad_ref))]
    BadRef { reference: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(repodeps::config))]
    Config(String),

    #[error("Graph build was cancelled")]
    #[diagnostic(code(repodeps::cancelled))]
    Cancelled,

    #[error(transparent)]
    #[diagnostic(code(repodeps::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(repodeps::git))]
    Git(#[from] git2::Error),

    #[error(transparent)]
    #[diagnostic(code(repodeps::json))]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(repodeps::glob))]
    Glob(#[from] globset::Error),

    #[error(transparent)]
    #[diagnostic(code(repodeps::thread_pool))]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, RepodepsError>;
