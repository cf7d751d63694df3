use crate::cli::target::Target;
use crate::config::resolve::{resolve_config, CliOverrides};
use crate::errors::Result;
use crate::output::tree::{write_tree_json, write_tree_text, TreeFormat};
use crate::output::OutputFormat;
use crate::tree::build_tree;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Repository path to list
    pub path: PathBuf,

    /// List the tree of this git ref instead of the working tree
    #[arg(long = "ref", value_name = "REF")]
    pub reference: Option<String>,

    /// Output format (defaults to text when the configured format is text)
    #[arg(long)]
    pub format: Option<TreeFormat>,

    /// Include glob patterns
    #[arg(long)]
    pub include: Vec<String>,

    /// Exclude glob patterns
    #[arg(long)]
    pub exclude: Vec<String>,
}

pub fn run(args: &TreeArgs) -> Result<()> {
    let working_dir = args.path.canonicalize().unwrap_or_else(|_| args.path.clone());
    let overrides = CliOverrides {
        include: args.include.clone(),
        exclude: args.exclude.clone(),
        ..Default::default()
    };
    let config = resolve_config(&working_dir, &overrides)?;
    let target = Target::open(&args.path, args.reference.as_deref(), &config)?;

    let tree = build_tree(&target.files, &target.root_name());
    let format = args.format.unwrap_or(match config.format {
        OutputFormat::Text => TreeFormat::Text,
        OutputFormat::Json | OutputFormat::Dot => TreeFormat::Json,
    });

    let mut stdout = std::io::stdout().lock();
    match format {
        TreeFormat::Json => write_tree_json(&mut stdout, &tree),
        TreeFormat::Text => write_tree_text(&mut stdout, &tree),
    }
}
