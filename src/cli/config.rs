use crate::config::resolve::{resolve_config, CliOverrides};
use crate::errors::{RepodepsError, Result};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show resolved configuration with provenance
    Show {
        /// Working directory (defaults to current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub fn run(args: &ConfigArgs) -> Result<()> {
    match &args.action {
        ConfigAction::Show { path } => {
            let working_dir = resolve_working_dir(path.as_deref())?;
            let config = resolve_config(&working_dir, &CliOverrides::default())?;
            let mut stdout = std::io::stdout().lock();
            crate::config::show::render_show(&mut stdout, &config)?;
        }
    }
    Ok(())
}

fn resolve_working_dir(path: Option<&Path>) -> Result<PathBuf> {
    let p = path.unwrap_or(Path::new("."));
    p.canonicalize()
        .map_err(|_| RepodepsError::Config(format!("Invalid path: {}", p.display())))
}
