use crate::config::ignore::load_repodepsignore;
use crate::config::provenance::{Origin, Setting};
use crate::config::schema::FileConfig;
use crate::config::ResolvedConfig;
use crate::errors::{RepodepsError, Result};
use crate::output::OutputFormat;
use std::path::{Path, PathBuf};

pub const PROJECT_CONFIG_FILE: &str = ".repodeps.toml";

/// CLI overrides extracted from command arguments.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub format: Option<OutputFormat>,
    pub quiet: bool,
    pub max_files: Option<usize>,
    pub jobs: Option<usize>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub no_cache: bool,
}

/// Resolve configuration by applying layers bottom-up:
/// 1. Built-in defaults
/// 2. User config (~/.config/repodeps/config.toml)
/// 3. Project config (nearest .repodeps.toml walking up from working_dir)
/// 4. Environment variables
/// 5. CLI overrides
pub fn resolve_config(working_dir: &Path, cli: &CliOverrides) -> Result<ResolvedConfig> {
    resolve_config_with_env(working_dir, cli, |name| std::env::var(name).ok())
}

/// Same as [`resolve_config`] with an explicit environment lookup.
pub fn resolve_config_with_env<F>(
    working_dir: &Path,
    cli: &CliOverrides,
    env: F,
) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ResolvedConfig::default();
    let mut loaded_files = Vec::new();

    if let Some(path) = find_user_config() {
        if let Some(file_config) = load_file_config(&path)? {
            apply_file_config(&mut config, &file_config, Origin::UserFile(path.clone()))?;
            loaded_files.push(path);
        }
    }

    if let Some(path) = find_project_config(working_dir) {
        if let Some(file_config) = load_file_config(&path)? {
            apply_file_config(&mut config, &file_config, Origin::ProjectFile(path.clone()))?;
            loaded_files.push(path);
        }
    }

    apply_env_vars(&mut config, env);
    apply_cli_overrides(&mut config, cli);

    if config.jobs == 0 {
        return Err(RepodepsError::Config(
            "analysis.jobs must be at least 1".to_string(),
        ));
    }

    config.ignore_patterns = load_repodepsignore(working_dir);
    config.loaded_files = loaded_files;

    tracing::debug!(
        files = config.loaded_files.len(),
        ignore_patterns = config.ignore_patterns.len(),
        "configuration resolved"
    );

    Ok(config)
}

/// Read and parse a config layer. Unreadable files are skipped with a
/// warning; malformed TOML is an error.
fn load_file_config(path: &Path) -> Result<Option<FileConfig>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("skipping unreadable config {}: {e}", path.display());
            return Ok(None);
        }
    };
    FileConfig::from_toml(&content)
        .map(Some)
        .map_err(|e| RepodepsError::Config(format!("Invalid config {}: {e}", path.display())))
}

fn find_user_config() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("repodeps").join("config.toml"))
}

fn find_project_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG_FILE))
        .find(|path| path.is_file())
}

fn apply_file_config(config: &mut ResolvedConfig, file: &FileConfig, origin: Origin) -> Result<()> {
    let mut took = Vec::new();

    if let Some(format) = &file.defaults.format {
        config.format = format
            .parse()
            .map_err(|e| RepodepsError::Config(format!("defaults.format: {e}")))?;
        took.push(Setting::Format);
    }
    if let Some(quiet) = file.defaults.quiet {
        config.quiet = quiet;
        took.push(Setting::Quiet);
    }
    if let Some(max_files) = file.analysis.max_files {
        config.max_files = max_files;
        took.push(Setting::MaxFiles);
    }
    if let Some(jobs) = file.analysis.jobs {
        config.jobs = jobs;
        took.push(Setting::Jobs);
    }
    if !file.targeting.include.is_empty() {
        config.include = file.targeting.include.clone();
        took.push(Setting::Include);
    }
    if !file.targeting.exclude.is_empty() {
        config.exclude = file.targeting.exclude.clone();
        took.push(Setting::Exclude);
    }
    if let Some(enabled) = file.cache.enabled {
        config.cache.enabled = enabled;
        took.push(Setting::CacheEnabled);
    }
    if let Some(ttl_secs) = file.cache.ttl_secs {
        config.cache.ttl_secs = ttl_secs;
        took.push(Setting::CacheTtl);
    }
    if let Some(dir) = &file.cache.dir {
        config.cache.dir = Some(dir.clone());
        took.push(Setting::CacheDir);
    }

    for setting in took {
        config.provenance.record(setting, origin.clone());
    }
    Ok(())
}

fn parse_bool(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

fn parse_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Apply one `REPODEPS_*` variable. `apply` returns false when the value is
/// rejected, leaving the setting and its origin untouched.
fn apply_env<F, A>(config: &mut ResolvedConfig, env: &F, setting: Setting, apply: A)
where
    F: Fn(&str) -> Option<String>,
    A: FnOnce(&mut ResolvedConfig, &str) -> bool,
{
    let Some(name) = setting.env_var() else {
        return;
    };
    let Some(val) = env(name) else {
        return;
    };
    if apply(config, &val) {
        config.provenance.record(setting, Origin::Env(setting));
    }
}

fn apply_env_vars<F>(config: &mut ResolvedConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    apply_env(config, &env, Setting::Format, |c, val| match val.parse() {
        Ok(format) => {
            c.format = format;
            true
        }
        Err(e) => {
            tracing::warn!("ignoring REPODEPS_FORMAT: {e}");
            false
        }
    });
    apply_env(config, &env, Setting::Quiet, |c, val| {
        c.quiet = parse_bool(val);
        true
    });
    apply_env(config, &env, Setting::MaxFiles, |c, val| {
        val.parse().map(|n| c.max_files = n).is_ok()
    });
    apply_env(config, &env, Setting::Jobs, |c, val| {
        val.parse().map(|n| c.jobs = n).is_ok()
    });
    apply_env(config, &env, Setting::Include, |c, val| {
        c.include = parse_list(val);
        true
    });
    apply_env(config, &env, Setting::Exclude, |c, val| {
        c.exclude = parse_list(val);
        true
    });
    apply_env(config, &env, Setting::CacheTtl, |c, val| {
        val.parse().map(|n| c.cache.ttl_secs = n).is_ok()
    });
    apply_env(config, &env, Setting::CacheDir, |c, val| {
        if val.is_empty() {
            return false;
        }
        c.cache.dir = Some(PathBuf::from(val));
        true
    });
}

fn apply_cli_overrides(config: &mut ResolvedConfig, cli: &CliOverrides) {
    let mut took = Vec::new();

    if let Some(format) = cli.format {
        config.format = format;
        took.push(Setting::Format);
    }
    if cli.quiet {
        config.quiet = true;
        took.push(Setting::Quiet);
    }
    if let Some(max_files) = cli.max_files {
        config.max_files = max_files;
        took.push(Setting::MaxFiles);
    }
    if let Some(jobs) = cli.jobs {
        config.jobs = jobs;
        took.push(Setting::Jobs);
    }
    if !cli.include.is_empty() {
        config.include = cli.include.clone();
        took.push(Setting::Include);
    }
    if !cli.exclude.is_empty() {
        config.exclude = cli.exclude.clone();
        took.push(Setting::Exclude);
    }
    if cli.no_cache {
        config.cache.enabled = false;
        took.push(Setting::CacheEnabled);
    }

    for setting in took {
        config.provenance.record(setting, Origin::Flag(setting));
    }
}
