use crate::config::provenance::Setting;
use crate::config::ResolvedConfig;
use std::io::Write;

/// Render `config show` output.
pub fn render_show<W: Write>(w: &mut W, config: &ResolvedConfig) -> std::io::Result<()> {
    if config.loaded_files.is_empty() {
        writeln!(w, "Loaded config files: (none)")?;
    } else {
        writeln!(w, "Loaded config files:")?;
        for (i, path) in config.loaded_files.iter().enumerate() {
            writeln!(w, "  {}. {}", i + 1, path.display())?;
        }
    }
    writeln!(w)?;

    writeln!(w, "Resolved settings:")?;
    for (setting, origin) in config.provenance.iter() {
        let value = setting_value(config, setting);
        writeln!(w, "  {setting}: {value} <- {origin}")?;
    }

    if !config.ignore_patterns.is_empty() {
        writeln!(w)?;
        writeln!(w, "Ignore patterns (.repodepsignore):")?;
        for pattern in &config.ignore_patterns {
            writeln!(w, "  {pattern}")?;
        }
    }

    Ok(())
}

fn setting_value(config: &ResolvedConfig, setting: Setting) -> String {
    match setting {
        Setting::Format => config.format.to_string(),
        Setting::Quiet => config.quiet.to_string(),
        Setting::MaxFiles => config.max_files.to_string(),
        Setting::Jobs => config.jobs.to_string(),
        Setting::Include => format!("{:?}", config.include),
        Setting::Exclude => format!("{:?}", config.exclude),
        Setting::CacheEnabled => config.cache.enabled.to_string(),
        Setting::CacheTtl => config.cache.ttl_secs.to_string(),
        Setting::CacheDir => match config.cache.directory() {
            Some(dir) => dir.display().to_string(),
            None => "(unavailable)".to_string(),
        },
    }
}
