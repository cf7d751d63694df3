//! Which configuration layer supplied each repodeps setting.

use std::fmt;
use std::path::PathBuf;

/// A resolvable setting, named by its `section.field` key in
/// `.repodeps.toml`. Declared in key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Setting {
    Jobs,
    MaxFiles,
    CacheDir,
    CacheEnabled,
    CacheTtl,
    Format,
    Quiet,
    Exclude,
    Include,
}

impl Setting {
    pub const COUNT: usize = 9;

    pub const ALL: [Setting; Setting::COUNT] = [
        Setting::Jobs,
        Setting::MaxFiles,
        Setting::CacheDir,
        Setting::CacheEnabled,
        Setting::CacheTtl,
        Setting::Format,
        Setting::Quiet,
        Setting::Exclude,
        Setting::Include,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Setting::Jobs => "analysis.jobs",
            Setting::MaxFiles => "analysis.max_files",
            Setting::CacheDir => "cache.dir",
            Setting::CacheEnabled => "cache.enabled",
            Setting::CacheTtl => "cache.ttl_secs",
            Setting::Format => "defaults.format",
            Setting::Quiet => "defaults.quiet",
            Setting::Exclude => "targeting.exclude",
            Setting::Include => "targeting.include",
        }
    }

    /// Environment variable overriding this setting, if any.
    pub fn env_var(self) -> Option<&'static str> {
        match self {
            Setting::Jobs => Some("REPODEPS_JOBS"),
            Setting::MaxFiles => Some("REPODEPS_MAX_FILES"),
            Setting::CacheDir => Some("REPODEPS_CACHE_DIR"),
            Setting::CacheTtl => Some("REPODEPS_CACHE_TTL"),
            Setting::Format => Some("REPODEPS_FORMAT"),
            Setting::Quiet => Some("REPODEPS_QUIET"),
            Setting::Exclude => Some("REPODEPS_EXCLUDE"),
            Setting::Include => Some("REPODEPS_INCLUDE"),
            Setting::CacheEnabled => None,
        }
    }

    /// `graph` flag overriding this setting, if any.
    pub fn cli_flag(self) -> Option<&'static str> {
        match self {
            Setting::Jobs => Some("--jobs"),
            Setting::MaxFiles => Some("--max-files"),
            Setting::CacheEnabled => Some("--no-cache"),
            Setting::Format => Some("--format"),
            Setting::Quiet => Some("--quiet"),
            Setting::Exclude => Some("--exclude"),
            Setting::Include => Some("--include"),
            Setting::CacheDir | Setting::CacheTtl => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The layer a setting's value was taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Origin {
    #[default]
    Default,
    UserFile(PathBuf),
    ProjectFile(PathBuf),
    Env(Setting),
    Flag(Setting),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Default => f.write_str("default"),
            Origin::UserFile(path) => write!(f, "user config ({})", path.display()),
            Origin::ProjectFile(path) => write!(f, "project config ({})", path.display()),
            Origin::Env(setting) => {
                write!(f, "env var ({})", setting.env_var().unwrap_or(setting.key()))
            }
            Origin::Flag(setting) => {
                write!(f, "CLI flag ({})", setting.cli_flag().unwrap_or(setting.key()))
            }
        }
    }
}

/// One [`Origin`] per [`Setting`]; everything starts at [`Origin::Default`].
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    origins: [Origin; Setting::COUNT],
}

impl Provenance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `setting` now comes from `origin`, replacing lower layers.
    pub fn record(&mut self, setting: Setting, origin: Origin) {
        self.origins[setting.index()] = origin;
    }

    pub fn origin(&self, setting: Setting) -> &Origin {
        &self.origins[setting.index()]
    }

    /// Every setting in key order with its origin.
    pub fn iter(&self) -> impl Iterator<Item = (Setting, &Origin)> {
        Setting::ALL.into_iter().map(|s| (s, self.origin(s)))
    }
}
