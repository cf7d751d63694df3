use crate::errors::Result;
use crate::graph::ir::FileRecord;
use crate::parse::patterns::PatternGroup;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use serde::Serialize;
use std::path::Path;

/// Build artifacts and VCS metadata that never belong in the file universe.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/.git/**",
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
    "**/coverage/**",
    "**/.next/**",
    "**/.cache/**",
];

/// Language classification of a repository file, keyed by extension.
///
/// Unknown extensions map to [`Language::Other`], which analyzes with the
/// broadest script pattern group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Css,
    Scss,
    Less,
    Html,
    Json,
    Markdown,
    Python,
    Ruby,
    Go,
    Rust,
    Java,
    Other,
}

impl Language {
    /// Classify a lowercased, dot-less extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => Language::TypeScript,
            "css" => Language::Css,
            "scss" => Language::Scss,
            "less" => Language::Less,
            "html" | "htm" => Language::Html,
            "json" => Language::Json,
            "md" | "markdown" => Language::Markdown,
            "py" => Language::Python,
            "rb" => Language::Ruby,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "java" => Language::Java,
            _ => Language::Other,
        }
    }

    /// Classify a path by the extension of its last segment.
    pub fn from_path(path: &str) -> Self {
        Self::from_extension(&extension_of(path))
    }

    /// Human-readable language name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Css => "CSS",
            Language::Scss => "SCSS",
            Language::Less => "Less",
            Language::Html => "HTML",
            Language::Json => "JSON",
            Language::Markdown => "Markdown",
            Language::Python => "Python",
            Language::Ruby => "Ruby",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::Java => "Java",
            Language::Other => "Other",
        }
    }

    /// Fill color hint for renderers.
    pub fn color(&self) -> &'static str {
        match self {
            Language::JavaScript => "#f1e05a",
            Language::TypeScript => "#3178c6",
            Language::Css => "#563d7c",
            Language::Scss => "#c6538c",
            Language::Less => "#1d365d",
            Language::Html => "#e34c26",
            Language::Json => "#cbcb41",
            Language::Markdown => "#083fa1",
            Language::Python => "#3572a5",
            Language::Ruby => "#701516",
            Language::Go => "#00add8",
            Language::Rust => "#dea584",
            Language::Java => "#b07219",
            Language::Other => "#94a3b8",
        }
    }

    /// Pattern group used to extract imports from files of this language.
    pub fn pattern_group(&self) -> PatternGroup {
        match self {
            Language::JavaScript => PatternGroup::JavaScript,
            Language::TypeScript => PatternGroup::TypeScript,
            Language::Css | Language::Scss | Language::Less => PatternGroup::Stylesheet,
            Language::Html
            | Language::Json
            | Language::Markdown
            | Language::Python
            | Language::Ruby
            | Language::Go
            | Language::Rust
            | Language::Java
            | Language::Other => PatternGroup::Fallback,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lowercased extension of the last path segment, without the dot.
/// Returns an empty string for names without an extension (including dotfiles).
pub fn extension_of(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[idx + 1..].to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// Compile the exclude set: defaults plus user patterns.
pub fn build_exclude_set(exclude_patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in DEFAULT_EXCLUDES {
        builder.add(Glob::new(pattern)?);
    }
    for pattern in exclude_patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Compile the include set, or `None` when every file is included.
pub fn build_include_set(include_patterns: &[String]) -> Result<Option<GlobSet>> {
    if include_patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in include_patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(Some(builder.build()?))
}

/// Decide whether a root-relative, '/'-separated path is part of the universe.
pub fn is_selected(relative: &str, exclude: &GlobSet, include: Option<&GlobSet>) -> bool {
    if exclude.is_match(relative) {
        return false;
    }
    include.map_or(true, |set| set.is_match(relative))
}

/// Discover every file under `root` as a [`FileRecord`].
///
/// - Respects `.gitignore`
/// - Drops build artifacts and VCS directories
/// - Applies include/exclude glob patterns
/// - Returns records sorted by path for deterministic output
pub fn discover_files(
    root: &Path,
    include_patterns: &[String],
    exclude_patterns: &[String],
) -> Result<Vec<FileRecord>> {
    let exclude_set = build_exclude_set(exclude_patterns)?;
    let include_set = build_include_set(include_patterns)?;

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .build();

    let mut files = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!("walk error: {err}");
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if !is_selected(&relative, &exclude_set, include_set.as_ref()) {
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        files.push(FileRecord::new(relative, size));
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(files)
}
