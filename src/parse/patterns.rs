//! Textual import rules, grouped per language family.
//!
//! These are heuristics over raw text, not a parser: imports inside comments
//! or string literals are matched too, and statements spanning several lines
//! are only found when the rule itself does not need to cross a newline.

use crate::parse::common::ImportKind;
use regex::Regex;
use std::sync::OnceLock;

/// A single rule: the regex's first capture group is the specifier.
#[derive(Debug, Clone, Copy)]
pub struct ImportRule {
    pub kind: ImportKind,
    pub regex: &'static Regex,
}

/// Ordered set of rules applied to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternGroup {
    /// `.js`, `.jsx`, `.mjs`, `.cjs`
    JavaScript,
    /// JavaScript rules plus triple-slash references
    TypeScript,
    /// `@import` and `url()` for CSS, SCSS and Less
    Stylesheet,
    /// Union of the JavaScript and TypeScript rules for unknown extensions
    Fallback,
}

impl PatternGroup {
    pub fn rules(&self) -> Vec<ImportRule> {
        match self {
            PatternGroup::JavaScript => script_rules(),
            PatternGroup::TypeScript | PatternGroup::Fallback => {
                let mut rules = script_rules();
                rules.push(ImportRule {
                    kind: ImportKind::Reference,
                    regex: reference_regex(),
                });
                rules
            }
            PatternGroup::Stylesheet => vec![
                ImportRule {
                    kind: ImportKind::StyleImport,
                    regex: style_import_regex(),
                },
                ImportRule {
                    kind: ImportKind::StyleUrl,
                    regex: style_url_regex(),
                },
            ],
        }
    }
}

fn script_rules() -> Vec<ImportRule> {
    vec![
        ImportRule {
            kind: ImportKind::Static,
            regex: static_import_regex(),
        },
        ImportRule {
            kind: ImportKind::SideEffect,
            regex: side_effect_regex(),
        },
        ImportRule {
            kind: ImportKind::Dynamic,
            regex: dynamic_import_regex(),
        },
        ImportRule {
            kind: ImportKind::Require,
            regex: require_regex(),
        },
        ImportRule {
            kind: ImportKind::ReExport,
            regex: re_export_regex(),
        },
    ]
}

fn static_import_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r#"import\s+.*?\s+from\s+['"]([^'"]+)['"]"#))
}

fn side_effect_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r#"import\s+['"]([^'"]+)['"]"#))
}

fn dynamic_import_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r#"import\s*\(\s*['"]([^'"]+)['"]\s*\)"#))
}

fn require_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#))
}

fn re_export_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r#"export\s+.*?\s+from\s+['"]([^'"]+)['"]"#))
}

fn reference_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r#"///\s*<reference\s+path\s*=\s*['"]([^'"]+)['"]"#))
}

fn style_import_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r#"@import\s+['"]([^'"]+)['"]"#))
}

fn style_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r#"url\(\s*['"]?([^'")\s]+)['"]?\s*\)"#))
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("failed to compile import pattern")
}
