use crate::parse::common::{is_network_specifier, LineIndex, RawImport};
use crate::walk::Language;

/// Extract raw imports from a file's text.
///
/// Rules of the file's pattern group are applied one after another over the
/// whole text; results keep rule order, then match order within a rule.
/// Duplicates are preserved.
pub fn extract_imports(content: &str, file_path: &str) -> Vec<RawImport> {
    let group = Language::from_path(file_path).pattern_group();
    let lines = LineIndex::new(content);
    let mut imports = Vec::new();

    for rule in group.rules() {
        for caps in rule.regex.captures_iter(content) {
            let Some(m) = caps.get(1) else {
                continue;
            };
            let specifier = m.as_str();
            if is_network_specifier(specifier) {
                continue;
            }
            imports.push(RawImport {
                specifier: specifier.to_string(),
                kind: rule.kind,
                line: lines.line_at(m.start()),
            });
        }
    }

    imports
}

/// Extract only the specifier strings, in the same order as [`extract_imports`].
pub fn extract_specifiers(content: &str, file_path: &str) -> Vec<String> {
    extract_imports(content, file_path)
        .into_iter()
        .map(|i| i.specifier)
        .collect()
}
