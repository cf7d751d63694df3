use std::path::Path;

pub const IGNORE_FILE: &str = ".repodepsignore";

/// Load `.repodepsignore` by walking up from the given directory and
/// translate its gitignore-style lines into exclude globs.
pub fn load_repodepsignore(start: &Path) -> Vec<String> {
    let mut dir = start.to_path_buf();
    loop {
        let ignore_path = dir.join(IGNORE_FILE);
        if ignore_path.is_file() {
            match std::fs::read_to_string(&ignore_path) {
                Ok(content) => return parse_ignore_patterns(&content),
                Err(e) => {
                    tracing::warn!("could not read {}: {e}", ignore_path.display());
                    return Vec::new();
                }
            }
        }
        if !dir.pop() {
            break;
        }
    }
    Vec::new()
}

fn parse_ignore_patterns(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .flat_map(to_globs)
        .collect()
}

/// `build/` covers everything below `build`; a name without a slash matches
/// at any depth; a leading slash anchors at the root.
fn to_globs(line: &str) -> Vec<String> {
    let anchored = line.starts_with('/');
    let pattern = line.trim_start_matches('/');
    if let Some(dir) = pattern.strip_suffix('/') {
        return if anchored || dir.contains('/') {
            vec![format!("{dir}/**")]
        } else {
            vec![format!("**/{dir}/**")]
        };
    }
    if anchored || pattern.contains('/') {
        vec![pattern.to_string()]
    } else {
        vec![format!("**/{pattern}"), format!("**/{pattern}/**")]
    }
}
