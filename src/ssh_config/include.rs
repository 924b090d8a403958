//! Maintenance of the `Include` directive that pulls per-project host files into the main file.

use super::ConfigTree;
use super::block::{is_blank, is_include_line};
use super::parser::split_directive;
use std::path::Path;

const PROJECT_GLOB: &str = "*/*";

/// Pattern written into the main file: relative to the main file's directory
/// when the include directory lives under it, absolute otherwise.
pub(super) fn include_pattern(tree: &ConfigTree) -> String {
    let base = tree.main_file().parent().unwrap_or(Path::new(""));
    match tree.include_dir().strip_prefix(base) {
        Ok(relative) if !relative.as_os_str().is_empty() => join_glob(&relative.to_string_lossy()),
        _ => join_glob(&tree.include_dir().to_string_lossy()),
    }
}

/// Every spelling of the pattern that counts as the directive already being present.
fn pattern_spellings(tree: &ConfigTree, home: Option<&Path>) -> Vec<String> {
    let mut spellings = vec![include_pattern(tree), join_glob(&tree.include_dir().to_string_lossy())];
    if let Some(home) = home
        && let Ok(relative) = tree.include_dir().strip_prefix(home)
    {
        spellings.push(join_glob(&format!("~/{}", relative.to_string_lossy())));
    }
    spellings.dedup();
    spellings
}

fn join_glob(dir: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), PROJECT_GLOB)
}

/// Content of the main file with exactly one matching `Include` line, or `None`
/// when it already has exactly one.
///
/// The first matching line is kept, later copies are dropped. When none exists
/// the directive is inserted as the first line.
pub(super) fn normalize_include(content: &str, tree: &ConfigTree, home: Option<&Path>) -> Option<String> {
    let spellings = pattern_spellings(tree, home);
    let matches_tree = |line: &str| -> bool {
        is_include_line(line)
            && split_directive(line.trim()).is_some_and(|(_, value)| spellings.iter().any(|spelling| spelling == value))
    };

    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let matching = lines.iter().filter(|line| matches_tree(**line)).count();

    match matching {
        1 => None,
        0 => {
            let mut updated = format!("Include {}\n", include_pattern(tree));
            if lines.first().is_some_and(|line| !is_blank(line)) {
                updated.push('\n');
            }
            updated.push_str(content);
            Some(updated)
        }
        _ => {
            let mut seen = false;
            let kept: Vec<&str> = lines
                .into_iter()
                .filter(|line| {
                    if !matches_tree(*line) {
                        return true;
                    }
                    !std::mem::replace(&mut seen, true)
                })
                .collect();
            Some(kept.concat())
        }
    }
}

#[cfg(test)]
#[path = "../test/ssh_config/include.rs"]
mod tests;
