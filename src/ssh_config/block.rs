//! Line-level editing of host blocks inside one config file.

use super::model::HostRecord;
use super::parser::split_directive;

const INDENT: &str = "    ";

/// Render a record as a `Host` block. Every line ends with `\n`.
pub fn serialize_block(record: &HostRecord) -> String {
    let mut lines = vec![format!("Host {}", record.name)];

    let mut push = |key: &str, value: Option<String>| {
        if let Some(value) = value {
            lines.push(format!("{INDENT}{key} {value}"));
        }
    };
    push("HostName", record.hostname.clone());
    push("User", record.user.clone());
    push("Port", record.port.map(|port| port.to_string()));
    push("IdentityFile", record.identity_file.clone());
    push("ProxyCommand", record.proxy_command.clone());

    for (key, value) in &record.extra_directives {
        lines.push(format!("{INDENT}{key} {value}"));
    }
    if let Some(proxy) = &record.proxy_via {
        lines.push(format!("{INDENT}ProxyJump {proxy}"));
    }

    let mut block = lines.join("\n");
    block.push('\n');
    block
}

pub(super) fn host_line_name(line: &str) -> Option<&str> {
    match split_directive(line.trim()) {
        Some((keyword, value)) if keyword == "host" => Some(value),
        _ => None,
    }
}

pub(super) fn is_include_line(line: &str) -> bool {
    matches!(split_directive(line.trim()), Some((keyword, _)) if keyword == "include")
}

fn is_match_line(line: &str) -> bool {
    matches!(split_directive(line.trim()), Some((keyword, _)) if keyword == "match")
}

fn is_section_end(line: &str) -> bool {
    host_line_name(line).is_some() || is_include_line(line) || is_match_line(line)
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

pub(super) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Line ranges `[start, end)` of every block named `name`. A block runs from its
/// `Host` line up to the next `Host`, `Match` or `Include` line, or the end of
/// the file. Blank and comment lines right before such a line belong to what follows.
fn block_ranges(lines: &[&str], name: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        if host_line_name(lines[index]) != Some(name) {
            index += 1;
            continue;
        }

        let start = index;
        index += 1;
        while index < lines.len() && !is_section_end(lines[index]) {
            index += 1;
        }

        let mut end = index;
        if end < lines.len() {
            while end > start + 1 && (is_blank(lines[end - 1]) || is_comment(lines[end - 1])) {
                end -= 1;
            }
        }
        ranges.push((start, end));
    }

    ranges
}

/// Content with every block named `name` deleted, or `None` when there is none.
///
/// When the deletion leaves two blank separators next to each other, or a
/// blank line at the start or end of the file, one blank line is dropped.
pub(super) fn remove_blocks(content: &str, name: &str) -> Option<String> {
    let mut lines: Vec<&str> = content.split_inclusive('\n').collect();
    let ranges = block_ranges(&lines, name);
    if ranges.is_empty() {
        return None;
    }

    for (start, end) in ranges.into_iter().rev() {
        lines.drain(start..end);

        let before_blank = start > 0 && is_blank(lines[start - 1]);
        let after_blank = start < lines.len() && is_blank(lines[start]);
        if after_blank && (before_blank || start == 0) {
            lines.remove(start);
        } else if before_blank && start == lines.len() {
            lines.remove(start - 1);
        }
    }

    Some(lines.concat())
}

/// Append a serialized block after exactly one blank separator line.
pub(super) fn append_block(content: &str, block: &str) -> String {
    let mut lines: Vec<&str> = content.split_inclusive('\n').collect();
    while lines.last().is_some_and(|line| is_blank(line)) {
        lines.pop();
    }
    if lines.is_empty() {
        return block.to_string();
    }

    let mut updated = lines.concat();
    if !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push('\n');
    updated.push_str(block);
    updated
}

#[cfg(test)]
#[path = "../test/ssh_config/block.rs"]
mod tests;
