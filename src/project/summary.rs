//! Compact text digests of the project tree and of a single file
//!
//! Both digests are cheap heuristics for prompt context. "Important" lines are
//! found by substring match, so keywords inside comments or strings count too.

use super::rules::{extension_of, ScanRules};
use super::{DirectoryEntry, Node};

pub const PROJECT_HEADER: &str = "Project Structure Summary:";

/// Maximum number of important lines kept from the current file
pub const MAX_IMPORTANT_LINES: usize = 15;

const IMPORTANT_MARKERS: [&str; 5] = ["class ", "function ", "interface ", "export ", "import "];

/// Names hidden from the summary even when the scan kept them
const HIDDEN_NAMES: [&str; 2] = ["node_modules", "dist"];

/// Render the tree as an indented outline under [`PROJECT_HEADER`].
///
/// Directories render as `+ name/`, files as `- name (ext)`, two spaces of
/// indentation per level. No length cap is applied here.
pub fn summarize_project(structure: Option<&DirectoryEntry>, rules: &ScanRules) -> String {
    let mut out = String::from(PROJECT_HEADER);
    out.push('\n');
    if let Some(root) = structure {
        render_directory(root, 0, rules, &mut out);
    }
    out
}

fn render_directory(dir: &DirectoryEntry, depth: usize, rules: &ScanRules, out: &mut String) {
    let indent = "  ".repeat(depth);

    for (name, node) in dir.iter() {
        if !is_visible(name, node, rules) {
            continue;
        }
        match node {
            Node::File(file) => {
                let kind = file.extension().trim_start_matches('.');
                out.push_str(&format!("{}- {} ({})\n", indent, name, kind));
            }
            Node::Directory(child) => {
                debug_assert!(!child.is_empty(), "scanned trees never hold empty directories");
                out.push_str(&format!("{}+ {}/\n", indent, name));
                render_directory(child, depth + 1, rules, out);
            }
        }
    }
}

fn is_visible(name: &str, node: &Node, rules: &ScanRules) -> bool {
    if name.starts_with('.') || HIDDEN_NAMES.contains(&name) {
        return false;
    }

    match node {
        Node::File(_) => extension_of(name).is_some_and(|ext| rules.supports_extension(&ext)),
        Node::Directory(_) => true,
    }
}

/// Header plus up to [`MAX_IMPORTANT_LINES`] important lines of `content`
pub fn summarize_file(file_path: &str, content: &str) -> String {
    let body = content
        .split('\n')
        .filter(|line| is_important_line(line))
        .take(MAX_IMPORTANT_LINES)
        .collect::<Vec<_>>()
        .join("\n");

    format!("Current File ({}):\n{}", file_path, body)
}

pub fn is_important_line(line: &str) -> bool {
    IMPORTANT_MARKERS.iter().any(|marker| line.contains(marker))
}
