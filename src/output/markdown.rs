//! Markdown rendering of the assignment tree
//!
//! Produces a nested bullet list of links, followed by a section listing
//! any pages skipped during the crawl.

use crate::extract::calendar_date;
use crate::tree::AssignmentTree;
use crate::ThemisError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown rendering of the tree to a file
///
/// # Arguments
///
/// * `tree` - The crawled tree
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the file
/// * `Err(ThemisError::Io)` - Failed to create or write the file
pub fn write_markdown_tree(tree: &AssignmentTree, output_path: &Path) -> Result<(), ThemisError> {
    let markdown = format_markdown_tree(tree);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats the tree as markdown
pub fn format_markdown_tree(tree: &AssignmentTree) -> String {
    let mut md = String::new();

    let Some(root) = tree.get(tree.root()) else {
        return md;
    };

    // Title
    md.push_str(&format!("# {}\n\n", escape(&root.name)));
    md.push_str(&format!("Source: <{}>\n\n", root.url));

    for id in tree.pre_order().into_iter().skip(1) {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let indent = "  ".repeat(node.depth().saturating_sub(1) as usize);
        md.push_str(&format!("{}- [{}]({})", indent, escape(&node.name), node.url));

        if let Some(dates) = &node.dates {
            md.push_str(&format!(
                " (start {}, deadline {}, end {})",
                calendar_date(&dates.start),
                calendar_date(&dates.due),
                calendar_date(&dates.end)
            ));
        }
        md.push('\n');
    }

    if !tree.failures().is_empty() {
        md.push_str("\n## Skipped Pages\n\n");
        for failure in tree.failures() {
            match failure.status {
                Some(status) => md.push_str(&format!("- <{}> (HTTP {})\n", failure.url, status)),
                None => md.push_str(&format!("- <{}>: {}\n", failure.url, failure.message)),
            }
        }
    }

    md
}

/// Escapes characters that would break link text
fn escape(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}
