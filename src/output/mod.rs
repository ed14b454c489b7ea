//! Output module for presenting crawl results
//!
//! This module handles:
//! - Rendering the assignment tree as indented text
//! - Writing the tree as a markdown document
//! - Computing and printing crawl statistics

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_tree, write_markdown_tree};
pub use stats::{collect_statistics, print_statistics, TreeStatistics};

use crate::extract::{calendar_date, UserProfile};
use crate::tree::AssignmentTree;

/// Renders the tree as indented text, one node per line
///
/// # Example
///
/// ```
/// use themis_crawler::output::render_tree;
/// use themis_crawler::tree::AssignmentTree;
/// use url::Url;
///
/// let mut tree = AssignmentTree::new("Courses", Url::parse("https://t.test/course").unwrap());
/// let root = tree.root();
/// tree.append_child(root, "ADS", Url::parse("https://t.test/course/ads").unwrap());
/// assert_eq!(render_tree(&tree), "Courses\n  ADS\n");
/// ```
pub fn render_tree(tree: &AssignmentTree) -> String {
    let mut out = String::new();

    for id in tree.pre_order() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let indent = "  ".repeat(node.depth() as usize);
        out.push_str(&indent);
        out.push_str(&node.name);
        if let Some(dates) = &node.dates {
            out.push_str(&format!(" (due {})", calendar_date(&dates.due)));
        }
        out.push('\n');
    }

    out
}

/// Formats the profile as aligned key/value lines
pub fn format_profile(profile: &UserProfile) -> String {
    format!(
        "Name:        {}\nLast name:   {}\nInitials:    {}\nEmail:       {}\nFirst login: {}\nLast login:  {}\n",
        profile.full_name,
        profile.last_name,
        profile.initials,
        profile.email,
        calendar_date(&profile.first_login_at),
        calendar_date(&profile.last_login_at),
    )
}
