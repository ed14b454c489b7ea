//! Statistics over a crawled tree
//!
//! This module provides functionality for summarising and displaying
//! the shape of a crawl.

use crate::tree::AssignmentTree;
use crate::ErrorKind;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct TreeStatistics {
    /// Total number of nodes, root included
    pub total_nodes: usize,

    /// Nodes without children
    pub leaves: usize,

    /// Depth of the deepest node
    pub height: u32,

    /// Node count per depth (root at 0)
    pub nodes_by_depth: BTreeMap<u32, usize>,

    /// Nodes carrying tooltip dates
    pub dated_nodes: usize,

    /// Skipped pages by error kind
    pub failures_by_kind: HashMap<ErrorKind, usize>,

    /// Wall-clock duration of the crawl, if measured
    pub elapsed: Option<Duration>,
}

/// Computes statistics for a tree
///
/// # Arguments
///
/// * `tree` - The crawled tree
/// * `elapsed` - How long the crawl took, if the caller measured it
pub fn collect_statistics(tree: &AssignmentTree, elapsed: Option<Duration>) -> TreeStatistics {
    let mut nodes_by_depth = BTreeMap::new();
    let mut leaves = 0;
    let mut dated_nodes = 0;

    for (_, node) in tree.iter() {
        *nodes_by_depth.entry(node.depth()).or_insert(0) += 1;
        if node.is_leaf() {
            leaves += 1;
        }
        if node.dates.is_some() {
            dated_nodes += 1;
        }
    }

    let mut failures_by_kind = HashMap::new();
    for failure in tree.failures() {
        *failures_by_kind.entry(failure.kind).or_insert(0) += 1;
    }

    TreeStatistics {
        total_nodes: tree.len(),
        leaves,
        height: tree.height(),
        nodes_by_depth,
        dated_nodes,
        failures_by_kind,
        elapsed,
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &TreeStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Total nodes: {}", stats.total_nodes);
    println!("  Leaves: {}", stats.leaves);
    println!("  Height: {}", stats.height);
    if stats.dated_nodes > 0 {
        println!("  Nodes with dates: {}", stats.dated_nodes);
    }
    if let Some(elapsed) = stats.elapsed {
        let rate = if elapsed.as_secs_f64() > 0.0 {
            stats.total_nodes as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        println!("  Elapsed: {:.2?} ({:.2} nodes/sec)", elapsed, rate);
    }
    println!();

    println!("Nodes by Depth:");
    for (depth, count) in &stats.nodes_by_depth {
        println!("  {}: {}", depth, count);
    }
    println!();

    if !stats.failures_by_kind.is_empty() {
        println!("Skipped Pages:");
        let mut failure_counts: Vec<_> = stats.failures_by_kind.iter().collect();
        failure_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (kind, count) in failure_counts {
            println!("  {:?}: {}", kind, count);
        }
        println!();
    }
}
