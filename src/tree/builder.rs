//! Depth-bounded crawl of the assignment hierarchy
//!
//! # Crawl Order
//!
//! The crawl is depth-first and sequential, one request at a time:
//!
//! 1. Fetch the node's page and extract its listing
//! 2. Link every entry as a child, in listing order, emitting one event each
//! 3. If depth remains, descend into the children one by one
//!
//! A node whose listing is empty is a leaf. With `max_depth = 0` only the
//! start page is fetched and the tree holds the root and its direct children.

use crate::config::CrawlerConfig;
use crate::extract::ListingPattern;
use crate::session::{fetch_listing, Session};
use crate::tree::{AssignmentTree, DiscoveryEvent, NodeId};
use crate::ThemisError;
use serde::Deserialize;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;
use url::Url;

/// What the builder does when a page below the root cannot be crawled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop the whole build and return the error
    #[default]
    Abort,

    /// Keep the failing node as a leaf, record the failure, carry on
    SkipBranch,
}

/// Crawls a listing hierarchy through an authenticated session
pub struct TreeBuilder<'a> {
    session: &'a Session,
    max_depth: u32,
    on_error: FailurePolicy,
    root_pattern: ListingPattern,
    events: Option<UnboundedSender<DiscoveryEvent>>,
}

impl<'a> TreeBuilder<'a> {
    /// Creates a builder that fetches only the start page
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            max_depth: 0,
            on_error: FailurePolicy::Abort,
            root_pattern: ListingPattern::Children,
            events: None,
        }
    }

    /// Creates a builder using the crawler configuration
    pub fn from_config(session: &'a Session, config: &CrawlerConfig) -> Self {
        Self::new(session)
            .max_depth(config.max_depth)
            .on_error(config.on_error)
            .root_pattern(config.root_pattern)
    }

    /// Listing levels to expand below the start page's children
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn on_error(mut self, policy: FailurePolicy) -> Self {
        self.on_error = policy;
        self
    }

    /// Row layout of the start page; every deeper page uses `Children`
    pub fn root_pattern(mut self, pattern: ListingPattern) -> Self {
        self.root_pattern = pattern;
        self
    }

    /// Sends a [`DiscoveryEvent`] for every linked node
    ///
    /// A dropped receiver does not stop the crawl.
    pub fn events(mut self, sender: UnboundedSender<DiscoveryEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Crawls from `root_url` and returns the resulting tree
    ///
    /// # Returns
    ///
    /// * `Ok(AssignmentTree)` - Crawl finished; under `SkipBranch` the tree
    ///   lists the pages that failed
    /// * `Err(ThemisError)` - The start page failed, or any page failed
    ///   under `Abort`; the error names the failing URL
    pub async fn build(
        &self,
        root_name: &str,
        root_url: Url,
    ) -> Result<AssignmentTree, ThemisError> {
        let started = Instant::now();
        let mut tree = AssignmentTree::new(root_name, root_url);

        tracing::info!(
            "Building tree from {} (max depth {})",
            tree.get(tree.root()).map(|n| n.url.as_str()).unwrap_or(""),
            self.max_depth
        );

        // Pending pages: (node, remaining depth, row layout). Children are
        // pushed in reverse so they pop in listing order.
        let mut pending: Vec<(NodeId, u32, ListingPattern)> =
            vec![(tree.root(), self.max_depth, self.root_pattern)];

        while let Some((node, remaining, pattern)) = pending.pop() {
            let Some(url) = tree.get(node).map(|n| n.url.clone()) else {
                continue;
            };

            let entries = match fetch_listing(self.session, &url, pattern).await {
                Ok(entries) => entries,
                Err(e) if node == tree.root() || self.on_error == FailurePolicy::Abort => {
                    tracing::warn!("Crawl aborted at {}: {}", url, e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!("Skipping branch at {}: {}", url, e);
                    tree.record_failure(node, &e);
                    continue;
                }
            };

            if entries.is_empty() {
                tracing::debug!("Leaf: {}", url);
                continue;
            }

            let mut children = Vec::with_capacity(entries.len());
            for entry in entries {
                let Some(child) = tree.append_child(node, entry.name, entry.url) else {
                    continue;
                };
                self.emit(&tree, child, started);
                children.push(child);
            }

            if remaining > 0 {
                pending.extend(
                    children
                        .into_iter()
                        .rev()
                        .map(|child| (child, remaining - 1, ListingPattern::Children)),
                );
            }
        }

        tracing::info!(
            "Tree complete: {} nodes, {} skipped pages, {:.2?}",
            tree.len(),
            tree.failures().len(),
            started.elapsed()
        );

        Ok(tree)
    }

    fn emit(&self, tree: &AssignmentTree, id: NodeId, started: Instant) {
        let Some(node) = tree.get(id) else {
            return;
        };

        tracing::debug!("Linked '{}' at depth {}", node.name, node.depth());

        if let Some(sender) = &self.events {
            let _ = sender.send(DiscoveryEvent {
                node: id,
                name: node.name.clone(),
                url: node.url.clone(),
                depth: node.depth(),
                elapsed: started.elapsed(),
            });
        }
    }
}
