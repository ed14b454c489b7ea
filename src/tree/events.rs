use crate::tree::NodeId;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Emitted every time the builder links a node into the tree
///
/// Sent over an unbounded channel so a display layer can render the crawl
/// while it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryEvent {
    pub node: NodeId,
    pub name: String,
    pub url: Url,

    /// Depth of the new node (root children are at 1)
    pub depth: u32,

    /// Time since the build started
    pub elapsed: Duration,
}

impl fmt::Display for DiscoveryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:?}", self.name, self.url, self.elapsed)
    }
}
