//! Assignment tree: storage, crawl and annotation
//!
//! # Components
//!
//! - `AssignmentTree`: arena of nodes addressed by `NodeId`
//! - `TreeBuilder`: depth-bounded crawl that fills the tree through a session
//! - `DiscoveryEvent`: per-node notification for progressive display
//! - `attach_dates`: optional pass adding tooltip dates to crawled nodes

mod annotate;
mod builder;
mod events;
mod node;

pub use annotate::attach_dates;
pub use builder::{FailurePolicy, TreeBuilder};
pub use events::DiscoveryEvent;
pub use node::{AssignmentNode, AssignmentTree, CrawlFailure, NodeId};
