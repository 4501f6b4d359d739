//! Storage for the weighted link graph built during a crawl.
//!
//! Nodes are normalized URLs. An edge runs from a visited page to each
//! distinct target it links to, weighted by how many times the target
//! appeared on that page.

mod map;
mod stable;

pub use map::MapGraph;
pub use stable::PetGraph;

use std::collections::{BTreeMap, HashMap};

/// Outgoing edges of one page: target URL to occurrence count.
pub type Edges = HashMap<String, usize>;

/// Full structural dump, ordered for stable output and comparisons.
pub type GraphMap = BTreeMap<String, BTreeMap<String, usize>>;

pub trait LinkGraph: Send + Sync {
    fn has_node(&self, url: &str) -> bool;

    /// Insert `url` with no edges. Returns `false` if it was already present.
    fn add_node(&mut self, url: &str) -> bool;

    /// Replace the outgoing edges of `url`, creating any missing targets.
    ///
    /// Returns `false` without mutating anything when `url` is not a node.
    fn set_edges(&mut self, url: &str, edges: &Edges) -> bool;

    /// Every known node, visited or only referenced. Order is unspecified.
    fn all_nodes(&self) -> Vec<String>;

    fn as_map(&self) -> GraphMap;

    fn node_count(&self) -> usize {
        self.all_nodes().len()
    }

    fn edge_count(&self) -> usize {
        self.as_map().values().map(|edges| edges.len()).sum()
    }
}
