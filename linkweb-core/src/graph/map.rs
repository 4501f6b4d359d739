use super::{Edges, GraphMap, LinkGraph};
use std::collections::HashMap;

/// Adjacency map backend: node URL to its weighted outgoing edges.
#[derive(Debug, Default, Clone)]
pub struct MapGraph {
    nodes: HashMap<String, Edges>,
}

impl MapGraph {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LinkGraph for MapGraph {
    fn has_node(&self, url: &str) -> bool {
        self.nodes.contains_key(url)
    }

    fn add_node(&mut self, url: &str) -> bool {
        if self.has_node(url) {
            return false;
        }
        self.nodes.insert(url.to_string(), Edges::new());
        true
    }

    fn set_edges(&mut self, url: &str, edges: &Edges) -> bool {
        if !self.has_node(url) {
            return false;
        }

        for target in edges.keys() {
            self.add_node(target);
        }
        self.nodes.insert(url.to_string(), edges.clone());

        true
    }

    fn all_nodes(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    fn as_map(&self) -> GraphMap {
        self.nodes
            .iter()
            .map(|(url, edges)| {
                let edges = edges.iter().map(|(t, w)| (t.clone(), *w)).collect();
                (url.clone(), edges)
            })
            .collect()
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.nodes.values().map(|edges| edges.len()).sum()
    }
}
