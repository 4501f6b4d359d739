use super::{Edges, GraphMap, LinkGraph};
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, HashMap};

/// `petgraph` backend: a directed graph with URL node weights and
/// occurrence counts as edge weights.
///
/// A stable graph keeps indices valid while edges are replaced, so the
/// URL index never needs rebuilding.
#[derive(Debug, Default)]
pub struct PetGraph {
    graph: StableDiGraph<String, usize>,
    index: HashMap<String, NodeIndex>,
}

impl PetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the underlying graph for algorithms `petgraph` provides.
    fn ensure_node(&mut self, url: &str) -> NodeIndex {
        if let Some(idx) = self.index.get(url) {
            return *idx;
        }
        let idx = self.graph.add_node(url.to_string());
        self.index.insert(url.to_string(), idx);
        idx
    }
}

impl LinkGraph for PetGraph {
    fn has_node(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    fn add_node(&mut self, url: &str) -> bool {
        if self.has_node(url) {
            return false;
        }
        self.ensure_node(url);
        true
    }

    fn set_edges(&mut self, url: &str, edges: &Edges) -> bool {
        let Some(&source) = self.index.get(url) else {
            return false;
        };

        let stale: Vec<_> = self
            .graph
            .edges_directed(source, Direction::Outgoing)
            .map(|edge| edge.id())
            .collect();
        for edge in stale {
            self.graph.remove_edge(edge);
        }

        for (target, weight) in edges {
            let target = self.ensure_node(target);
            self.graph.add_edge(source, target, *weight);
        }

        true
    }

    fn all_nodes(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    fn as_map(&self) -> GraphMap {
        self.graph
            .node_indices()
            .map(|idx| {
                let edges: BTreeMap<String, usize> = self
                    .graph
                    .edges_directed(idx, Direction::Outgoing)
                    .map(|edge| (self.graph[edge.target()].clone(), *edge.weight()))
                    .collect();
                (self.graph[idx].clone(), edges)
            })
            .collect()
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
