//! Loading graphs into and out of the diagram
//!
//! Tracks which graph instances currently have nodes on the rendering
//! target. Only keys tagged with a graph's own [`GraphId`] are ever removed,
//! so unloading a stale graph cannot disturb the one that replaced it.

use crate::display_adapter::{extract_diagram_links, extract_diagram_nodes};
use crate::render::{DiagramNodeKey, RenderTarget};
use std::collections::HashSet;
use studio_core::{ContractGraph, GraphId};

#[derive(Debug, Default)]
pub struct ModelManager {
    loaded: HashSet<GraphId>,
    loads: usize,
    unloads: usize,
}

impl ModelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every node and link of `graph` to the target
    ///
    /// Loading an already loaded graph is a no-op.
    pub fn load<R: RenderTarget>(&mut self, graph: &ContractGraph, target: &mut R) {
        if !self.loaded.insert(graph.id()) {
            log::debug!("{} already loaded", graph.id());
            return;
        }

        let nodes = extract_diagram_nodes(graph);
        let links = extract_diagram_links(graph);
        log::info!(
            "Loading {}: {} nodes, {} links",
            graph.id(),
            nodes.len(),
            links.len()
        );
        for node in nodes {
            target.add_node(node);
        }
        for link in links {
            target.add_link(link);
        }
        self.loads += 1;
    }

    /// Remove every node and link of `graph` from the target
    ///
    /// No-op if the graph is not loaded.
    pub fn unload<R: RenderTarget>(&mut self, graph: &ContractGraph, target: &mut R) {
        if !self.loaded.remove(&graph.id()) {
            return;
        }

        log::info!("Unloading {}", graph.id());
        for link in extract_diagram_links(graph) {
            target.remove_link(&link);
        }
        for node in extract_diagram_nodes(graph) {
            target.remove_node(&node.key);
        }
        self.unloads += 1;
    }

    /// Re-send node displays of a loaded graph after its status changed
    pub fn refresh<R: RenderTarget>(&self, graph: &ContractGraph, target: &mut R) {
        if !self.is_loaded(graph.id()) {
            return;
        }
        for node in extract_diagram_nodes(graph) {
            target.add_node(node);
        }
    }

    pub fn is_loaded(&self, graph: GraphId) -> bool {
        self.loaded.contains(&graph)
    }

    /// Whether a diagram key belongs to a currently loaded graph
    pub fn owns(&self, key: &DiagramNodeKey) -> bool {
        self.is_loaded(key.graph)
    }

    pub fn load_count(&self) -> usize {
        self.loads
    }

    pub fn unload_count(&self) -> usize {
        self.unloads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::MemoryCanvas;
    use studio_core::fixtures;

    #[test]
    fn test_load_then_unload_leaves_target_empty() {
        let graph = ContractGraph::build(&fixtures::program(&fixtures::chain(3))).unwrap();
        let mut canvas = MemoryCanvas::default();
        let mut manager = ModelManager::new();

        manager.load(&graph, &mut canvas);
        assert!(manager.is_loaded(graph.id()));
        assert_eq!(canvas.node_count(), 9);
        assert_eq!(canvas.link_count(), 8);

        manager.unload(&graph, &mut canvas);
        assert!(!manager.is_loaded(graph.id()));
        assert_eq!(canvas.node_count(), 0);
        assert_eq!(canvas.link_count(), 0);
    }

    #[test]
    fn test_unload_is_noop_when_not_loaded() {
        let graph = ContractGraph::build(&fixtures::program(&fixtures::chain(2))).unwrap();
        let mut canvas = MemoryCanvas::default();
        let mut manager = ModelManager::new();

        manager.unload(&graph, &mut canvas);
        manager.load(&graph, &mut canvas);
        manager.unload(&graph, &mut canvas);
        manager.unload(&graph, &mut canvas);

        assert_eq!(manager.unload_count(), 1);
        assert_eq!(canvas.stats().nodes_removed, 6);
    }

    #[test]
    fn test_unload_only_touches_own_graph() {
        let txs = fixtures::chain(2);
        let first = ContractGraph::build(&fixtures::program(&txs)).unwrap();
        let second = ContractGraph::build(&fixtures::program(&txs)).unwrap();
        let mut canvas = MemoryCanvas::default();
        let mut manager = ModelManager::new();

        manager.load(&first, &mut canvas);
        manager.load(&second, &mut canvas);
        manager.unload(&first, &mut canvas);

        assert_eq!(canvas.node_count(), 6);
        assert!(canvas.node_keys().all(|k| k.graph == second.id()));
    }

    #[test]
    fn test_double_load_adds_once() {
        let graph = ContractGraph::build(&fixtures::program(&fixtures::chain(1))).unwrap();
        let mut canvas = MemoryCanvas::default();
        let mut manager = ModelManager::new();

        manager.load(&graph, &mut canvas);
        manager.load(&graph, &mut canvas);
        assert_eq!(manager.load_count(), 1);
        assert_eq!(canvas.stats().nodes_added, 3);
    }
}
