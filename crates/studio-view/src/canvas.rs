//! In-memory rendering target
//!
//! Records everything the graph core asks of a renderer and lays nodes out
//! on a fixed grid. Selection changes are echoed back as queued
//! [`SelectionEvent`]s, the way a diagram engine confirms them.

use crate::render::{
    DiagramLinkKey, DiagramNode, DiagramNodeKey, NodeGeometry, RenderTarget, SelectionEvent,
    ViewGeometry, ViewOffset,
};
use std::collections::{HashMap, HashSet, VecDeque};

const COLUMNS: usize = 8;
const CELL_WIDTH: f64 = 200.0;
const CELL_HEIGHT: f64 = 120.0;
const NODE_WIDTH: f64 = 160.0;
const NODE_HEIGHT: f64 = 80.0;

/// Counters of renderer calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasStats {
    pub nodes_added: usize,
    pub nodes_removed: usize,
    pub links_added: usize,
    pub links_removed: usize,
}

#[derive(Debug, Clone)]
pub struct MemoryCanvas {
    nodes: HashMap<DiagramNodeKey, DiagramNode>,
    links: HashSet<DiagramLinkKey>,
    geometry: HashMap<DiagramNodeKey, NodeGeometry>,
    selected: HashSet<DiagramNodeKey>,
    view: ViewGeometry,
    zoom: f64,
    offset: ViewOffset,
    events: VecDeque<SelectionEvent>,
    placed: usize,
    stats: CanvasStats,
}

impl Default for MemoryCanvas {
    fn default() -> Self {
        Self::new(ViewGeometry {
            visible_width: 1200.0,
            visible_height: 800.0,
            left: 0.0,
            top: 0.0,
        })
    }
}

impl MemoryCanvas {
    pub fn new(view: ViewGeometry) -> Self {
        Self {
            nodes: HashMap::new(),
            links: HashSet::new(),
            geometry: HashMap::new(),
            selected: HashSet::new(),
            view,
            zoom: 100.0,
            offset: ViewOffset::default(),
            events: VecDeque::new(),
            placed: 0,
            stats: CanvasStats::default(),
        }
    }

    pub fn node(&self, key: &DiagramNodeKey) -> Option<&DiagramNode> {
        self.nodes.get(key)
    }

    pub fn contains_node(&self, key: &DiagramNodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn contains_link(&self, key: &DiagramLinkKey) -> bool {
        self.links.contains(key)
    }

    pub fn node_keys(&self) -> impl Iterator<Item = &DiagramNodeKey> {
        self.nodes.keys()
    }

    pub fn link_keys(&self) -> impl Iterator<Item = &DiagramLinkKey> {
        self.links.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_selected(&self, key: &DiagramNodeKey) -> bool {
        self.selected.contains(key)
    }

    pub fn offset(&self) -> ViewOffset {
        self.offset
    }

    pub fn stats(&self) -> CanvasStats {
        self.stats
    }

    /// Move or resize a node, as a user drag or a layout pass would
    pub fn set_geometry(&mut self, key: DiagramNodeKey, geometry: NodeGeometry) {
        if self.nodes.contains_key(&key) {
            self.geometry.insert(key, geometry);
        }
    }

    /// Simulate a user click: select `key`, deselect everything else
    pub fn click(&mut self, key: DiagramNodeKey) {
        let others: Vec<DiagramNodeKey> =
            self.selected.iter().filter(|k| **k != key).copied().collect();
        for other in others {
            self.set_node_selected(&other, false);
        }
        self.set_node_selected(&key, true);
    }

    /// Drain queued selection events
    pub fn take_events(&mut self) -> Vec<SelectionEvent> {
        self.events.drain(..).collect()
    }
}

impl RenderTarget for MemoryCanvas {
    fn add_node(&mut self, node: DiagramNode) {
        self.stats.nodes_added += 1;
        if !self.geometry.contains_key(&node.key) {
            let column = self.placed % COLUMNS;
            let row = self.placed / COLUMNS;
            self.placed += 1;
            self.geometry.insert(
                node.key,
                NodeGeometry {
                    x: column as f64 * CELL_WIDTH,
                    y: row as f64 * CELL_HEIGHT,
                    width: NODE_WIDTH,
                    height: NODE_HEIGHT,
                },
            );
        }
        self.nodes.insert(node.key, node);
    }

    fn remove_node(&mut self, key: &DiagramNodeKey) {
        self.stats.nodes_removed += 1;
        self.nodes.remove(key);
        self.geometry.remove(key);
        self.selected.remove(key);
    }

    fn add_link(&mut self, link: DiagramLinkKey) {
        self.stats.links_added += 1;
        self.links.insert(link);
    }

    fn remove_link(&mut self, key: &DiagramLinkKey) {
        self.stats.links_removed += 1;
        self.links.remove(key);
    }

    fn set_node_selected(&mut self, key: &DiagramNodeKey, selected: bool) {
        if !self.nodes.contains_key(key) {
            return;
        }
        let changed = if selected {
            self.selected.insert(*key)
        } else {
            self.selected.remove(key)
        };
        if changed {
            self.events.push_back(SelectionEvent {
                node: *key,
                is_selected: selected,
            });
        }
    }

    fn node_geometry(&self, key: &DiagramNodeKey) -> Option<NodeGeometry> {
        self.geometry.get(key).copied()
    }

    fn view_geometry(&self) -> ViewGeometry {
        self.view
    }

    fn zoom_level(&self) -> f64 {
        self.zoom
    }

    fn set_zoom_level(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    fn set_offset(&mut self, offset: ViewOffset) {
        self.offset = offset;
    }
}
