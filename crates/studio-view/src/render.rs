//! Rendering target boundary
//!
//! The diagram engine is an external collaborator. This module defines the
//! narrow interface the graph core drives it through, and the keys that
//! name diagram nodes and links. Every key carries the [`GraphId`] of the
//! graph instance it was derived from, so removing one graph's keys can
//! never touch another's.

use crate::display_adapter::NodeDisplay;
use bitcoin::{OutPoint, Txid};
use studio_core::{EntityId, GraphId};

/// Names one diagram node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagramNodeKey {
    pub graph: GraphId,
    pub entity: EntityId,
}

impl DiagramNodeKey {
    pub fn new(graph: GraphId, entity: impl Into<EntityId>) -> Self {
        Self {
            graph,
            entity: entity.into(),
        }
    }
}

/// Kinds of diagram link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Transaction → one of its outputs
    Creates(OutPoint),
    /// Output → a transaction consuming it
    Spends { outpoint: OutPoint, spender: Txid },
}

/// Names one diagram link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagramLinkKey {
    pub graph: GraphId,
    pub kind: LinkKind,
}

impl DiagramLinkKey {
    pub fn source(&self) -> DiagramNodeKey {
        match self.kind {
            LinkKind::Creates(outpoint) => DiagramNodeKey::new(self.graph, outpoint.txid),
            LinkKind::Spends { outpoint, .. } => DiagramNodeKey::new(self.graph, outpoint),
        }
    }

    pub fn target(&self) -> DiagramNodeKey {
        match self.kind {
            LinkKind::Creates(outpoint) => DiagramNodeKey::new(self.graph, outpoint),
            LinkKind::Spends { spender, .. } => DiagramNodeKey::new(self.graph, spender),
        }
    }
}

/// A node handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    pub key: DiagramNodeKey,
    pub display: NodeDisplay,
}

/// On-canvas geometry of a node
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Visible area of the canvas and its position on screen
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewGeometry {
    pub visible_width: f64,
    pub visible_height: f64,
    pub left: f64,
    pub top: f64,
}

/// Pan offset of the diagram view
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewOffset {
    pub x: f64,
    pub y: f64,
}

/// Selection toggle reported by the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionEvent {
    pub node: DiagramNodeKey,
    pub is_selected: bool,
}

/// Diagram engine as seen from the graph core
pub trait RenderTarget {
    /// Insert a node, replacing the display of an existing node with the same key
    fn add_node(&mut self, node: DiagramNode);

    fn remove_node(&mut self, key: &DiagramNodeKey);

    fn add_link(&mut self, link: DiagramLinkKey);

    fn remove_link(&mut self, key: &DiagramLinkKey);

    /// Ask the renderer to show a node as (de)selected
    ///
    /// Renderers confirm by emitting a [`SelectionEvent`] once the node's
    /// geometry is settled.
    fn set_node_selected(&mut self, key: &DiagramNodeKey, selected: bool);

    fn node_geometry(&self, key: &DiagramNodeKey) -> Option<NodeGeometry>;

    fn view_geometry(&self) -> ViewGeometry;

    /// Current zoom, in percent
    fn zoom_level(&self) -> f64;

    fn set_zoom_level(&mut self, zoom: f64);

    fn set_offset(&mut self, offset: ViewOffset);
}
