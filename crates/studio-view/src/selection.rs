//! Keeping the diagram selection in step with the global store
//!
//! The store says which entity should be selected; the diagram reports what
//! the user clicked. Selecting a node makes the renderer echo a selection
//! event, which comes back through the store and triggers another
//! reconciliation. The first pass only selects, the echoed pass recenters,
//! so the loop settles without suppressing events.

use crate::config::ViewConfig;
use crate::render::{DiagramNodeKey, RenderTarget, ViewOffset};
use crate::viewport::focus_node;
use studio_core::{ContractGraph, EntityId, NodeRef, SelectedEntity};

/// Synchronizer state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Idle,
    /// Selected and centered on this entity
    Tracking(EntityId),
}

/// Outcome of one reconciliation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reconciliation {
    /// Already tracking the desired entity, or nothing to clear
    Unchanged,
    /// Cleared the selection
    Deselected,
    /// Desired entity does not resolve in the graph, or has no geometry yet
    Stale,
    /// Selected the node; recentering waits for the renderer's confirmation
    Selected,
    Recentered(ViewOffset),
}

#[derive(Debug, Default)]
pub struct SelectionSynchronizer {
    state: SyncState,
}

impl SelectionSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Forget what was tracked, e.g. after the graph was replaced
    pub fn reset(&mut self) {
        self.state = SyncState::Idle;
    }

    /// Bring graph and target in line with the desired selection
    pub fn reconcile<R: RenderTarget>(
        &mut self,
        graph: &mut ContractGraph,
        desired: SelectedEntity,
        target: &mut R,
        config: &ViewConfig,
    ) -> Reconciliation {
        if let SyncState::Tracking(tracked) = self.state {
            if desired == Some(tracked) {
                return Reconciliation::Unchanged;
            }
        }

        let Some(entity) = desired else {
            self.state = SyncState::Idle;
            return if deselect_all(graph, target, None) {
                Reconciliation::Deselected
            } else {
                Reconciliation::Unchanged
            };
        };

        let Some(node) = graph.resolve_entity(&entity) else {
            log::debug!("Selection {} not in {}", entity, graph.id());
            self.state = SyncState::Idle;
            return Reconciliation::Stale;
        };
        let Some(key) = diagram_key(graph, node) else {
            self.state = SyncState::Idle;
            return Reconciliation::Stale;
        };

        if !graph.is_selected(node) {
            deselect_all(graph, target, Some(node));
            graph.set_selected(node, true);
            target.set_node_selected(&key, true);
            self.state = SyncState::Idle;
            return Reconciliation::Selected;
        }

        match focus_node(target, &key, config) {
            Some(offset) => {
                self.state = SyncState::Tracking(entity);
                Reconciliation::Recentered(offset)
            }
            None => {
                log::debug!("No geometry for {}", entity);
                self.state = SyncState::Idle;
                Reconciliation::Stale
            }
        }
    }
}

fn diagram_key(graph: &ContractGraph, node: NodeRef) -> Option<DiagramNodeKey> {
    graph
        .entity_of(node)
        .map(|entity| DiagramNodeKey::new(graph.id(), entity))
}

/// Clear every selected node except `keep`; true if anything was cleared
fn deselect_all<R: RenderTarget>(
    graph: &mut ContractGraph,
    target: &mut R,
    keep: Option<NodeRef>,
) -> bool {
    let mut cleared = false;
    for node in graph.selected_nodes() {
        if Some(node) == keep {
            continue;
        }
        if let Some(key) = diagram_key(graph, node) {
            target.set_node_selected(&key, false);
        }
        graph.set_selected(node, false);
        cleared = true;
    }
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::MemoryCanvas;
    use crate::model_manager::ModelManager;
    use bitcoin::OutPoint;
    use studio_core::fixtures;

    struct Fixture {
        graph: ContractGraph,
        canvas: MemoryCanvas,
        sync: SelectionSynchronizer,
        config: ViewConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let graph = ContractGraph::build(&fixtures::program(&fixtures::chain(2))).unwrap();
            let mut canvas = MemoryCanvas::default();
            ModelManager::new().load(&graph, &mut canvas);
            Self {
                graph,
                canvas,
                sync: SelectionSynchronizer::new(),
                config: ViewConfig::default(),
            }
        }

        fn reconcile(&mut self, desired: SelectedEntity) -> Reconciliation {
            self.sync
                .reconcile(&mut self.graph, desired, &mut self.canvas, &self.config)
        }

        fn outpoint(&self, tx: usize, vout: u32) -> OutPoint {
            let (_, node) = self.graph.transactions().nth(tx).unwrap();
            OutPoint {
                txid: node.txid(),
                vout,
            }
        }
    }

    #[test]
    fn test_select_then_recenter_then_noop() {
        let mut f = Fixture::new();
        let outpoint = f.outpoint(0, 1);
        let desired = Some(EntityId::Outpoint(outpoint));

        assert_eq!(f.reconcile(desired), Reconciliation::Selected);
        assert_eq!(f.sync.state(), SyncState::Idle);
        let events = f.canvas.take_events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_selected);

        assert!(matches!(f.reconcile(desired), Reconciliation::Recentered(_)));
        assert_eq!(f.sync.state(), SyncState::Tracking(EntityId::Outpoint(outpoint)));
        assert_eq!(f.canvas.zoom_level(), 100.0);

        assert_eq!(f.reconcile(desired), Reconciliation::Unchanged);
        assert!(f.canvas.take_events().is_empty());
    }

    #[test]
    fn test_recenter_uses_reported_geometry() {
        let mut f = Fixture::new();
        let txid = f.outpoint(1, 0).txid;
        let key = DiagramNodeKey::new(f.graph.id(), txid);
        f.canvas.set_geometry(
            key,
            crate::render::NodeGeometry {
                x: 100.0,
                y: 100.0,
                width: 200.0,
                height: 100.0,
            },
        );
        f.canvas.set_zoom_level(250.0);

        f.reconcile(Some(txid.into()));
        let outcome = f.reconcile(Some(txid.into()));

        // 1200 / 3 - 200 and 800 / 2 - 150 at zoom 100
        let Reconciliation::Recentered(offset) = outcome else {
            panic!("expected recentering, got {:?}", outcome);
        };
        assert!((offset.x - 200.0).abs() < 1e-9);
        assert!((offset.y - 250.0).abs() < 1e-9);
        assert_eq!(f.canvas.offset(), offset);
        assert_eq!(f.canvas.zoom_level(), 100.0);
    }

    #[test]
    fn test_switching_selection_deselects_previous() {
        let mut f = Fixture::new();
        let first = f.outpoint(0, 0);
        let second = f.outpoint(1, 1);

        f.reconcile(Some(first.into()));
        f.reconcile(Some(first.into()));
        f.canvas.take_events();

        assert_eq!(f.reconcile(Some(second.into())), Reconciliation::Selected);
        let events = f.canvas.take_events();
        assert_eq!(events.len(), 2);
        assert!(!events[0].is_selected);
        assert!(events[1].is_selected);
        assert_eq!(f.graph.selected_nodes().len(), 1);
    }

    #[test]
    fn test_clearing_selection() {
        let mut f = Fixture::new();
        let outpoint = f.outpoint(0, 0);

        assert_eq!(f.reconcile(None), Reconciliation::Unchanged);

        f.reconcile(Some(outpoint.into()));
        f.reconcile(Some(outpoint.into()));
        assert_eq!(f.reconcile(None), Reconciliation::Deselected);
        assert_eq!(f.sync.state(), SyncState::Idle);
        assert!(f.graph.selected_nodes().is_empty());
        assert_eq!(f.reconcile(None), Reconciliation::Unchanged);
    }

    #[test]
    fn test_unknown_entity_is_stale() {
        let mut f = Fixture::new();
        let missing = f.outpoint(0, 5);
        assert_eq!(f.reconcile(Some(missing.into())), Reconciliation::Stale);
        assert_eq!(
            f.reconcile(Some(fixtures::funding_outpoint(0).txid.into())),
            Reconciliation::Stale
        );
        assert_eq!(f.sync.state(), SyncState::Idle);
    }

    #[test]
    fn test_missing_geometry_is_stale() {
        let mut f = Fixture::new();
        let txid = f.outpoint(0, 0).txid;
        f.reconcile(Some(txid.into()));

        let mut empty = MemoryCanvas::default();
        let outcome =
            f.sync
                .reconcile(&mut f.graph, Some(txid.into()), &mut empty, &f.config);
        assert_eq!(outcome, Reconciliation::Stale);
        assert_eq!(f.sync.state(), SyncState::Idle);
    }
}
