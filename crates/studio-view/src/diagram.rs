//! Routing renderer selection events back into the graph and the store

use crate::model_manager::ModelManager;
use crate::render::SelectionEvent;
use crate::store::SelectionStore;
use studio_core::ContractGraph;

/// Apply a selection event from the renderer
///
/// Events for nodes of graphs other than `graph`, or of graphs no longer
/// loaded, are dropped. Otherwise the node's flag follows the event and a
/// selection is dispatched to the store. Deselections are not dispatched;
/// clearing the store is the application's call. Returns whether the event
/// was applied.
pub fn route_selection_event<S: SelectionStore>(
    graph: &mut ContractGraph,
    manager: &ModelManager,
    event: &SelectionEvent,
    store: &mut S,
) -> bool {
    if event.node.graph != graph.id() || !manager.owns(&event.node) {
        log::debug!("Dropping selection event for {}", event.node.graph);
        return false;
    }
    let Some(node) = graph.resolve_entity(&event.node.entity) else {
        return false;
    };

    graph.set_selected(node, event.is_selected);
    if event.is_selected {
        store.dispatch(graph.entity_of(node));
    }
    true
}
