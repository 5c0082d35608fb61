//! Global selection store boundary

use studio_core::{EntityId, SelectedEntity};

/// The application's global state, as far as selection is concerned
pub trait SelectionStore {
    /// Entity the application wants shown as selected
    fn desired(&self) -> SelectedEntity;

    /// Record a selection observed in the diagram
    fn dispatch(&mut self, selection: SelectedEntity);
}

/// Store holding the selection in memory
///
/// Stands in for the application store in headless tools and tests; keeps a
/// log of every dispatch.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    desired: SelectedEntity,
    dispatched: Vec<SelectedEntity>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the desired selection without going through dispatch
    pub fn request(&mut self, entity: impl Into<EntityId>) {
        self.desired = Some(entity.into());
    }

    pub fn clear(&mut self) {
        self.desired = None;
    }

    pub fn dispatched(&self) -> &[SelectedEntity] {
        &self.dispatched
    }
}

impl SelectionStore for MemoryStore {
    fn desired(&self) -> SelectedEntity {
        self.desired
    }

    fn dispatch(&mut self, selection: SelectedEntity) {
        self.dispatched.push(selection);
        self.desired = selection;
    }
}
