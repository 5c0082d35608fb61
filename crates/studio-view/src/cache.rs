//! Memoized contract graph
//!
//! Rebuilds the graph only when the source's version counter moves. A
//! rebuild unloads the previous graph from the diagram before the new one
//! is loaded, so at most one graph is ever on the rendering target.

use crate::model_manager::ModelManager;
use crate::render::RenderTarget;
use bitcoin::Txid;
use std::collections::BTreeSet;
use studio_core::{
    extend_with_confirmed, update_broadcastable, ContractGraph, ProgramDescription, Readiness,
    Result,
};

/// The graph currently on display and what it was built from
#[derive(Debug)]
pub struct CachedContract {
    graph: ContractGraph,
    readiness: Readiness,
    counter: u64,
}

impl CachedContract {
    pub fn graph(&self) -> &ContractGraph {
        &self.graph
    }

    /// Mutable access for selection flags; topology stays immutable
    pub fn graph_mut(&mut self) -> &mut ContractGraph {
        &mut self.graph
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    /// Version counter of the source this graph was built from
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Record that `txid` was broadcast and grow readiness accordingly
    pub fn confirm(&mut self, txid: Txid) -> &Readiness {
        self.readiness = extend_with_confirmed(&mut self.graph, &self.readiness, txid);
        &self.readiness
    }
}

#[derive(Debug, Default)]
pub struct ContractCache {
    memo: Option<CachedContract>,
}

impl ContractCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the graph for `(data, counter)`, rebuilding only when needed
    ///
    /// A non-null `data` with the counter of the cached graph returns the
    /// cached graph untouched. Anything else builds a new graph (from an
    /// empty program when `data` is `None`), runs readiness with nothing
    /// confirmed, unloads the old graph and loads the new one. If the build
    /// fails the previous graph stays cached and loaded.
    pub fn load_new_contract<R: RenderTarget>(
        &mut self,
        data: Option<&ProgramDescription>,
        counter: u64,
        manager: &mut ModelManager,
        target: &mut R,
    ) -> Result<&mut CachedContract> {
        let memo = match self.memo.take() {
            Some(memo) if data.is_some() && memo.counter == counter => memo,
            previous => {
                let empty = ProgramDescription::empty();
                let program = data.unwrap_or(&empty);

                let mut graph = match ContractGraph::build(program) {
                    Ok(graph) => graph,
                    Err(err) => {
                        log::warn!("Keeping previous contract, rebuild failed: {}", err);
                        self.memo = previous;
                        return Err(err);
                    }
                };
                let readiness = update_broadcastable(&mut graph, &BTreeSet::new());

                if let Some(old) = previous {
                    manager.unload(&old.graph, target);
                }
                manager.load(&graph, target);
                log::debug!("Built {} for counter {}", graph.id(), counter);

                CachedContract {
                    graph,
                    readiness,
                    counter,
                }
            }
        };

        Ok(self.memo.insert(memo))
    }

    pub fn current(&self) -> Option<&CachedContract> {
        self.memo.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut CachedContract> {
        self.memo.as_mut()
    }

    /// Unload and forget the cached graph
    pub fn clear<R: RenderTarget>(&mut self, manager: &mut ModelManager, target: &mut R) {
        if let Some(old) = self.memo.take() {
            manager.unload(&old.graph, target);
        }
    }
}
