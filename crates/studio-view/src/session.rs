//! Studio session
//!
//! Wires the contract source, the broadcast feed, the diagram and the
//! selection store together:
//!
//! - new contract data goes through the cache, which swaps the diagram
//!   contents when the version counter moves
//! - broadcast confirmations grow readiness and refresh node displays
//! - diagram selection events update the graph and the store
//! - after each of these the diagram selection is reconciled with the store

use crate::cache::{CachedContract, ContractCache};
use crate::config::ViewConfig;
use crate::diagram::route_selection_event;
use crate::input_detail::{transaction_detail, TransactionDetail};
use crate::model_manager::ModelManager;
use crate::render::{RenderTarget, SelectionEvent};
use crate::selection::{Reconciliation, SelectionSynchronizer, SyncState};
use crate::store::SelectionStore;
use crate::summary::{compute_graph_summary, GraphSummary};
use bitcoin::Txid;
use studio_core::{GraphId, ProgramDescription, Readiness, Result};

pub struct StudioSession<R: RenderTarget, S: SelectionStore> {
    target: R,
    store: S,
    config: ViewConfig,
    cache: ContractCache,
    manager: ModelManager,
    sync: SelectionSynchronizer,
}

impl<R: RenderTarget, S: SelectionStore> StudioSession<R, S> {
    pub fn new(target: R, store: S, config: ViewConfig) -> Self {
        Self {
            target,
            store,
            config,
            cache: ContractCache::new(),
            manager: ModelManager::new(),
            sync: SelectionSynchronizer::new(),
        }
    }

    /// Handle a (possibly unchanged) contract from the source
    ///
    /// Returns the id of the graph on display afterwards.
    pub fn on_contract_data(
        &mut self,
        data: Option<&ProgramDescription>,
        counter: u64,
    ) -> Result<GraphId> {
        let previous = self.cache.current().map(|c| c.graph().id());
        let current = self
            .cache
            .load_new_contract(data, counter, &mut self.manager, &mut self.target)?
            .graph()
            .id();

        if previous != Some(current) {
            log::info!("Now showing {}", current);
            self.sync.reset();
        }
        self.reconcile_selection();
        Ok(current)
    }

    /// Take the current contract off the diagram
    pub fn close_contract(&mut self) {
        self.cache.clear(&mut self.manager, &mut self.target);
        self.sync.reset();
    }

    /// Record a broadcast confirmation
    ///
    /// Returns `None` if no contract is loaded.
    pub fn on_broadcast_confirmed(&mut self, txid: Txid) -> Option<&Readiness> {
        let contract = self.cache.current_mut()?;
        contract.confirm(txid);
        log::info!(
            "{} confirmed, {} broadcastable",
            txid,
            contract.readiness().broadcastable().len()
        );
        self.manager.refresh(contract.graph(), &mut self.target);
        Some(contract.readiness())
    }

    /// Apply a selection event reported by the diagram
    pub fn on_diagram_selection(&mut self, event: &SelectionEvent) -> bool {
        let Some(contract) = self.cache.current_mut() else {
            return false;
        };
        let applied =
            route_selection_event(contract.graph_mut(), &self.manager, event, &mut self.store);
        if applied {
            self.reconcile_selection();
        }
        applied
    }

    /// Bring the diagram selection in line with the store
    pub fn reconcile_selection(&mut self) -> Reconciliation {
        let desired = self.store.desired();
        match self.cache.current_mut() {
            Some(contract) => self.sync.reconcile(
                contract.graph_mut(),
                desired,
                &mut self.target,
                &self.config,
            ),
            None => Reconciliation::Unchanged,
        }
    }

    pub fn summary(&self) -> Option<GraphSummary> {
        self.contract()
            .map(|c| compute_graph_summary(c.graph(), c.readiness()))
    }

    pub fn transaction_detail(&self, txid: &Txid) -> Option<TransactionDetail> {
        self.contract().and_then(|c| transaction_detail(c.graph(), txid))
    }

    pub fn contract(&self) -> Option<&CachedContract> {
        self.cache.current()
    }

    pub fn sync_state(&self) -> SyncState {
        self.sync.state()
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut R {
        &mut self.target
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
