//! Contract Studio View Library
//!
//! Everything between a contract graph and the diagram that shows it.
//!
//! This library provides:
//! - The rendering target and selection store boundaries, with in-memory
//!   implementations
//! - Loading and unloading graphs into the diagram
//! - A memoized graph cache keyed by a version counter
//! - Selection synchronization and recentering
//! - Display models: node displays, transaction details, summaries
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use studio_view::{MemoryCanvas, MemoryStore, StudioSession, ViewConfig};
//!
//! let mut session = StudioSession::new(MemoryCanvas::default(), MemoryStore::new(), ViewConfig::default());
//! session.on_contract_data(Some(&program), 1)?;
//! session.store_mut().request(txid);
//! session.reconcile_selection();
//! ```

pub mod cache;
pub mod canvas;
pub mod config;
pub mod diagram;
pub mod display_adapter;
pub mod display_formatting;
pub mod input_detail;
pub mod model_manager;
pub mod render;
pub mod selection;
pub mod session;
pub mod store;
pub mod summary;
pub mod viewport;

// Re-export commonly used types
pub use cache::{CachedContract, ContractCache};
pub use canvas::MemoryCanvas;
pub use config::ViewConfig;
pub use model_manager::ModelManager;
pub use render::{
    DiagramLinkKey, DiagramNode, DiagramNodeKey, NodeGeometry, RenderTarget, SelectionEvent,
    ViewGeometry, ViewOffset,
};
pub use selection::{Reconciliation, SelectionSynchronizer, SyncState};
pub use session::StudioSession;
pub use store::{MemoryStore, SelectionStore};
pub use summary::GraphSummary;
