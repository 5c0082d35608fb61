//! Contract Studio
//!
//! Umbrella crate over the contract graph model (`studio-core`), contract
//! file I/O (`studio-io`) and the diagram view layer (`studio-view`).

pub use studio_core;
pub use studio_io;
pub use studio_view;
