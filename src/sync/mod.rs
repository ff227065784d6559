//! Background catalog synchronization
//!
//! ```text
//! SyncCoordinator ──► Paginator ──► CatalogSource (per page)
//!        │                 │
//!        │                 └─ progress ──► SyncState::update_progress
//!        └─ dedupe ──► SyncState::set_boats
//! ```
//!
//! Readers only ever touch [`SyncState`]; the coordinator is the single
//! writer and runs at most one sync at a time.

pub mod coordinator;
pub mod state;

pub use coordinator::{SyncCoordinator, SyncHandle, SyncReport};
pub use state::SyncState;
