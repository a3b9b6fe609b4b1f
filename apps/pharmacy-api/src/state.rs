//! Application state management.
//!
//! This module defines the shared application state passed to all request
//! handlers. The state contains:
//! - Configuration
//! - The in-memory inventory store

use domain_inventory::InMemoryInventory;

/// Shared application state.
///
/// This struct is cloned for each handler. Cloning is inexpensive: the store
/// is a set of Arc-backed maps, so every clone reads and writes the same
/// catalog and ledger.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// In-memory catalog, sale ledger and row-lock table
    pub inventory: InMemoryInventory,
}
