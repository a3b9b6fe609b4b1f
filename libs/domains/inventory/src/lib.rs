//! Inventory Domain
//!
//! This module provides the complete inventory ledger for a single-store
//! pharmacy: the medication catalog, the immutable sale ledger, and the stock
//! reservation engine that keeps the two in lockstep.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Services   │  ← CatalogService + SalesService (validation, retry policy)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory store with row locks)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, derived read models
//! └─────────────┘
//! ```
//!
//! The catalog and the ledger sit behind one repository because recording a
//! sale decrements stock and appends the sale record in a single atomic step;
//! a sale exists if and only if its decrement committed.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_inventory::{
//!     handlers,
//!     memory::InMemoryInventory,
//!     service::{CatalogService, SalesService},
//! };
//!
//! // One store; clones share it
//! let store = InMemoryInventory::new();
//! let catalog = CatalogService::new(store.clone());
//! let sales = SalesService::new(store);
//!
//! // Create Axum routers
//! let medications = handlers::medications_router(catalog);
//! let sale_routes = handlers::sales_router(sales);
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{InventoryError, InventoryResult};
pub use handlers::{MedicationsApiDoc, SalesApiDoc};
pub use memory::InMemoryInventory;
pub use models::{
    CatalogSummary, CreateMedication, Medication, MedicationFilter, RecordSale, Sale,
    SaleStatistics, StockStatus, UpdateMedication,
};
pub use repository::InventoryRepository;
pub use service::{CatalogService, SalesService};
