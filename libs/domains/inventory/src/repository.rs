use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::InventoryResult;
use crate::models::{CreateMedication, Medication, MedicationFilter, RecordSale, Sale, UpdateMedication};

/// Storage seam for the medication catalog and the sale ledger.
///
/// The two live behind one trait because `record_sale` mutates both in a
/// single atomic step; an implementation that cannot span them cannot honor
/// that contract. Date-sensitive operations take `today` from the caller so
/// expiry and stock-status decisions stay deterministic under test.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Create a new medication
    async fn create(&self, input: CreateMedication) -> InventoryResult<Medication>;

    /// Get a medication by ID
    async fn get_by_id(&self, id: Uuid) -> InventoryResult<Option<Medication>>;

    /// List medications with optional filters, newest first
    async fn list(
        &self,
        filter: MedicationFilter,
        today: NaiveDate,
    ) -> InventoryResult<Vec<Medication>>;

    /// Unfiltered catalog snapshot (for whole-catalog reductions)
    async fn list_all(&self) -> InventoryResult<Vec<Medication>>;

    /// Update an existing medication
    async fn update(&self, id: Uuid, input: UpdateMedication) -> InventoryResult<Medication>;

    /// Delete a medication, returning the removed entity
    async fn delete(&self, id: Uuid) -> InventoryResult<Medication>;

    /// Atomically check stock, decrement it, and append the sale record.
    ///
    /// Either both mutations commit or neither does; on any error the catalog
    /// and the ledger are left exactly as they were before the call.
    async fn record_sale(&self, input: RecordSale, today: NaiveDate) -> InventoryResult<Sale>;

    /// Full sale ledger, most recent `sold_at` first
    async fn list_sales(&self) -> InventoryResult<Vec<Sale>>;
}
