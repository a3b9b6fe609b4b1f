//! Business logic over the inventory store: catalog management on one side,
//! the sale engine and ledger reads on the other. Both services are generic
//! over [`InventoryRepository`] and share a store by cloning it.

use chrono::{NaiveDate, Utc};
use rand::RngExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{InventoryError, InventoryResult};
use crate::models::{
    CatalogSummary, CreateMedication, Medication, MedicationFilter, RecordSale, Sale,
    SaleStatistics, UpdateMedication,
};
use crate::repository::InventoryRepository;

/// How many times a sale is attempted when the row lock is busy
const SALE_RETRY_ATTEMPTS: u32 = 3;
/// Backoff before the first retry; doubles per attempt
const SALE_RETRY_BASE_DELAY: Duration = Duration::from_millis(25);
/// Random extra backoff so colliding retries spread out
const SALE_RETRY_JITTER_MS: u64 = 25;

/// Calendar date used for expiry and stock-status decisions
fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Catalog service: create/read/update/delete medications plus the
/// whole-catalog summary.
pub struct CatalogService<R: InventoryRepository> {
    repository: Arc<R>,
}

impl<R: InventoryRepository> CatalogService<R> {
    /// Create a new CatalogService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new medication
    #[instrument(skip(self, input), fields(medication_name = %input.name))]
    pub async fn create_medication(&self, input: CreateMedication) -> InventoryResult<Medication> {
        input.validate()?;
        self.repository.create(input).await
    }

    /// Get a medication by ID
    #[instrument(skip(self))]
    pub async fn get_medication(&self, id: Uuid) -> InventoryResult<Medication> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(InventoryError::NotFound(id))
    }

    /// List medications with optional filters, newest first
    #[instrument(skip(self))]
    pub async fn list_medications(
        &self,
        filter: MedicationFilter,
    ) -> InventoryResult<Vec<Medication>> {
        self.repository.list(filter, today()).await
    }

    /// Partially update a medication
    #[instrument(skip(self, input))]
    pub async fn update_medication(
        &self,
        id: Uuid,
        input: UpdateMedication,
    ) -> InventoryResult<Medication> {
        input.validate()?;

        if input.is_empty() {
            return Err(InventoryError::NoUpdateFields);
        }

        self.repository.update(id, input).await
    }

    /// Delete a medication, returning the removed entity
    #[instrument(skip(self))]
    pub async fn delete_medication(&self, id: Uuid) -> InventoryResult<Medication> {
        self.repository.delete(id).await
    }

    /// Per-status counts and total stock value over the whole catalog
    #[instrument(skip(self))]
    pub async fn summary(&self) -> InventoryResult<CatalogSummary> {
        let medications = self.repository.list_all().await?;
        Ok(CatalogSummary::from_medications(&medications, today()))
    }
}

impl<R: InventoryRepository> Clone for CatalogService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

/// Sales service: the stock reservation engine plus ledger reads.
pub struct SalesService<R: InventoryRepository> {
    repository: Arc<R>,
}

impl<R: InventoryRepository> SalesService<R> {
    /// Create a new SalesService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Record a sale: check stock, decrement it, and append the sale record
    /// in one atomic step.
    ///
    /// `Contention` is retried with doubling backoff plus jitter; nothing has
    /// committed when the store reports it, so a retry is always safe. Every
    /// other error is final.
    #[instrument(
        skip(self, input),
        fields(medication_id = %input.medication_id, quantity = input.quantity)
    )]
    pub async fn record_sale(&self, input: RecordSale) -> InventoryResult<Sale> {
        input.validate()?;

        let today = today();
        let mut attempt = 1;
        loop {
            match self.repository.record_sale(input.clone(), today).await {
                Err(InventoryError::Contention(id)) if attempt < SALE_RETRY_ATTEMPTS => {
                    let backoff = SALE_RETRY_BASE_DELAY * 2u32.pow(attempt - 1);
                    let jitter =
                        Duration::from_millis(rand::rng().random_range(0..SALE_RETRY_JITTER_MS));
                    tracing::warn!(medication_id = %id, attempt, "Sale hit contention, retrying");
                    tokio::time::sleep(backoff + jitter).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Full sale ledger, most recent first
    #[instrument(skip(self))]
    pub async fn list_sales(&self) -> InventoryResult<Vec<Sale>> {
        self.repository.list_sales().await
    }

    /// Aggregate figures over the whole ledger
    #[instrument(skip(self))]
    pub async fn statistics(&self) -> InventoryResult<SaleStatistics> {
        let sales = self.repository.list_sales().await?;
        Ok(SaleStatistics::from_sales(&sales, today()))
    }
}

impl<R: InventoryRepository> Clone for SalesService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
