use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::time::timeout;
use uuid::Uuid;

#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{InventoryError, InventoryResult};
use crate::models::{CreateMedication, Medication, MedicationFilter, RecordSale, Sale, UpdateMedication};
use crate::repository::InventoryRepository;

/// How long a mutator may wait for a medication's row lock before the store
/// gives up and reports `Contention`. Critical sections are microseconds, so
/// a full wait means a writer is stuck, not busy.
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_secs(5);

/// Process-embedded store of record for the catalog and the ledger.
///
/// Mutations of a given medication (`record_sale`, `update`, `delete`)
/// serialize on that medication's row lock, so check-then-decrement races
/// cannot happen; operations on different medications never contend. Reads
/// skip row locks entirely and snapshot under the table `RwLock`s.
///
/// Lock order is fixed: row lock, then `medications`, then `sales`.
#[derive(Debug, Clone)]
pub struct InMemoryInventory {
    medications: Arc<RwLock<HashMap<Uuid, Medication>>>,
    sales: Arc<RwLock<Vec<Sale>>>,
    row_locks: Arc<RwLock<HashMap<Uuid, Arc<Mutex<()>>>>>,
    lock_wait: Duration,
    #[cfg(test)]
    fail_next_commit: Arc<AtomicBool>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::with_lock_wait(DEFAULT_LOCK_WAIT)
    }

    /// Store with a custom row-lock wait bound
    pub fn with_lock_wait(lock_wait: Duration) -> Self {
        Self {
            medications: Arc::new(RwLock::new(HashMap::new())),
            sales: Arc::new(RwLock::new(Vec::new())),
            row_locks: Arc::new(RwLock::new(HashMap::new())),
            lock_wait,
            #[cfg(test)]
            fail_next_commit: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Fetch or create the row lock for a medication id
    async fn row_lock(&self, id: Uuid) -> Arc<Mutex<()>> {
        {
            let locks = self.row_locks.read().await;
            if let Some(lock) = locks.get(&id) {
                return Arc::clone(lock);
            }
        }
        let mut locks = self.row_locks.write().await;
        Arc::clone(locks.entry(id).or_insert_with(|| Arc::new(Mutex::new(()))))
    }

    /// Acquire a medication's row lock within the configured wait bound
    async fn lock_row(&self, id: Uuid) -> InventoryResult<OwnedMutexGuard<()>> {
        let lock = self.row_lock(id).await;
        timeout(self.lock_wait, lock.lock_owned())
            .await
            .map_err(|_| InventoryError::Contention(id))
    }

    /// Arm the fault hook: the next `record_sale` fails its append after the
    /// decrement has been applied, exercising the rollback path.
    #[cfg(test)]
    fn inject_commit_failure(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }
}

impl Default for InMemoryInventory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventory {
    async fn create(&self, input: CreateMedication) -> InventoryResult<Medication> {
        let medication = Medication::new(input);

        let mut medications = self.medications.write().await;
        medications.insert(medication.id, medication.clone());

        tracing::info!(medication_id = %medication.id, "Created medication");
        Ok(medication)
    }

    async fn get_by_id(&self, id: Uuid) -> InventoryResult<Option<Medication>> {
        let medications = self.medications.read().await;
        Ok(medications.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: MedicationFilter,
        today: NaiveDate,
    ) -> InventoryResult<Vec<Medication>> {
        let medications = self.medications.read().await;

        let search = filter.search.as_ref().map(|s| s.to_lowercase());
        let mut result: Vec<Medication> = medications
            .values()
            .filter(|m| {
                if let Some(ref search) = search {
                    if !m.name.to_lowercase().contains(search) {
                        return false;
                    }
                }
                if let Some(status) = filter.status {
                    if m.stock_status(today) != status {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        // Newest first; the id tie-break keeps repeated reads identical even
        // for equal timestamps
        result.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let result: Vec<Medication> = result
            .into_iter()
            .skip(filter.offset)
            .take(filter.page_size())
            .collect();

        Ok(result)
    }

    async fn list_all(&self) -> InventoryResult<Vec<Medication>> {
        let medications = self.medications.read().await;
        Ok(medications.values().cloned().collect())
    }

    async fn update(&self, id: Uuid, input: UpdateMedication) -> InventoryResult<Medication> {
        let _guard = self.lock_row(id).await?;

        let mut medications = self.medications.write().await;
        let medication = medications
            .get_mut(&id)
            .ok_or(InventoryError::NotFound(id))?;

        medication.apply_update(input);
        let updated = medication.clone();

        tracing::info!(medication_id = %id, "Updated medication");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> InventoryResult<Medication> {
        let _guard = self.lock_row(id).await?;

        let mut medications = self.medications.write().await;
        let medication = medications
            .remove(&id)
            .ok_or(InventoryError::NotFound(id))?;
        drop(medications);

        // Stale entry; anyone still queued on it will find the row gone
        self.row_locks.write().await.remove(&id);

        tracing::info!(medication_id = %id, "Deleted medication");
        Ok(medication)
    }

    async fn record_sale(&self, input: RecordSale, today: NaiveDate) -> InventoryResult<Sale> {
        if input.quantity == 0 {
            return Err(InventoryError::InvalidQuantity(input.quantity));
        }

        let _guard = self.lock_row(input.medication_id).await?;

        let mut medications = self.medications.write().await;
        let medication = medications
            .get_mut(&input.medication_id)
            .ok_or(InventoryError::NotFound(input.medication_id))?;

        if medication.is_expired(today) {
            return Err(InventoryError::Expired {
                id: medication.id,
                expires_on: medication.expires_on,
            });
        }

        if input.quantity > medication.quantity_on_hand {
            return Err(InventoryError::InsufficientStock {
                available: medication.quantity_on_hand,
                requested: input.quantity,
            });
        }

        // Snapshot before the decrement; the sale keeps these values even if
        // the medication is later repriced or deleted
        let sale = Sale::new(medication, input.quantity, input.customer_name);

        // Paired mutation: both table locks are held and every check has
        // passed before the first write, with no await between the two writes
        let mut sales = self.sales.write().await;

        #[cfg(test)]
        let rollback = (medication.quantity_on_hand, medication.updated_at);

        medication.quantity_on_hand -= input.quantity;
        medication.updated_at = sale.sold_at;

        #[cfg(test)]
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            // A failed append must not leave the decrement behind
            (medication.quantity_on_hand, medication.updated_at) = rollback;
            return Err(InventoryError::Storage(
                "injected append failure".to_string(),
            ));
        }

        sales.push(sale.clone());

        tracing::info!(
            sale_id = %sale.id,
            medication_id = %sale.medication_id,
            quantity = sale.quantity,
            remaining = medication.quantity_on_hand,
            "Recorded sale"
        );
        Ok(sale)
    }

    async fn list_sales(&self) -> InventoryResult<Vec<Sale>> {
        let sales = self.sales.read().await;

        let mut result = sales.clone();
        result.sort_by(|a, b| b.sold_at.cmp(&a.sold_at).then_with(|| b.id.cmp(&a.id)));
        Ok(result)
    }
}
