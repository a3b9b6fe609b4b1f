use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Medications with fewer units on hand than this count as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 20;

/// Hard cap on the page size of list queries.
pub const MAX_PAGE_SIZE: usize = 100;

/// Custom validator for medication names (non-empty after trimming)
fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("MISSING_NAME"));
    }
    Ok(())
}

/// Custom validator for unit prices (strictly positive)
fn validate_unit_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(ValidationError::new("INVALID_PRICE"));
    }
    Ok(())
}

/// Derived stock classification of a medication
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StockStatus {
    /// Past the expiry date, or no units left
    Expired,
    /// Fewer than [`LOW_STOCK_THRESHOLD`] units left
    LowStock,
    /// At or above the low-stock threshold
    InStock,
}

/// Medication entity - a stocked catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Medication {
    /// Unique identifier
    pub id: Uuid,
    /// Medication name
    pub name: String,
    /// Price per unit
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// Units currently on hand
    pub quantity_on_hand: u32,
    /// Expiry date (inclusive; the medication is sellable on this date)
    pub expires_on: NaiveDate,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Sale entity - immutable record of a completed sale
///
/// `medication_name` and `unit_price` are snapshots taken when the sale was
/// recorded; later catalog edits or deletes never touch them.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Sale {
    /// Unique identifier
    pub id: Uuid,
    /// Medication this sale was recorded against
    pub medication_id: Uuid,
    /// Medication name at the time of sale
    pub medication_name: String,
    /// Unit price at the time of sale
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// Units sold
    pub quantity: u32,
    /// `unit_price * quantity`, computed once at recording time
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    /// Optional customer name
    pub customer_name: Option<String>,
    /// When the sale happened
    pub sold_at: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new medication
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMedication {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_unit_price"))]
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub quantity_on_hand: u32,
    pub expires_on: NaiveDate,
}

/// DTO for partially updating a medication
///
/// Every field is optional; a patch with no fields at all is rejected by the
/// service rather than silently bumping `updated_at`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMedication {
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_unit_price"))]
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub unit_price: Option<Decimal>,
    pub quantity_on_hand: Option<u32>,
    pub expires_on: Option<NaiveDate>,
}

/// DTO for recording a sale
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RecordSale {
    /// Medication to sell
    pub medication_id: Uuid,
    /// Units to sell (must be at least 1)
    #[validate(range(min = 1, code = "INVALID_QUANTITY"))]
    pub quantity: u32,
    /// Optional customer name
    pub customer_name: Option<String>,
}

/// Query filters for listing medications
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct MedicationFilter {
    /// Case-insensitive substring match on the name
    pub search: Option<String>,
    /// Keep only medications with this derived stock status
    pub status: Option<StockStatus>,
    /// Maximum number of results (capped at 100)
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Number of results to skip
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for MedicationFilter {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl MedicationFilter {
    /// Requested page size after applying the [`MAX_PAGE_SIZE`] cap
    pub fn page_size(&self) -> usize {
        self.limit.min(MAX_PAGE_SIZE)
    }
}

/// Catalog-wide stock overview
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogSummary {
    /// Total number of medications in the catalog
    pub total_medications: usize,
    /// Medications past expiry or with zero units left
    pub expired: usize,
    /// Medications with `0 < quantity < 20`
    pub low_stock: usize,
    /// Medications at or above the low-stock threshold
    pub in_stock: usize,
    /// Σ `unit_price * quantity_on_hand` over the whole catalog
    #[serde(with = "rust_decimal::serde::float")]
    pub total_stock_value: Decimal,
}

/// Aggregate view over the whole sale ledger
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaleStatistics {
    /// Number of recorded sales
    pub total_sales: usize,
    /// Σ `total_price` over all sales
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    /// Σ `quantity` over all sales
    pub total_units_sold: u64,
    /// Number of distinct medications that have at least one sale
    pub distinct_medications: usize,
    /// Σ `total_price` of sales recorded on the current UTC date
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue_today: Decimal,
}

impl Medication {
    /// Create a new medication from CreateMedication DTO
    pub fn new(input: CreateMedication) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name.trim().to_string(),
            unit_price: input.unit_price,
            quantity_on_hand: input.quantity_on_hand,
            expires_on: input.expires_on,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates from UpdateMedication DTO
    pub fn apply_update(&mut self, update: UpdateMedication) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(unit_price) = update.unit_price {
            self.unit_price = unit_price;
        }
        if let Some(quantity_on_hand) = update.quantity_on_hand {
            self.quantity_on_hand = quantity_on_hand;
        }
        if let Some(expires_on) = update.expires_on {
            self.expires_on = expires_on;
        }
        self.updated_at = Utc::now();
    }

    /// Whether the expiry date has passed as of `today`
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires_on < today
    }

    /// Derived stock classification as of `today`
    pub fn stock_status(&self, today: NaiveDate) -> StockStatus {
        if self.is_expired(today) || self.quantity_on_hand == 0 {
            StockStatus::Expired
        } else if self.quantity_on_hand < LOW_STOCK_THRESHOLD {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Value of the units currently on hand
    pub fn stock_value(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity_on_hand)
    }
}

impl UpdateMedication {
    /// True when the patch carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.unit_price.is_none()
            && self.quantity_on_hand.is_none()
            && self.expires_on.is_none()
    }
}

impl Sale {
    /// Build a sale from the pre-decrement medication snapshot.
    ///
    /// Blank customer names are normalized to `None`.
    pub fn new(medication: &Medication, quantity: u32, customer_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            medication_id: medication.id,
            medication_name: medication.name.clone(),
            unit_price: medication.unit_price,
            quantity,
            total_price: medication.unit_price * Decimal::from(quantity),
            customer_name: customer_name.filter(|name| !name.trim().is_empty()),
            sold_at: now,
            created_at: now,
            updated_at: now,
        }
    }
}

impl CatalogSummary {
    /// Reduce a catalog snapshot into per-status counts and total value
    pub fn from_medications(medications: &[Medication], today: NaiveDate) -> Self {
        let mut expired = 0;
        let mut low_stock = 0;
        let mut in_stock = 0;
        let mut total_stock_value = Decimal::ZERO;

        for medication in medications {
            match medication.stock_status(today) {
                StockStatus::Expired => expired += 1,
                StockStatus::LowStock => low_stock += 1,
                StockStatus::InStock => in_stock += 1,
            }
            total_stock_value += medication.stock_value();
        }

        Self {
            total_medications: medications.len(),
            expired,
            low_stock,
            in_stock,
            total_stock_value,
        }
    }
}

impl SaleStatistics {
    /// Reduce a ledger snapshot into aggregate figures
    pub fn from_sales(sales: &[Sale], today: NaiveDate) -> Self {
        let mut total_revenue = Decimal::ZERO;
        let mut total_units_sold: u64 = 0;
        let mut revenue_today = Decimal::ZERO;
        let mut medication_ids = HashSet::new();

        for sale in sales {
            total_revenue += sale.total_price;
            total_units_sold += u64::from(sale.quantity);
            medication_ids.insert(sale.medication_id);
            if sale.sold_at.date_naive() == today {
                revenue_today += sale.total_price;
            }
        }

        Self {
            total_sales: sales.len(),
            total_revenue,
            total_units_sold,
            distinct_medications: medication_ids.len(),
            revenue_today,
        }
    }
}
