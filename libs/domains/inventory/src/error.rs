use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use axum_helpers::errors::{ErrorCode, error_response, error_response_with_details};
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

/// Failure taxonomy of the inventory core.
///
/// Business rejections (`InsufficientStock`, `Expired`, ...) are ordinary
/// values, not faults; `Contention` is the only transient variant and is safe
/// to retry because the store commits nothing before returning it.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Medication not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Sale quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    #[error("Update carries no fields")]
    NoUpdateFields,

    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: u32, requested: u32 },

    #[error("Medication {id} expired on {expires_on}")]
    Expired { id: Uuid, expires_on: NaiveDate },

    #[error("Concurrent update in progress for medication {0}")]
    Contention(Uuid),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

impl InventoryError {
    /// Whether retrying the same call can succeed without any other change
    pub fn is_retryable(&self) -> bool {
        matches!(self, InventoryError::Contention(_))
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        match self {
            InventoryError::NotFound(id) => {
                AppError::NotFound(format!("Medication {} not found", id)).into_response()
            }
            InventoryError::Validation(e) => AppError::ValidationError(e).into_response(),
            InventoryError::InvalidQuantity(requested) => {
                tracing::info!(requested, "Sale rejected: unusable quantity");
                error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Sale quantity must be at least 1, got {}", requested),
                    ErrorCode::InvalidQuantity,
                )
            }
            InventoryError::NoUpdateFields => error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::NoUpdateFields.default_message().to_string(),
                ErrorCode::NoUpdateFields,
            ),
            InventoryError::InsufficientStock {
                available,
                requested,
            } => {
                tracing::info!(available, requested, "Sale rejected: insufficient stock");
                error_response_with_details(
                    StatusCode::CONFLICT,
                    ErrorCode::InsufficientStock.default_message().to_string(),
                    ErrorCode::InsufficientStock,
                    serde_json::json!({ "available": available, "requested": requested }),
                )
            }
            InventoryError::Expired { id, expires_on } => {
                tracing::info!(medication_id = %id, %expires_on, "Sale rejected: medication expired");
                error_response_with_details(
                    StatusCode::CONFLICT,
                    ErrorCode::MedicationExpired.default_message().to_string(),
                    ErrorCode::MedicationExpired,
                    serde_json::json!({ "expires_on": expires_on.to_string() }),
                )
            }
            InventoryError::Contention(id) => {
                tracing::warn!(
                    medication_id = %id,
                    error_code = ErrorCode::Contention.code(),
                    "Lock wait exhausted"
                );
                error_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorCode::Contention.default_message().to_string(),
                    ErrorCode::Contention,
                )
            }
            // The client gets the generic message; the detail stays in the log.
            InventoryError::Storage(msg) => {
                tracing::error!(
                    error_code = ErrorCode::StorageFailure.code(),
                    "Storage error: {}",
                    msg
                );
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StorageFailure.default_message().to_string(),
                    ErrorCode::StorageFailure,
                )
            }
        }
    }
}
