//! Type-safe error codes for API responses.
//!
//! This module provides a single source of truth for error codes used across
//! the application. Each error code includes:
//! - String representation for client consumption (e.g., "INSUFFICIENT_STOCK")
//! - Integer code for logging and monitoring (e.g., 3003)
//! - Default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.default_message(), "Request validation failed");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
///
/// This enum provides a type-safe way to represent error codes across the application.
/// It combines string identifiers (for clients), integer codes (for monitoring), and
/// default messages (for consistency).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// Invalid identifier format in path or query parameter
    InvalidId,

    /// JSON extraction from request body failed
    JsonExtraction,

    /// Requested resource was not found
    NotFound,

    /// An unexpected internal server error occurred
    InternalError,

    /// HTTP method not allowed for this resource
    MethodNotAllowed,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    // Storage errors (2000-2999)
    /// Unexpected persistence-layer fault
    StorageFailure,

    // Inventory errors (3000-3999)
    /// Requested sale quantity is zero or otherwise unusable
    InvalidQuantity,

    /// Partial update carried no fields
    NoUpdateFields,

    /// Requested quantity exceeds the quantity on hand
    InsufficientStock,

    /// Medication is past its expiry date
    MedicationExpired,

    /// Concurrent mutations on the same medication exhausted the lock wait
    Contention,
}

impl ErrorCode {
    /// Get the string representation for client consumption.
    ///
    /// This returns a SCREAMING_SNAKE_CASE identifier that clients can use
    /// to programmatically handle specific error types.
    ///
    /// # Example
    ///
    /// ```rust
    /// use axum_helpers::errors::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
    /// assert_eq!(ErrorCode::InsufficientStock.as_str(), "INSUFFICIENT_STOCK");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::StorageFailure => "STORAGE_FAILURE",
            Self::InvalidQuantity => "INVALID_QUANTITY",
            Self::NoUpdateFields => "NO_UPDATE_FIELDS",
            Self::InsufficientStock => "INSUFFICIENT_STOCK",
            Self::MedicationExpired => "MEDICATION_EXPIRED",
            Self::Contention => "CONTENTION",
        }
    }

    /// Get the integer code for logging and monitoring.
    ///
    /// These codes are used in structured logs and metrics to identify error types.
    /// They are organized into ranges:
    /// - 1000-1999: Client errors
    /// - 2000-2999: Storage errors
    /// - 3000-3999: Inventory business errors
    ///
    /// # Example
    ///
    /// ```rust
    /// use axum_helpers::errors::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::ValidationError.code(), 1001);
    /// assert_eq!(ErrorCode::InsufficientStock.code(), 3003);
    /// ```
    pub fn code(&self) -> i32 {
        match self {
            // Client errors (1000-1999)
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::MethodNotAllowed => 1006,
            Self::ServiceUnavailable => 1011,

            // Storage errors (2000-2999)
            Self::StorageFailure => 2001,

            // Inventory errors (3000-3999)
            Self::InvalidQuantity => 3001,
            Self::NoUpdateFields => 3002,
            Self::InsufficientStock => 3003,
            Self::MedicationExpired => 3004,
            Self::Contention => 3005,
        }
    }

    /// Get the default user-facing error message.
    ///
    /// This provides a consistent, human-readable message for each error type.
    /// Individual handlers can override these messages with more specific details.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid identifier format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::StorageFailure => "A storage error occurred",
            Self::InvalidQuantity => "Sale quantity must be greater than zero",
            Self::NoUpdateFields => "At least one field must be provided",
            Self::InsufficientStock => "Requested quantity exceeds available stock",
            Self::MedicationExpired => "Medication is past its expiry date",
            Self::Contention => "The item is busy, please retry",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
