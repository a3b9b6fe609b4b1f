//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 1005,
        "error": "INTERNAL_ERROR",
        "message": "An internal server error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "VALIDATION_ERROR",
        "message": "Request validation failed",
        "details": {
            "name": [{
                "code": "MISSING_NAME",
                "message": "name must not be empty",
                "params": {"value": ""}
            }]
        }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid identifier",
    content_type = "application/json",
    example = json!({
        "code": 1002,
        "error": "INVALID_ID",
        "message": "Invalid identifier format"
    })
)]
pub struct BadRequestIdResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "Resource not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - Requested quantity exceeds available stock",
    content_type = "application/json",
    example = json!({
        "code": 3003,
        "error": "INSUFFICIENT_STOCK",
        "message": "Requested quantity exceeds available stock",
        "details": {"available": 7, "requested": 8}
    })
)]
pub struct InsufficientStockResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - Medication past its expiry date",
    content_type = "application/json",
    example = json!({
        "code": 3004,
        "error": "MEDICATION_EXPIRED",
        "message": "Medication is past its expiry date",
        "details": {"expires_on": "2024-06-30"}
    })
)]
pub struct MedicationExpiredResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Service Unavailable - retryable contention on the medication row",
    content_type = "application/json",
    example = json!({
        "code": 3005,
        "error": "CONTENTION",
        "message": "The item is busy, please retry"
    })
)]
pub struct ContentionResponse(pub ErrorResponse);
