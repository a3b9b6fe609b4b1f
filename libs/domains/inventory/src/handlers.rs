use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ContentionResponse,
        InsufficientStockResponse, InternalServerErrorResponse, MedicationExpiredResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::InventoryResult;
use crate::models::{
    CatalogSummary, CreateMedication, Medication, MedicationFilter, RecordSale, Sale,
    SaleStatistics, UpdateMedication,
};
use crate::repository::InventoryRepository;
use crate::service::{CatalogService, SalesService};

/// OpenAPI documentation for the medication catalog endpoints
///
/// Kept separate from [`SalesApiDoc`] so each router can be nested under its
/// own path by the consuming application.
#[derive(OpenApi)]
#[openapi(
    paths(
        list_medications,
        create_medication,
        catalog_summary,
        get_medication,
        update_medication,
        delete_medication,
    ),
    components(
        schemas(
            Medication,
            CreateMedication,
            UpdateMedication,
            MedicationFilter,
            CatalogSummary
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ContentionResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Medications", description = "Medication catalog endpoints")
    )
)]
pub struct MedicationsApiDoc;

/// OpenAPI documentation for the sale ledger endpoints
#[derive(OpenApi)]
#[openapi(
    paths(list_sales, record_sale, sale_statistics),
    components(
        schemas(Sale, RecordSale, SaleStatistics),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            InsufficientStockResponse,
            MedicationExpiredResponse,
            ContentionResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Sales", description = "Sale recording and ledger endpoints")
    )
)]
pub struct SalesApiDoc;

/// Create the medications router with all catalog endpoints
pub fn medications_router<R: InventoryRepository + 'static>(
    service: CatalogService<R>,
) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_medications).post(create_medication))
        .route("/summary", get(catalog_summary))
        .route(
            "/{id}",
            get(get_medication)
                .put(update_medication)
                .delete(delete_medication),
        )
        .with_state(shared_service)
}

/// Create the sales router with ledger and engine endpoints
pub fn sales_router<R: InventoryRepository + 'static>(service: SalesService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_sales).post(record_sale))
        .route("/statistics", get(sale_statistics))
        .with_state(shared_service)
}

/// List medications with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = "Medications",
    params(MedicationFilter),
    responses(
        (status = 200, description = "List of medications, newest first", body = Vec<Medication>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_medications<R: InventoryRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Query(filter): Query<MedicationFilter>,
) -> InventoryResult<Json<Vec<Medication>>> {
    let medications = service.list_medications(filter).await?;
    Ok(Json(medications))
}

/// Create a new medication
#[utoipa::path(
    post,
    path = "",
    tag = "Medications",
    request_body = CreateMedication,
    responses(
        (status = 201, description = "Medication created successfully", body = Medication),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_medication<R: InventoryRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateMedication>,
) -> InventoryResult<impl IntoResponse> {
    let medication = service.create_medication(input).await?;
    Ok((StatusCode::CREATED, Json(medication)))
}

/// Whole-catalog stock overview
#[utoipa::path(
    get,
    path = "/summary",
    tag = "Medications",
    responses(
        (status = 200, description = "Catalog summary", body = CatalogSummary),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn catalog_summary<R: InventoryRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> InventoryResult<Json<CatalogSummary>> {
    let summary = service.summary().await?;
    Ok(Json(summary))
}

/// Get a medication by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Medications",
    params(
        ("id" = Uuid, Path, description = "Medication ID")
    ),
    responses(
        (status = 200, description = "Medication found", body = Medication),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_medication<R: InventoryRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> InventoryResult<Json<Medication>> {
    let medication = service.get_medication(id).await?;
    Ok(Json(medication))
}

/// Partially update a medication
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Medications",
    params(
        ("id" = Uuid, Path, description = "Medication ID")
    ),
    request_body = UpdateMedication,
    responses(
        (status = 200, description = "Medication updated successfully", body = Medication),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ContentionResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_medication<R: InventoryRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateMedication>,
) -> InventoryResult<Json<Medication>> {
    let medication = service.update_medication(id, input).await?;
    Ok(Json(medication))
}

/// Delete a medication
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Medications",
    params(
        ("id" = Uuid, Path, description = "Medication ID")
    ),
    responses(
        (status = 200, description = "Medication deleted; the removed entity is returned", body = Medication),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ContentionResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_medication<R: InventoryRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> InventoryResult<Json<Medication>> {
    let medication = service.delete_medication(id).await?;
    Ok(Json(medication))
}

/// Full sale ledger, most recent first
#[utoipa::path(
    get,
    path = "",
    tag = "Sales",
    responses(
        (status = 200, description = "All recorded sales, most recent first", body = Vec<Sale>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_sales<R: InventoryRepository>(
    State(service): State<Arc<SalesService<R>>>,
) -> InventoryResult<Json<Vec<Sale>>> {
    let sales = service.list_sales().await?;
    Ok(Json(sales))
}

/// Record a sale against a medication
#[utoipa::path(
    post,
    path = "",
    tag = "Sales",
    request_body = RecordSale,
    responses(
        (status = 201, description = "Sale recorded; stock was decremented atomically", body = Sale),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = InsufficientStockResponse),
        (status = 503, response = ContentionResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn record_sale<R: InventoryRepository>(
    State(service): State<Arc<SalesService<R>>>,
    ValidatedJson(input): ValidatedJson<RecordSale>,
) -> InventoryResult<impl IntoResponse> {
    let sale = service.record_sale(input).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// Aggregate statistics over the whole ledger
#[utoipa::path(
    get,
    path = "/statistics",
    tag = "Sales",
    responses(
        (status = 200, description = "Ledger statistics", body = SaleStatistics),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn sale_statistics<R: InventoryRepository>(
    State(service): State<Arc<SalesService<R>>>,
) -> InventoryResult<Json<SaleStatistics>> {
    let statistics = service.statistics().await?;
    Ok(Json(statistics))
}
