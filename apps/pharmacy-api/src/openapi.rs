use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Pharmacy API",
        version = "0.1.0",
        description = "Medication catalog, stock reservation and sale ledger"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/medications", api = domain_inventory::MedicationsApiDoc),
        (path = "/sales", api = domain_inventory::SalesApiDoc)
    )
)]
pub struct ApiDoc;
