use axum::Router;
use domain_inventory::{CatalogService, SalesService, handlers};

pub mod health;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Both services are built over clones of the state's store. Clones of
/// `InMemoryInventory` share the same maps, so a sale recorded through the
/// sales router is immediately visible through the medications router.
pub fn routes(state: &crate::state::AppState) -> Router {
    let catalog = CatalogService::new(state.inventory.clone());
    let sales = SalesService::new(state.inventory.clone());

    Router::new()
        .nest("/medications", handlers::medications_router(catalog))
        .nest("/sales", handlers::sales_router(sales))
}

/// Creates a router with the /ready endpoint that performs an actual read
/// through the store.
///
/// This router has state applied and can be merged with the stateless app
/// router from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
