use super::shutdown::shutdown_signal;
use crate::errors::handlers::{method_not_allowed, not_found};
use crate::http::cors::cors_layer_from_env;
use crate::http::security::security_headers;
use axum::{middleware, Router};
use core_config::server::ServerConfig;
use std::io;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};
use utoipa::OpenApi;

/// Binds the listener and serves the router until SIGINT/SIGTERM.
///
/// In-flight requests are drained before the future resolves
/// (graceful shutdown via [`shutdown_signal`]).
///
/// # Errors
/// Returns an error if the listener cannot bind the configured address or
/// the server fails while running.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use core_config::server::ServerConfig;
/// use axum_helpers::server::create_app;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ServerConfig::from_env()?;
///     create_app(Router::new(), &config).await?;
///     Ok(())
/// }
/// ```
pub async fn create_app(router: Router, server_config: &ServerConfig) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;

    info!("Server starting on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        })?;

    Ok(())
}

/// Wraps the API routes with the workspace's standard outer surface:
///
/// - OpenAPI viewers (Swagger UI, ReDoc, RapiDoc, Scalar) at their usual paths
/// - the routes themselves nested under `/api`
/// - request tracing, security headers, CORS, and response compression
/// - 404 and 405 fallbacks answering with the shared [`ErrorResponse`] shape
///
/// Health endpoints are deliberately not included; mount `health_router()`
/// and a readiness route on the result so they sit outside `/api`.
///
/// The `apis` router must already carry its state (domain routers apply
/// their own); this function only adds cross-cutting concerns.
///
/// CORS origins come from the `CORS_ALLOWED_ORIGIN` environment variable
/// (comma-separated). When unset, a permissive development layer is used.
/// See [`crate::http::cors::cors_layer_from_env`].
///
/// # Errors
/// Returns an error if `CORS_ALLOWED_ORIGIN` is set but invalid or empty.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use utoipa::OpenApi;
/// use axum_helpers::server::create_router;
///
/// #[derive(OpenApi)]
/// #[openapi(nest((path = "/medications", api = MedicationsApiDoc)))]
/// struct ApiDoc;
///
/// let api_routes = Router::new().nest("/medications", medications);
/// let router = create_router::<ApiDoc>(api_routes).await?;
/// ```
///
/// [`ErrorResponse`]: crate::errors::ErrorResponse
pub async fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let cors_layer = cors_layer_from_env()?;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        // Compresses responses based on the Accept-Encoding header
        .layer(CompressionLayer::new());

    Ok(router)
}
