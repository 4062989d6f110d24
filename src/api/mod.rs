pub mod handlers;
pub mod models;
pub mod openapi;

use axum::Router;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use handlers::{AppService, api_routes};
use openapi::ApiDoc;

/// Full application router: the JSON API under `/api` plus the Swagger UI.
pub fn app(service: Arc<AppService>) -> Router {
    Router::new()
        .nest("/api", api_routes(service))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
