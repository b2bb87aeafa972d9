use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::state::ServerState;

pub mod order_sets;
pub mod patients;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/order-sets", get(order_sets::list).post(order_sets::create))
        .route(
            "/order-sets/:id",
            get(order_sets::get).put(order_sets::update).delete(order_sets::delete),
        )
        .route("/order-sets/by-uuid/:uuid", get(order_sets::get_by_uuid))
        .route("/order-sets/:id/retire", post(order_sets::retire))
        .route("/order-sets/:id/unretire", post(order_sets::unretire))
        .route("/order-sets/:id/parents", get(order_sets::parents))
        .route("/order-set-members/:id", get(order_sets::get_member))
        .route("/patients/:patient_id/order-groups", get(patients::list_order_groups))
        .route("/patients/:patient_id/drug-orders", get(patients::list_drug_orders))
        .route(
            "/patients/:patient_id/regimens/:regimen_id/max-cycle",
            get(patients::max_cycle),
        )
        .with_state(state);

    api.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
