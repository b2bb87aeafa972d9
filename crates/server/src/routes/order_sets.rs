use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::state::ServerState;
use service::db::order_set_service;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// Include retired order sets in the listing
    #[serde(default)]
    pub include_retired: bool,
    /// Case-insensitive partial name match
    pub q: Option<String>,
    /// Indication concept filter
    pub indication: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateOrderSetInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub indication_concept_id: Option<i32>,
    #[serde(default)]
    pub cyclical: bool,
    pub cycle_length_days: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateOrderSetInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub indication_concept_id: Option<i32>,
    pub cyclical: Option<bool>,
    pub cycle_length_days: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RetireInput {
    pub reason: Option<String>,
}

#[utoipa::path(
    get, path = "/order-sets", tag = "order-sets",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<models::order_set::Model>>, JsonApiError> {
    let sets = state
        .order_sets
        .list(q.q.as_deref(), q.indication, q.include_retired)
        .await?;
    info!(count = sets.len(), include_retired = q.include_retired, "list order sets");
    Ok(Json(sets))
}

#[utoipa::path(
    post, path = "/order-sets", tag = "order-sets",
    request_body = CreateOrderSetInput,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateOrderSetInput>,
) -> Result<Json<models::order_set::Model>, JsonApiError> {
    let created = state
        .order_sets
        .create(
            input.name.as_deref(),
            input.description.as_deref(),
            input.indication_concept_id,
            input.cyclical,
            input.cycle_length_days,
        )
        .await?;
    Ok(Json(created))
}

#[utoipa::path(
    get, path = "/order-sets/{id}", tag = "order-sets",
    params(("id" = i32, Path, description = "Order set ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<models::order_set::Model>, StatusCode> {
    match state.order_sets.get(id).await {
        Ok(Some(m)) => Ok(Json(m)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[utoipa::path(
    get, path = "/order-sets/by-uuid/{uuid}", tag = "order-sets",
    params(("uuid" = Uuid, Path, description = "Order set UUID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_by_uuid(
    State(state): State<ServerState>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<models::order_set::Model>, StatusCode> {
    match state.order_sets.get_by_uuid(uuid).await {
        Ok(Some(m)) => Ok(Json(m)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[utoipa::path(
    put, path = "/order-sets/{id}", tag = "order-sets",
    params(("id" = i32, Path, description = "Order set ID")),
    request_body = UpdateOrderSetInput,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateOrderSetInput>,
) -> Result<Json<models::order_set::Model>, JsonApiError> {
    let updated = state
        .order_sets
        .update(
            id,
            input.name.as_deref(),
            input.description.as_deref(),
            input.indication_concept_id,
            input.cyclical,
            input.cycle_length_days,
        )
        .await?;
    info!(id = updated.id, "updated order set");
    Ok(Json(updated))
}

/// Fetch-then-purge; a successful delete redirects back to the listing, the
/// way the admin UI flow expects.
#[utoipa::path(
    delete, path = "/order-sets/{id}", tag = "order-sets",
    params(("id" = i32, Path, description = "Order set ID")),
    responses(
        (status = 303, description = "Deleted, redirect to list"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Redirect, JsonApiError> {
    state.order_sets.purge(id).await?;
    info!(id, "deleted order set");
    Ok(Redirect::to("/order-sets"))
}

#[utoipa::path(
    post, path = "/order-sets/{id}/retire", tag = "order-sets",
    params(("id" = i32, Path, description = "Order set ID")),
    request_body = RetireInput,
    responses(
        (status = 200, description = "Retired"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn retire(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(input): Json<RetireInput>,
) -> Result<Json<models::order_set::Model>, JsonApiError> {
    let retired = state.order_sets.retire(id, input.reason.as_deref()).await?;
    info!(id, "retired order set");
    Ok(Json(retired))
}

#[utoipa::path(
    post, path = "/order-sets/{id}/unretire", tag = "order-sets",
    params(("id" = i32, Path, description = "Order set ID")),
    responses(
        (status = 200, description = "Unretired"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn unretire(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<models::order_set::Model>, JsonApiError> {
    let unretired = state.order_sets.unretire(id).await?;
    info!(id, "unretired order set");
    Ok(Json(unretired))
}

#[utoipa::path(
    get, path = "/order-sets/{id}/parents", tag = "order-sets",
    params(("id" = i32, Path, description = "Order set ID")),
    responses(
        (status = 200, description = "Parent order sets"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn parents(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<models::order_set::Model>>, JsonApiError> {
    Ok(Json(state.order_sets.parents(id).await?))
}

#[utoipa::path(
    get, path = "/order-set-members/{id}", tag = "order-sets",
    params(("id" = i32, Path, description = "Order set member ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_member(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<models::order_set_member::Model>, StatusCode> {
    match order_set_service::get_order_set_member(&state.db, id).await {
        Ok(Some(m)) => Ok(Json(m)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}
