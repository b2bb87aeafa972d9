use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::ServerState;
use models::order_group::OrderGroupKind;
use service::db::order_group_service;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct GroupsQuery {
    /// Group subtype: `order_group` or `drug_regimen`
    #[param(value_type = Option<String>)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DrugOrdersQuery {
    /// Indication concept filter
    pub indication: Option<i32>,
    /// Inclusive lower bound on start date (RFC 3339)
    #[param(value_type = Option<String>)]
    pub start_after: Option<DateTime<FixedOffset>>,
    /// Exclusive upper bound on start date (RFC 3339)
    #[param(value_type = Option<String>)]
    pub start_before: Option<DateTime<FixedOffset>>,
}

#[utoipa::path(
    get, path = "/patients/{patient_id}/order-groups", tag = "patients",
    params(("patient_id" = i32, Path, description = "Patient ID"), GroupsQuery),
    responses(
        (status = 200, description = "Non-voided groups for the patient"),
        (status = 400, description = "Unknown group kind")
    )
)]
pub async fn list_order_groups(
    State(state): State<ServerState>,
    Path(patient_id): Path<i32>,
    Query(q): Query<GroupsQuery>,
) -> Result<Json<Vec<models::order_group::Model>>, JsonApiError> {
    let kind = match q.kind.as_deref() {
        Some(raw) => raw
            .parse::<OrderGroupKind>()
            .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string())))?,
        None => OrderGroupKind::OrderGroup,
    };
    let groups = order_group_service::get_order_groups_for_patient(&state.db, patient_id, kind).await?;
    info!(patient_id, kind = kind.as_str(), count = groups.len(), "list order groups");
    Ok(Json(groups))
}

#[utoipa::path(
    get, path = "/patients/{patient_id}/drug-orders", tag = "patients",
    params(("patient_id" = i32, Path, description = "Patient ID"), DrugOrdersQuery),
    responses(
        (status = 200, description = "Non-voided drug orders in the window"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list_drug_orders(
    State(state): State<ServerState>,
    Path(patient_id): Path<i32>,
    Query(q): Query<DrugOrdersQuery>,
) -> Result<Json<Vec<models::drug_order::Model>>, JsonApiError> {
    let orders = order_group_service::get_drug_orders_for_patient(
        &state.db,
        patient_id,
        q.indication,
        q.start_after,
        q.start_before,
    )
    .await?;
    Ok(Json(orders))
}

#[utoipa::path(
    get, path = "/patients/{patient_id}/regimens/{regimen_id}/max-cycle", tag = "patients",
    params(
        ("patient_id" = i32, Path, description = "Patient ID"),
        ("regimen_id" = i32, Path, description = "Drug regimen ID")
    ),
    responses(
        (status = 200, description = "Maximum recorded cycle number, null when none"),
        (status = 404, description = "Regimen Not Found")
    )
)]
pub async fn max_cycle(
    State(state): State<ServerState>,
    Path((patient_id, regimen_id)): Path<(i32, i32)>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let regimen = order_group_service::get_drug_regimen(&state.db, regimen_id)
        .await?
        .ok_or_else(|| JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("drug regimen not found".into())))?;
    let max = order_group_service::get_max_cycle_number(&state.db, patient_id, &regimen).await?;
    Ok(Json(serde_json::json!({ "max_cycle": max })))
}
