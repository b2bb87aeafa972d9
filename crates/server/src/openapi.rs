use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::routes::order_sets::{CreateOrderSetInput, RetireInput, UpdateOrderSetInput};

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct MaxCycleResponse {
    pub max_cycle: Option<i32>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::order_sets::list,
        crate::routes::order_sets::create,
        crate::routes::order_sets::get,
        crate::routes::order_sets::get_by_uuid,
        crate::routes::order_sets::update,
        crate::routes::order_sets::delete,
        crate::routes::order_sets::retire,
        crate::routes::order_sets::unretire,
        crate::routes::order_sets::parents,
        crate::routes::order_sets::get_member,
        crate::routes::patients::list_order_groups,
        crate::routes::patients::list_drug_orders,
        crate::routes::patients::max_cycle,
    ),
    components(
        schemas(
            HealthResponse,
            MaxCycleResponse,
            CreateOrderSetInput,
            UpdateOrderSetInput,
            RetireInput,
        )
    ),
    tags(
        (name = "health"),
        (name = "order-sets"),
        (name = "patients"),
    )
)]
pub struct ApiDoc;
