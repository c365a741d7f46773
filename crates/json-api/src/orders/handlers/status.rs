//! Order Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use shopfront::orders::OrderStatus;
use tracing::info;
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{get::OrderResponse, into_status_error},
    state::State,
};

/// Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderStatusRequest {
    /// One of Pending, Processing, Shipped, Delivered or Cancelled
    pub status: String,
}

/// Order Status Handler
#[endpoint(
    tags("orders"),
    summary = "Set Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status"),
        (status_code = StatusCode::FORBIDDEN, description = "Not an admin"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<OrderStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let status: OrderStatus = json.into_inner().status.parse().or_400("invalid status")?;

    let order = state
        .app
        .orders
        .set_status(order.into_inner().into(), status)
        .await
        .map_err(into_status_error)?;

    info!(order = %order.uuid, %status, "order status changed");

    Ok(Json(order.into()))
}
