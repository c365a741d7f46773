//! Pay Order Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{
        get::{OrderResponse, PaymentResultBody},
        into_status_error,
    },
    state::State,
};

/// Pay Order Handler
///
/// Stores the payment provider result on the order.
#[endpoint(
    tags("orders"),
    summary = "Mark Order Paid",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order paid"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Order belongs to another user"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authenticated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<PaymentResultBody>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let order = state
        .app
        .orders
        .mark_paid(actor, order.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    info!(order = %order.uuid, user = %actor.user_uuid, "order paid");

    Ok(Json(order.into()))
}
