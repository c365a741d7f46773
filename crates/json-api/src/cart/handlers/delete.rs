//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;
use tracing::info;

use crate::{
    cart::{get::CartResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Clear Cart Handler
///
/// Removes every item, returning the now empty cart.
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart cleared"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authenticated"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let cart = state
        .app
        .carts
        .clear_cart(actor.user_uuid)
        .await
        .map_err(into_status_error)?;

    info!(user = %actor.user_uuid, "cart cleared");

    Ok(Json(cart.into()))
}
