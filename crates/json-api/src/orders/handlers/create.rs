//! Place Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use shopfront_app::{
    auth::validate_address,
    domain::orders::{
        data::{NewOrder, ShippingSelection},
        records::OrderUuid,
    },
};

use crate::{
    auth::update::AddressRequest,
    extensions::*,
    observability::record_order_placed,
    orders::{get::OrderResponse, into_status_error},
    state::State,
};

/// Place Order Request
///
/// Ships to `shippingAddressId` when given, to `shippingAddress` otherwise.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaceOrderRequest {
    /// One of the caller's saved addresses
    #[serde(alias = "savedAddress")]
    pub shipping_address_id: Option<Uuid>,

    pub shipping_address: Option<AddressRequest>,

    /// Defaults to Stripe
    pub payment_method: Option<String>,
}

impl TryFrom<PlaceOrderRequest> for NewOrder {
    type Error = StatusError;

    fn try_from(request: PlaceOrderRequest) -> Result<Self, Self::Error> {
        let shipping = match (request.shipping_address_id, request.shipping_address) {
            (Some(saved), _) => Some(ShippingSelection::Saved(saved.into())),
            (None, Some(address)) => Some(ShippingSelection::Inline(
                validate_address(address.into()).or_400("Invalid shipping address")?,
            )),
            (None, None) => None,
        };

        Ok(NewOrder {
            uuid: OrderUuid::new(),
            shipping,
            payment_method: request
                .payment_method
                .filter(|method| !method.trim().is_empty()),
        })
    }
}

/// Place Order Handler
///
/// Turns the caller's cart into an order and empties the cart.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart, missing or incomplete address, or insufficient stock"),
        (status_code = StatusCode::NOT_FOUND, description = "Saved address not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authenticated"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PlaceOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let order = NewOrder::try_from(json.into_inner())?;

    let order = state
        .app
        .orders
        .place_order(actor.user_uuid, order)
        .await
        .map_err(into_status_error)?;

    record_order_placed();

    info!(
        order = %order.uuid,
        user = %actor.user_uuid,
        total = order.prices.total_amount,
        "order placed"
    );

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
