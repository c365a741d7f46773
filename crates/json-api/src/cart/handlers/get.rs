//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopfront_app::domain::carts::records::{CartItemRecord, CartRecord};

use crate::{cart::into_status_error, extensions::*, state::State};

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemResponse {
    pub product: Uuid,

    pub name: String,

    pub image: String,

    /// Unit price in cents when the item was added
    pub price: u64,

    pub quantity: u32,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        CartItemResponse {
            product: item.product_uuid.into_uuid(),
            name: item.name,
            image: item.image,
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    pub uuid: Uuid,

    pub user: Uuid,

    pub items: Vec<CartItemResponse>,

    /// Sum of price times quantity, in cents
    pub total_price: u64,

    /// Sum of quantities
    pub total_items: u64,

    pub created_at: String,

    pub updated_at: String,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        CartResponse {
            uuid: cart.uuid.into_uuid(),
            user: cart.user_uuid.into_uuid(),
            items: cart.items.into_iter().map(Into::into).collect(),
            total_price: cart.total_price,
            total_items: cart.total_items,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Get Cart Handler
///
/// Returns the caller's cart, creating an empty one on first use.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "The caller's cart"),
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
        .get_cart(actor.user_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
