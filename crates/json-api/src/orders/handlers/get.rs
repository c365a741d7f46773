//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopfront_app::domain::{
    orders::records::{OrderItemRecord, OrderRecord, PaymentResult},
    users::records::PostalAddress,
};

use crate::{extensions::*, orders::into_status_error, state::State};

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub product: Uuid,
    pub name: String,
    pub image: String,

    /// Unit price in cents at placement
    pub price: u64,

    pub quantity: u32,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        OrderItemResponse {
            product: item.product_uuid.into_uuid(),
            name: item.name,
            image: item.image,
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// Shipping Address Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShippingAddressResponse {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl From<PostalAddress> for ShippingAddressResponse {
    fn from(address: PostalAddress) -> Self {
        ShippingAddressResponse {
            street: address.street,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

/// Payment result as reported by the payment provider.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentResultBody {
    pub id: Option<String>,
    pub status: Option<String>,
    pub update_time: Option<String>,
    pub email_address: Option<String>,
}

impl From<PaymentResult> for PaymentResultBody {
    fn from(payment: PaymentResult) -> Self {
        PaymentResultBody {
            id: payment.id,
            status: payment.status,
            update_time: payment.update_time,
            email_address: payment.email_address,
        }
    }
}

impl From<PaymentResultBody> for PaymentResult {
    fn from(body: PaymentResultBody) -> Self {
        PaymentResult {
            id: body.id,
            status: body.status,
            update_time: body.update_time,
            email_address: body.email_address,
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// The buyer
    pub user: Uuid,

    pub order_items: Vec<OrderItemResponse>,

    pub shipping_address: ShippingAddressResponse,

    pub payment_method: String,

    /// Present once the order is paid
    pub payment_result: Option<PaymentResultBody>,

    /// Amounts in cents
    pub items_price: u64,
    pub shipping_price: u64,
    pub tax_price: u64,
    pub total_price: u64,

    pub is_paid: bool,
    pub paid_at: Option<String>,
    pub is_delivered: bool,
    pub delivered_at: Option<String>,

    /// One of Pending, Processing, Shipped, Delivered or Cancelled
    pub order_status: String,

    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        let fulfilment = order.fulfilment;

        OrderResponse {
            uuid: order.uuid.into_uuid(),
            user: order.user_uuid.into_uuid(),
            order_items: order.items.into_iter().map(Into::into).collect(),
            shipping_address: order.shipping_address.into(),
            payment_method: order.payment_method,
            payment_result: order.payment_result.map(Into::into),
            items_price: order.prices.items_price,
            shipping_price: order.prices.shipping_price,
            tax_price: order.prices.tax_price,
            total_price: order.prices.total_amount,
            is_paid: fulfilment.is_paid(),
            paid_at: fulfilment.paid_at.map(|at| at.to_string()),
            is_delivered: fulfilment.is_delivered(),
            delivered_at: fulfilment.delivered_at.map(|at| at.to_string()),
            order_status: fulfilment.status.to_string(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Get Order Handler
///
/// Buyers see their own orders, admins see every order.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Order belongs to another user"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authenticated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let order = state
        .app
        .orders
        .get_order(actor, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use shopfront_app::domain::orders::{
        MockOrdersService, OrdersServiceError, records::OrderUuid,
    };
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER_UUID, make_order, service, user};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        service(
            Mocks {
                orders,
                ..Mocks::default()
            },
            Some(user()),
            Router::with_path("orders/{order}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_order_returns_placed_order() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |actor, order| *actor == user() && *order == uuid)
            .return_once(move |_, _| Ok(make_order(uuid, TEST_USER_UUID)));

        let response: OrderResponse = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await
            .take_json()
            .await?;

        assert_eq!(response.uuid, uuid.into_uuid());
        assert_eq!(response.order_status, "Pending");
        assert!(!response.is_paid, "new orders are unpaid");
        assert!(!response.is_delivered, "new orders are undelivered");
        assert!(response.payment_result.is_none());
        assert_eq!(response.total_price, 113_50);
        assert_eq!(response.order_items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_foreign_order_returns_403() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::Forbidden));

        let res = TestClient::get(format!("http://example.com/orders/{}", Uuid::now_v7()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", Uuid::now_v7()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
