//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{
    cart::{get::CartResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Remove Cart Item Handler
#[endpoint(
    tags("cart"),
    summary = "Remove Item from Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or item not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authenticated"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let product = product.into_inner();

    let cart = state
        .app
        .carts
        .remove_item(actor.user_uuid, product.into())
        .await
        .map_err(into_status_error)?;

    info!(user = %actor.user_uuid, %product, "cart item removed");

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use shopfront_app::domain::{
        carts::{CartsServiceError, MockCartsService},
        products::records::ProductUuid,
    };
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER_UUID, make_cart, make_cart_item, service, user};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        service(
            Mocks {
                carts,
                ..Mocks::default()
            },
            Some(user()),
            Router::with_path("cart/items/{product}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_remove_item_keeps_other_items() -> TestResult {
        let removed = ProductUuid::new();
        let kept = ProductUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .withf(move |user, product| *user == TEST_USER_UUID && *product == removed)
            .return_once(move |_, _| Ok(make_cart(vec![make_cart_item(kept, 10_00, 1)])));

        let response: CartResponse =
            TestClient::delete(format!("http://example.com/cart/items/{removed}"))
                .send(&make_service(carts))
                .await
                .take_json()
                .await?;

        assert_eq!(response.items.len(), 1);
        assert!(
            response
                .items
                .iter()
                .all(|item| item.product == kept.into_uuid()),
            "expected only the kept product"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_from_missing_cart_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/cart/items/{}", Uuid::now_v7()))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
