//! Order Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToParameters, ToSchema},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use shopfront::pagination::PageRequest;
use uuid::Uuid;

use shopfront_app::domain::orders::data::OrderFilter;

use crate::{
    extensions::*,
    orders::{get::OrderResponse, into_status_error},
    state::State,
};

/// Order listing query
#[derive(Debug, Default, Deserialize, ToParameters)]
#[salvo(parameters(default_parameter_in = Query))]
pub(crate) struct OrderListQuery {
    /// Only orders in this status
    pub status: Option<String>,

    /// Only orders of this buyer
    pub user: Option<Uuid>,

    /// One-based page number
    pub page: Option<i64>,
}

impl OrderListQuery {
    fn into_parts(self) -> Result<(OrderFilter, PageRequest), StatusError> {
        let status = match self.status.as_deref() {
            Some(status) if !status.is_empty() => Some(status.parse().or_400("invalid status")?),
            _ => None,
        };

        let filter = OrderFilter {
            status,
            user: self.user.map(Into::into),
        };

        Ok((filter, PageRequest::new(self.page.unwrap_or(1))))
    }
}

/// Orders Page Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// Newest first
    pub orders: Vec<OrderResponse>,

    pub page: u32,

    /// Total number of pages
    pub pages: u64,

    /// Total number of matching orders
    pub count: u64,
}

/// Order Index Handler
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Page of orders"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Not an admin"),
    ),
)]
pub(crate) async fn handler(
    query: OrderListQuery,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (filter, page) = query.into_parts()?;

    let page = state
        .app
        .orders
        .list_orders(filter, page)
        .await
        .map_err(into_status_error)?
        .map(OrderResponse::from);

    Ok(Json(OrdersResponse {
        orders: page.items,
        page: page.page,
        pages: page.pages,
        count: page.count,
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use shopfront::{orders::OrderStatus, pagination::Page};
    use shopfront_app::domain::orders::{MockOrdersService, records::OrderUuid};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER_UUID, admin, make_order, service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        service(
            Mocks {
                orders,
                ..Mocks::default()
            },
            Some(admin()),
            Router::with_path("orders").get(handler),
        )
    }

    #[tokio::test]
    async fn test_index_filters_by_status_and_user() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|filter, page| {
                *filter
                    == OrderFilter {
                        status: Some(OrderStatus::Shipped),
                        user: Some(TEST_USER_UUID),
                    }
                    && page.page() == 1
            })
            .return_once(|_, page| {
                Ok(Page::new(
                    vec![make_order(OrderUuid::new(), TEST_USER_UUID)],
                    page,
                    1,
                ))
            });

        let response: OrdersResponse = TestClient::get(format!(
            "http://example.com/orders?status=Shipped&user={TEST_USER_UUID}"
        ))
        .send(&make_service(orders))
        .await
        .take_json()
        .await?;

        assert_eq!(response.orders.len(), 1);
        assert_eq!(response.pages, 1);
        assert_eq!(response.count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_unknown_status_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_orders().never();

        let res = TestClient::get("http://example.com/orders?status=Lost")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
