//! Create Review Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use shopfront::reviews::Rating;
use tracing::info;
use uuid::Uuid;

use shopfront_app::domain::products::{data::NewReview, records::ReviewUuid};

use crate::{
    extensions::*,
    products::{into_status_error, reviews::index::ReviewResponse},
    state::State,
};

/// Create Review Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateReviewRequest {
    /// Between 1 and 5
    pub rating: i64,

    #[serde(default)]
    pub comment: String,
}

impl TryFrom<CreateReviewRequest> for NewReview {
    type Error = StatusError;

    fn try_from(request: CreateReviewRequest) -> Result<Self, Self::Error> {
        Ok(NewReview {
            uuid: ReviewUuid::new(),
            rating: Rating::try_from(request.rating).or_400("invalid rating")?,
            comment: request.comment,
        })
    }
}

/// Create Review Handler
///
/// Each user may review a product once.
#[endpoint(
    tags("reviews"),
    summary = "Review Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Review added"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid or repeated review"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authenticated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<CreateReviewRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ReviewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let review = NewReview::try_from(json.into_inner())?;

    let review = state
        .app
        .products
        .add_review(product.into_inner().into(), actor.user_uuid, review)
        .await
        .map_err(into_status_error)?;

    info!(
        product = %review.product_uuid,
        user = %actor.user_uuid,
        rating = review.rating.get(),
        "review added"
    );

    res.status_code(StatusCode::CREATED);

    Ok(Json(review.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use shopfront_app::domain::products::{
        MockProductsService, ProductsServiceError, records::ProductUuid,
    };
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER_UUID, make_review, service, user};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        service(
            Mocks {
                products,
                ..Mocks::default()
            },
            Some(user()),
            Router::with_path("products/{product}/reviews").post(handler),
        )
    }

    #[tokio::test]
    async fn test_create_review_success() -> TestResult {
        let uuid = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_add_review()
            .once()
            .withf(move |product, reviewer, review| {
                *product == uuid
                    && *reviewer == TEST_USER_UUID
                    && review.rating.get() == 4
                    && review.comment == "Great sound"
            })
            .return_once(|product, _, review| Ok(make_review(product, review.rating)));

        let mut res = TestClient::post(format!("http://example.com/products/{uuid}/reviews"))
            .json(&json!({ "rating": 4, "comment": "Great sound" }))
            .send(&make_service(products))
            .await;

        let body: ReviewResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.rating, 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_review_out_of_range_returns_400() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_add_review().never();

        let res = TestClient::post(format!(
            "http://example.com/products/{}/reviews",
            Uuid::now_v7()
        ))
        .json(&json!({ "rating": 6, "comment": "Too good" }))
        .send(&make_service(products))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_second_review_returns_400() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_add_review()
            .once()
            .return_once(|_, _, _| Err(ProductsServiceError::AlreadyReviewed));

        let res = TestClient::post(format!(
            "http://example.com/products/{}/reviews",
            Uuid::now_v7()
        ))
        .json(&json!({ "rating": 3, "comment": "Changed my mind" }))
        .send(&make_service(products))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_missing_product_returns_404() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_add_review()
            .once()
            .return_once(|_, _, _| Err(ProductsServiceError::NotFound));

        let res = TestClient::post(format!(
            "http://example.com/products/{}/reviews",
            Uuid::now_v7()
        ))
        .json(&json!({ "rating": 3, "comment": "Fine" }))
        .send(&make_service(products))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
