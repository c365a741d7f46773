//! Review Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopfront_app::domain::products::records::ReviewRecord;

use crate::{extensions::*, products::into_status_error, state::State};

/// Review Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewResponse {
    pub uuid: Uuid,

    /// The reviewer
    pub user: Uuid,

    /// The reviewer's display name
    pub name: String,

    /// Between 1 and 5
    pub rating: u8,

    pub comment: String,

    pub created_at: String,
}

impl From<ReviewRecord> for ReviewResponse {
    fn from(review: ReviewRecord) -> Self {
        ReviewResponse {
            uuid: review.uuid.into_uuid(),
            user: review.user_uuid.into_uuid(),
            name: review.name,
            rating: review.rating.get(),
            comment: review.comment,
            created_at: review.created_at.to_string(),
        }
    }
}

/// Reviews Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewsResponse {
    /// Reviews, oldest first
    pub reviews: Vec<ReviewResponse>,
}

/// Review Index Handler
#[endpoint(
    tags("reviews"),
    summary = "List Product Reviews",
    responses(
        (status_code = StatusCode::OK, description = "Reviews of the product"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ReviewsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let reviews = state
        .app
        .products
        .list_reviews(product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(ReviewsResponse {
        reviews: reviews.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use shopfront::reviews::Rating;
    use shopfront_app::domain::products::{
        MockProductsService, ProductsServiceError, records::ProductUuid,
    };
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER_UUID, make_review, service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        service(
            Mocks {
                products,
                ..Mocks::default()
            },
            None,
            Router::with_path("products/{product}/reviews").get(handler),
        )
    }

    #[tokio::test]
    async fn test_index_lists_reviews() -> TestResult {
        let uuid = ProductUuid::new();
        let five = Rating::try_from(5)?;
        let two = Rating::try_from(2)?;

        let mut products = MockProductsService::new();

        products
            .expect_list_reviews()
            .once()
            .withf(move |product| *product == uuid)
            .return_once(move |_| Ok(vec![make_review(uuid, five), make_review(uuid, two)]));

        let response: ReviewsResponse =
            TestClient::get(format!("http://example.com/products/{uuid}/reviews"))
                .send(&make_service(products))
                .await
                .take_json()
                .await?;

        let ratings: Vec<u8> = response.reviews.iter().map(|review| review.rating).collect();

        assert_eq!(ratings, [5, 2]);
        assert!(
            response
                .reviews
                .iter()
                .all(|review| review.user == TEST_USER_UUID.into_uuid()),
            "expected the reviewer on every review"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_index_missing_product_returns_404() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_list_reviews()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        let res = TestClient::get(format!(
            "http://example.com/products/{}/reviews",
            Uuid::now_v7()
        ))
        .send(&make_service(products))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
