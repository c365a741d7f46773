//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use shopfront::catalog::primary_image;
use uuid::Uuid;

use shopfront_app::domain::products::records::{ProductDetails, ProductRecord};

use crate::{
    extensions::*,
    products::{into_status_error, reviews::index::ReviewResponse},
    state::State,
};

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    /// The admin who created the product
    pub user: Uuid,

    pub name: String,

    pub description: String,

    /// The price of the product in cents
    pub price: u64,

    pub images: Vec<String>,

    /// The image shown in listings
    pub image: String,

    pub category: String,

    pub brand: String,

    pub stock_quantity: u32,

    pub num_reviews: u32,

    /// Mean review rating, 0 without reviews
    pub average_rating: f64,

    pub created_at: String,

    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        ProductResponse {
            uuid: product.uuid.into_uuid(),
            user: product.user_uuid.into_uuid(),
            image: primary_image(&product.images).to_string(),
            name: product.name,
            description: product.description,
            price: product.price,
            images: product.images,
            category: product.category,
            brand: product.brand,
            stock_quantity: product.stock_quantity,
            num_reviews: product.num_reviews,
            average_rating: product.average_rating,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Product Details Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductDetailsResponse {
    #[serde(flatten)]
    pub product: ProductResponse,

    /// Reviews, oldest first
    pub reviews: Vec<ReviewResponse>,
}

impl From<ProductDetails> for ProductDetailsResponse {
    fn from(details: ProductDetails) -> Self {
        ProductDetailsResponse {
            product: details.product.into(),
            reviews: details.reviews.into_iter().map(Into::into).collect(),
        }
    }
}

/// Get Product Handler
#[endpoint(
    tags("products"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product with reviews"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductDetailsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let details = state
        .app
        .products
        .get_product(product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(details.into()))
}
