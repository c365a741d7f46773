//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use shopfront_app::domain::products::{data::NewProduct, records::ProductUuid};

use crate::{
    extensions::*,
    products::{get::ProductResponse, into_status_error},
    state::State,
};

/// Create Product Request
///
/// Only the name and price are required. Everything else falls back to sample values.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateProductRequest {
    pub name: String,

    /// The price in cents
    pub price: u64,

    pub description: Option<String>,

    pub images: Option<Vec<String>>,

    pub category: Option<String>,

    pub brand: Option<String>,

    pub stock_quantity: Option<u32>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        let mut product = NewProduct::new(ProductUuid::new(), request.name, request.price);

        if let Some(description) = request.description {
            product.description = description;
        }

        if let Some(images) = request.images.filter(|images| !images.is_empty()) {
            product.images = images;
        }

        if let Some(category) = request.category {
            product.category = category;
        }

        if let Some(brand) = request.brand {
            product.brand = brand;
        }

        if let Some(stock_quantity) = request.stock_quantity {
            product.stock_quantity = stock_quantity;
        }

        product
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authenticated"),
        (status_code = StatusCode::FORBIDDEN, description = "Not an admin"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let product = state
        .app
        .products
        .create_product(actor.user_uuid, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    info!(product = %product.uuid, admin = %actor.user_uuid, "product created");

    res.add_header(LOCATION, format!("/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(product.into()))
}
