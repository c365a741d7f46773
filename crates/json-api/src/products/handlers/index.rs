//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToParameters, ToSchema},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use shopfront::{
    catalog::{ProductFilter, ProductSort},
    pagination::PageRequest,
};

use crate::{
    extensions::*,
    products::{get::ProductResponse, into_status_error},
    state::State,
};

/// Product listing query
#[derive(Debug, Default, Deserialize, ToParameters)]
#[salvo(parameters(default_parameter_in = Query))]
pub(crate) struct ProductListQuery {
    /// Case-insensitive substring of the product name
    pub keyword: Option<String>,

    pub category: Option<String>,

    pub brand: Option<String>,

    /// Lowest price in cents
    pub min_price: Option<u64>,

    /// Highest price in cents
    pub max_price: Option<u64>,

    /// Ordering such as `price_asc`; newest first when absent
    pub sort: Option<String>,

    /// One-based page number
    pub page: Option<i64>,
}

impl ProductListQuery {
    fn into_parts(self) -> Result<(ProductFilter, ProductSort, PageRequest), StatusError> {
        let sort = match self.sort.as_deref() {
            Some(sort) if !sort.is_empty() => sort.parse().or_400("invalid sort")?,
            _ => ProductSort::default(),
        };

        let filter = ProductFilter {
            keyword: self.keyword.filter(|keyword| !keyword.trim().is_empty()),
            category: self.category.filter(|category| !category.is_empty()),
            brand: self.brand.filter(|brand| !brand.is_empty()),
            min_price: self.min_price,
            max_price: self.max_price,
        };

        Ok((filter, sort, PageRequest::new(self.page.unwrap_or(1))))
    }
}

/// Products Page Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// Products on this page
    pub products: Vec<ProductResponse>,

    pub page: u32,

    /// Total number of pages
    pub pages: u64,

    /// Total number of matching products
    pub count: u64,
}

/// Product Index Handler
///
/// Returns one page of products, ten at a time.
#[endpoint(
    tags("products"),
    summary = "List Products",
    responses(
        (status_code = StatusCode::OK, description = "Page of products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    query: ProductListQuery,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (filter, sort, page) = query.into_parts()?;

    let page = state
        .app
        .products
        .list_products(filter, sort, page)
        .await
        .map_err(into_status_error)?
        .map(ProductResponse::from);

    Ok(Json(ProductsResponse {
        products: page.items,
        page: page.page,
        pages: page.pages,
        count: page.count,
    }))
}
