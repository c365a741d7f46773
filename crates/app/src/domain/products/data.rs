//! Products Data

use shopfront::{catalog::PLACEHOLDER_IMAGE, reviews::Rating};

use crate::domain::products::records::{ProductUuid, ReviewUuid};

pub const DEFAULT_DESCRIPTION: &str = "Sample description";
pub const DEFAULT_CATEGORY: &str = "Sample category";
pub const DEFAULT_BRAND: &str = "Sample brand";

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub images: Vec<String>,
    pub category: String,
    pub brand: String,
    pub stock_quantity: u32,
}

impl NewProduct {
    /// A product with placeholder description, category, brand and image, and no stock.
    #[must_use]
    pub fn new(uuid: ProductUuid, name: impl Into<String>, price: u64) -> Self {
        Self {
            uuid,
            name: name.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            price,
            images: vec![PLACEHOLDER_IMAGE.to_string()],
            category: DEFAULT_CATEGORY.to_string(),
            brand: DEFAULT_BRAND.to_string(),
            stock_quantity: 0,
        }
    }
}

/// Product Update Data. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub stock_quantity: Option<u32>,
}

/// New Review Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub uuid: ReviewUuid,
    pub rating: Rating,
    pub comment: String,
}
