//! Product Records

use jiff::Timestamp;
use shopfront::{carts::Listing, reviews::Rating};

use crate::{domain::users::records::UserUuid, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Review UUID
pub type ReviewUuid = TypedUuid<ReviewRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub user_uuid: UserUuid,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub images: Vec<String>,
    pub category: String,
    pub brand: String,
    pub stock_quantity: u32,
    pub num_reviews: u32,
    pub average_rating: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductRecord {
    /// The product as seen by a cart at this moment.
    #[must_use]
    pub fn listing(&self) -> Listing<'_, ProductUuid> {
        Listing {
            product: self.uuid,
            name: &self.name,
            images: &self.images,
            price: self.price,
            stock: self.stock_quantity,
        }
    }
}

/// Review Record
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub uuid: ReviewUuid,
    pub product_uuid: ProductUuid,
    pub user_uuid: UserUuid,
    pub name: String,
    pub rating: Rating,
    pub comment: String,
    pub created_at: Timestamp,
}

/// A product with its reviews.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub product: ProductRecord,
    pub reviews: Vec<ReviewRecord>,
}
