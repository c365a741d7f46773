//! Cart Data

use crate::domain::products::records::ProductUuid;

/// New Cart Item Data
///
/// The quantity is taken as supplied by the caller and validated by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    pub quantity: i64,
}
