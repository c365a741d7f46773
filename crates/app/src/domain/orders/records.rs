//! Order Records

use jiff::Timestamp;
use shopfront::orders::{Fulfilment, PriceBreakdown};

use crate::{
    domain::{
        products::records::ProductUuid,
        users::records::{PostalAddress, UserUuid},
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<OrderItemRecord>,
    pub shipping_address: PostalAddress,
    pub payment_method: String,
    pub payment_result: Option<PaymentResult>,
    pub prices: PriceBreakdown,
    pub fulfilment: Fulfilment<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item Record, copied from the cart when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub image: String,
    pub price: u64,
    pub quantity: u32,
}

/// Payment provider result, stored as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentResult {
    pub id: Option<String>,
    pub status: Option<String>,
    pub update_time: Option<String>,
    pub email_address: Option<String>,
}
