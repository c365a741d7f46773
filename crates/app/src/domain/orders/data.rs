//! Order Data

use shopfront::orders::{OrderStatus, PriceBreakdown};

use crate::domain::{
    orders::records::{OrderItemRecord, OrderUuid},
    users::records::{AddressUuid, PostalAddress, UserUuid},
};

/// Payment method recorded when the buyer names none.
pub const DEFAULT_PAYMENT_METHOD: &str = "Stripe";

/// Where an order ships to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShippingSelection {
    /// One of the buyer's saved addresses.
    Saved(AddressUuid),

    /// An address given with the order.
    Inline(PostalAddress),
}

/// New Order Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub shipping: Option<ShippingSelection>,
    pub payment_method: Option<String>,
}

/// Admin order listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub user: Option<UserUuid>,
}

/// A fully resolved order, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OrderDraft {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub shipping_address: PostalAddress,
    pub payment_method: String,
    pub prices: PriceBreakdown,
    pub items: Vec<OrderItemRecord>,
}
