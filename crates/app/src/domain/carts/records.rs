//! Cart Records

use jiff::Timestamp;
use shopfront::carts::{Cart, CartError, LineItem};

use crate::{
    domain::{products::records::ProductUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<CartItemRecord>,
    pub total_price: u64,
    pub total_items: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartRecord {
    /// The line items as a cart aggregate.
    #[must_use]
    pub fn cart(&self) -> Cart<ProductUuid> {
        Cart::with_items(
            self.items
                .iter()
                .cloned()
                .map(LineItem::from)
                .collect::<Vec<_>>(),
        )
    }

    /// Replace the line items with those of `cart`, recomputing the totals.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] when a total does not fit in a `u64`.
    pub fn with_cart(self, cart: Cart<ProductUuid>) -> Result<Self, CartError> {
        let totals = cart.totals()?;

        Ok(Self {
            items: cart.into_items().into_iter().map(CartItemRecord::from).collect(),
            total_price: totals.total_price,
            total_items: totals.total_items,
            ..self
        })
    }
}

/// Cart Item Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemRecord {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub image: String,
    pub price: u64,
    pub quantity: u32,
}

impl From<CartItemRecord> for LineItem<ProductUuid> {
    fn from(item: CartItemRecord) -> Self {
        Self {
            product: item.product_uuid,
            name: item.name,
            image: item.image,
            price: item.price,
            quantity: item.quantity,
        }
    }
}

impl From<LineItem<ProductUuid>> for CartItemRecord {
    fn from(item: LineItem<ProductUuid>) -> Self {
        Self {
            product_uuid: item.product,
            name: item.name,
            image: item.image,
            price: item.price,
            quantity: item.quantity,
        }
    }
}
