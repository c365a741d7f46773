//! Carts

use thiserror::Error;

use crate::catalog::primary_image;

/// Errors raised while mutating a cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Line quantities must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The product does not have enough stock for the requested quantity.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Quantity that was asked for.
        requested: u32,

        /// Quantity the product currently has in stock.
        available: u32,
    },

    /// The product is not a line item of this cart.
    #[error("item not found in cart")]
    ItemNotFound,

    /// Totals or quantities no longer fit in their integer type.
    #[error("cart arithmetic overflowed")]
    Overflow,
}

/// The catalog view of a product at the moment a cart is mutated.
#[derive(Debug, Clone, Copy)]
pub struct Listing<'a, K> {
    /// Product key.
    pub product: K,

    /// Product name.
    pub name: &'a str,

    /// Product images, in display order.
    pub images: &'a [String],

    /// Unit price in minor units.
    pub price: u64,

    /// Units currently in stock.
    pub stock: u32,
}

/// A product held in a cart, with the product data copied in when it was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem<K> {
    /// Product key.
    pub product: K,

    /// Product name at add time.
    pub name: String,

    /// Product image at add time.
    pub image: String,

    /// Unit price in minor units.
    pub price: u64,

    /// Number of units, always at least one.
    pub quantity: u32,
}

impl<K> LineItem<K> {
    /// Price of the whole line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] when the product does not fit in a `u64`.
    pub fn subtotal(&self) -> Result<u64, CartError> {
        self.price
            .checked_mul(u64::from(self.quantity))
            .ok_or(CartError::Overflow)
    }
}

/// Derived cart totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of `quantity * price` over every line, in minor units.
    pub total_price: u64,

    /// Sum of line quantities.
    pub total_items: u64,
}

/// An ordered collection of line items, at most one per product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart<K> {
    items: Vec<LineItem<K>>,
}

impl<K> Default for Cart<K> {
    fn default() -> Self {
        Cart { items: Vec::new() }
    }
}

impl<K: Copy + PartialEq> Cart<K> {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored line items.
    pub fn with_items(items: impl Into<Vec<LineItem<K>>>) -> Self {
        Cart {
            items: items.into(),
        }
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem<K>] {
        &self.items
    }

    /// Consume the cart, returning its line items.
    pub fn into_items(self) -> Vec<LineItem<K>> {
        self.items
    }

    /// Check if the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Find the line item for a product.
    pub fn item(&self, product: K) -> Option<&LineItem<K>> {
        self.items.iter().find(|item| item.product == product)
    }

    /// Add `quantity` units of a product.
    ///
    /// An existing line keeps its original price and has its quantity increased. Only the
    /// added quantity is checked against stock.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::InsufficientStock`]: the listing has fewer than `quantity` units.
    /// - [`CartError::Overflow`]: the line quantity no longer fits in a `u32`.
    pub fn add_item(&mut self, listing: &Listing<'_, K>, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        check_stock(listing, quantity)?;

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product == listing.product)
        {
            item.quantity = item
                .quantity
                .checked_add(quantity)
                .ok_or(CartError::Overflow)?;

            return Ok(());
        }

        self.items.push(LineItem {
            product: listing.product,
            name: listing.name.to_string(),
            image: primary_image(listing.images).to_string(),
            price: listing.price,
            quantity,
        });

        Ok(())
    }

    /// Overwrite the quantity of an existing line and refresh its price from the listing.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::InsufficientStock`]: the listing has fewer than `quantity` units.
    /// - [`CartError::ItemNotFound`]: the product is not in the cart.
    pub fn update_item(
        &mut self,
        listing: &Listing<'_, K>,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        check_stock(listing, quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|item| item.product == listing.product)
            .ok_or(CartError::ItemNotFound)?;

        item.quantity = quantity;
        item.price = listing.price;

        Ok(())
    }

    /// Remove the line for a product, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if the product is not in the cart.
    pub fn remove_item(&mut self, product: K) -> Result<LineItem<K>, CartError> {
        let position = self
            .items
            .iter()
            .position(|item| item.product == product)
            .ok_or(CartError::ItemNotFound)?;

        Ok(self.items.remove(position))
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Recompute totals from the current line items.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] when a total does not fit in a `u64`.
    pub fn totals(&self) -> Result<CartTotals, CartError> {
        self.items
            .iter()
            .try_fold(CartTotals::default(), |totals, item| {
                Ok(CartTotals {
                    total_price: totals
                        .total_price
                        .checked_add(item.subtotal()?)
                        .ok_or(CartError::Overflow)?,
                    total_items: totals
                        .total_items
                        .checked_add(u64::from(item.quantity))
                        .ok_or(CartError::Overflow)?,
                })
            })
    }
}

fn check_stock<K>(listing: &Listing<'_, K>, quantity: u32) -> Result<(), CartError> {
    if listing.stock < quantity {
        return Err(CartError::InsufficientStock {
            requested: quantity,
            available: listing.stock,
        });
    }

    Ok(())
}
