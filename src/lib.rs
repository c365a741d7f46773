//! Shopfront
//!
//! Shopfront is the domain core of a small online shop: carts and their totals, order pricing
//! and fulfilment status, review ratings, and catalog listing parameters. It performs no I/O.

pub mod carts;
pub mod catalog;
pub mod orders;
pub mod pagination;
pub mod reviews;
