//! Orders

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

/// Items totals strictly above this ship free, in minor units.
pub const FREE_SHIPPING_THRESHOLD: u64 = 100_00;

/// Shipping charged at or below the free-shipping threshold, in minor units.
pub const FLAT_SHIPPING_PRICE: u64 = 10_00;

/// Sales tax rate applied to the items total.
pub const TAX_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Errors raised while pricing an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A price no longer fits in a `u64`.
    #[error("order price overflowed")]
    Overflow,
}

/// Order prices, all in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    /// Sum of line prices.
    pub items_price: u64,

    /// Shipping charge.
    pub shipping_price: u64,

    /// Sales tax.
    pub tax_price: u64,

    /// Amount payable.
    pub total_amount: u64,
}

impl PriceBreakdown {
    /// Price an order from its items total.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit in a `u64`.
    pub fn from_items_price(items_price: u64) -> Result<Self, PricingError> {
        let shipping_price = if items_price > FREE_SHIPPING_THRESHOLD {
            0
        } else {
            FLAT_SHIPPING_PRICE
        };

        let tax_price = (Decimal::from(items_price) * TAX_RATE)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .ok_or(PricingError::Overflow)?;

        let total_amount = items_price
            .checked_add(shipping_price)
            .and_then(|total| total.checked_add(tax_price))
            .ok_or(PricingError::Overflow)?;

        Ok(PriceBreakdown {
            items_price,
            shipping_price,
            tax_price,
            total_amount,
        })
    }
}

/// Errors raised while parsing an order status.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderStatusError {
    /// The value is not one of the known statuses.
    #[error("invalid order status `{0}`")]
    Unknown(String),
}

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderStatus {
    /// Placed, not yet picked up.
    #[default]
    Pending,

    /// Being prepared.
    Processing,

    /// Handed to the carrier.
    Shipped,

    /// Received by the customer.
    Delivered,

    /// Will not be fulfilled.
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// The canonical name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| OrderStatusError::Unknown(s.to_string()))
    }
}

/// Status, payment and delivery facts of an order.
///
/// `T` is the timestamp type of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fulfilment<T> {
    /// Current status.
    pub status: OrderStatus,

    /// When the order was paid, if it has been.
    pub paid_at: Option<T>,

    /// When the order was delivered, if it has been.
    pub delivered_at: Option<T>,
}

impl<T> Default for Fulfilment<T> {
    fn default() -> Self {
        Fulfilment {
            status: OrderStatus::Pending,
            paid_at: None,
            delivered_at: None,
        }
    }
}

impl<T> Fulfilment<T> {
    /// A freshly placed order.
    pub fn placed() -> Self {
        Self::default()
    }

    /// Whether the order has been paid.
    pub fn is_paid(&self) -> bool {
        self.paid_at.is_some()
    }

    /// Whether the order has been delivered.
    pub fn is_delivered(&self) -> bool {
        self.delivered_at.is_some()
    }

    /// Record payment. Paying again moves the payment time.
    pub fn mark_paid(&mut self, at: T) {
        self.paid_at = Some(at);
    }

    /// Record delivery and move to [`OrderStatus::Delivered`].
    pub fn mark_delivered(&mut self, at: T) {
        self.delivered_at = Some(at);
        self.status = OrderStatus::Delivered;
    }

    /// Move to any status. Reaching [`OrderStatus::Delivered`] the first time records delivery.
    pub fn set_status(&mut self, status: OrderStatus, at: T) {
        if status == OrderStatus::Delivered && !self.is_delivered() {
            self.delivered_at = Some(at);
        }

        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn shipping_is_charged_at_threshold() -> TestResult {
        let prices = PriceBreakdown::from_items_price(100_00)?;

        assert_eq!(prices.shipping_price, 10_00);

        Ok(())
    }

    #[test]
    fn shipping_is_free_above_threshold() -> TestResult {
        let prices = PriceBreakdown::from_items_price(101_00)?;

        assert_eq!(prices.shipping_price, 0);

        Ok(())
    }

    #[test]
    fn tax_is_fifteen_percent() -> TestResult {
        let prices = PriceBreakdown::from_items_price(200_00)?;

        assert_eq!(
            prices,
            PriceBreakdown {
                items_price: 200_00,
                shipping_price: 0,
                tax_price: 30_00,
                total_amount: 230_00,
            }
        );

        Ok(())
    }

    #[test]
    fn tax_rounds_half_away_from_zero() -> TestResult {
        // 0.15 * 10 = 1.5 minor units
        assert_eq!(PriceBreakdown::from_items_price(10)?.tax_price, 2);
        // 0.15 * 3 = 0.45 minor units
        assert_eq!(PriceBreakdown::from_items_price(3)?.tax_price, 0);

        Ok(())
    }

    #[test]
    fn empty_items_price_only_pays_shipping() -> TestResult {
        let prices = PriceBreakdown::from_items_price(0)?;

        assert_eq!(prices.total_amount, FLAT_SHIPPING_PRICE);

        Ok(())
    }

    #[test]
    fn total_overflow_is_reported() {
        assert_eq!(
            PriceBreakdown::from_items_price(u64::MAX),
            Err(PricingError::Overflow)
        );
    }

    #[test]
    fn status_round_trips_through_its_name() -> TestResult {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>()?, status);
        }

        Ok(())
    }

    #[test]
    fn status_parse_is_case_sensitive() {
        assert_eq!(
            "delivered".parse::<OrderStatus>(),
            Err(OrderStatusError::Unknown("delivered".to_string()))
        );
    }

    #[test]
    fn placed_order_is_pending_unpaid_undelivered() {
        let fulfilment = Fulfilment::<u32>::placed();

        assert_eq!(fulfilment.status, OrderStatus::Pending);
        assert!(!fulfilment.is_paid(), "new order should be unpaid");
        assert!(!fulfilment.is_delivered(), "new order should be undelivered");
    }

    #[test]
    fn mark_delivered_sets_status_and_time() {
        let mut fulfilment = Fulfilment::placed();

        fulfilment.mark_delivered(7);

        assert_eq!(fulfilment.status, OrderStatus::Delivered);
        assert_eq!(fulfilment.delivered_at, Some(7));
    }

    #[test]
    fn set_status_delivered_records_delivery_once() {
        let mut fulfilment = Fulfilment::placed();

        fulfilment.set_status(OrderStatus::Delivered, 1);
        fulfilment.set_status(OrderStatus::Shipped, 2);
        fulfilment.set_status(OrderStatus::Delivered, 3);

        assert_eq!(fulfilment.status, OrderStatus::Delivered);
        assert_eq!(fulfilment.delivered_at, Some(1));
    }

    #[test]
    fn cancelled_keeps_payment_and_delivery() {
        let mut fulfilment = Fulfilment::placed();

        fulfilment.mark_paid(4);
        fulfilment.set_status(OrderStatus::Cancelled, 5);

        assert_eq!(fulfilment.status, OrderStatus::Cancelled);
        assert_eq!(fulfilment.paid_at, Some(4));
        assert!(!fulfilment.is_delivered(), "cancelling should not deliver");
    }
}
