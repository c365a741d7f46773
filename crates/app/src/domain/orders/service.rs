//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use shopfront::{
    orders::{OrderStatus, PriceBreakdown},
    pagination::{Page, PageRequest},
};
use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::{
    auth::{Actor, validation},
    database::Db,
    domain::{
        carts::repositories::{PgCartItemsRepository, PgCartsRepository},
        orders::{
            data::{DEFAULT_PAYMENT_METHOD, NewOrder, OrderDraft, OrderFilter, ShippingSelection},
            errors::OrdersServiceError,
            records::{OrderItemRecord, OrderRecord, OrderUuid, PaymentResult},
            repository::PgOrdersRepository,
        },
        products::repository::PgProductsRepository,
        users::{
            records::{PostalAddress, UserUuid},
            repository::PgUsersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    carts: PgCartsRepository,
    cart_items: PgCartItemsRepository,
    products: PgProductsRepository,
    users: PgUsersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            carts: PgCartsRepository::new(),
            cart_items: PgCartItemsRepository::new(),
            products: PgProductsRepository::new(),
            users: PgUsersRepository::new(),
        }
    }

    async fn resolve_shipping(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        buyer: UserUuid,
        shipping: Option<ShippingSelection>,
    ) -> Result<PostalAddress, OrdersServiceError> {
        match shipping {
            None => Err(OrdersServiceError::MissingShippingAddress),
            Some(ShippingSelection::Inline(address)) => {
                validation::address(address).map_err(OrdersServiceError::InvalidShippingAddress)
            }
            Some(ShippingSelection::Saved(address)) => Ok(self
                .users
                .get_address(tx, buyer, address)
                .await?
                .ok_or(OrdersServiceError::AddressNotFound)?
                .address),
        }
    }

    /// Take every ordered quantity out of stock, one product at a time in UUID order.
    async fn take_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[OrderItemRecord],
    ) -> Result<(), OrdersServiceError> {
        let mut lines: Vec<&OrderItemRecord> = items.iter().collect();

        lines.sort_by_key(|item| item.product_uuid);

        for item in lines {
            let taken = self
                .products
                .decrement_stock(tx, item.product_uuid, item.quantity)
                .await?;

            if !taken {
                debug!(product = %item.product_uuid, quantity = item.quantity, "stock exhausted");

                return Err(OrdersServiceError::InsufficientStock);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn place_order(
        &self,
        buyer: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self
            .carts
            .lock_cart(&mut tx, buyer)
            .await?
            .ok_or(OrdersServiceError::EmptyCart)?;

        cart.items = self.cart_items.list_items(&mut tx, cart.uuid).await?;

        if cart.items.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let shipping_address = self
            .resolve_shipping(&mut tx, buyer, order.shipping)
            .await?;

        let totals = cart.cart().totals()?;

        let prices = PriceBreakdown::from_items_price(totals.total_price)?;

        let items: Vec<OrderItemRecord> = cart
            .items
            .into_iter()
            .map(|item| OrderItemRecord {
                product_uuid: item.product_uuid,
                name: item.name,
                image: item.image,
                price: item.price,
                quantity: item.quantity,
            })
            .collect();

        self.take_stock(&mut tx, &items).await?;

        let created = self
            .repository
            .create_order(
                &mut tx,
                OrderDraft {
                    uuid: order.uuid,
                    user_uuid: buyer,
                    shipping_address,
                    payment_method: order
                        .payment_method
                        .filter(|method| !method.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
                    prices,
                    items,
                },
            )
            .await?;

        self.cart_items.replace_items(&mut tx, cart.uuid, &[]).await?;
        self.carts.touch_cart(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_order(
        &self,
        actor: Actor,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.get_order(&mut tx, order).await?;

        tx.commit().await?;

        if !actor.can_access(record.user_uuid) {
            return Err(OrdersServiceError::Forbidden);
        }

        Ok(record)
    }

    async fn list_user_orders(&self, buyer: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self.repository.list_user_orders(&mut tx, buyer).await?;

        tx.commit().await?;

        Ok(records)
    }

    async fn list_orders(
        &self,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let count = self.repository.count_orders(&mut tx, filter).await?;
        let records = self.repository.list_orders(&mut tx, filter, page).await?;

        tx.commit().await?;

        Ok(Page::new(records, page, count))
    }

    async fn mark_paid(
        &self,
        actor: Actor,
        order: OrderUuid,
        payment: PaymentResult,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.lock_order(&mut tx, order).await?;

        if !actor.can_access(record.user_uuid) {
            return Err(OrdersServiceError::Forbidden);
        }

        let mut fulfilment = record.fulfilment;

        fulfilment.mark_paid(Timestamp::now());

        let updated = self
            .repository
            .update_fulfilment(&mut tx, &record, fulfilment, Some(&payment))
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn mark_delivered(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.lock_order(&mut tx, order).await?;

        let mut fulfilment = record.fulfilment;

        fulfilment.mark_delivered(Timestamp::now());

        let updated = self
            .repository
            .update_fulfilment(&mut tx, &record, fulfilment, record.payment_result.as_ref())
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn set_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.lock_order(&mut tx, order).await?;

        let mut fulfilment = record.fulfilment;

        fulfilment.set_status(status, Timestamp::now());

        let updated = self
            .repository
            .update_fulfilment(&mut tx, &record, fulfilment, record.payment_result.as_ref())
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn the cart of `buyer` into an order, taking its items out of stock and emptying the
    /// cart. Nothing is written unless every step succeeds.
    async fn place_order(
        &self,
        buyer: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve an order owned by the actor, or any order for admins.
    async fn get_order(
        &self,
        actor: Actor,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve the orders of a user, newest first.
    async fn list_user_orders(&self, buyer: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Retrieve one page of every user's orders, newest first.
    async fn list_orders(
        &self,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError>;

    /// Record the payment of an order.
    async fn mark_paid(
        &self,
        actor: Actor,
        order: OrderUuid,
        payment: PaymentResult,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Record the delivery of an order.
    async fn mark_delivered(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// Move an order to `status`.
    async fn set_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
