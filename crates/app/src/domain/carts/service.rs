//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use shopfront::carts::Cart;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            records::CartRecord,
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        products::{
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    /// Lock the cart of `user`, creating it first when absent.
    async fn open_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        self.carts_repository.ensure_cart(tx, user).await?;

        self.find_cart(tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)
    }

    /// Lock the cart of `user` and load its items.
    async fn find_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<CartRecord>, CartsServiceError> {
        let Some(mut cart) = self.carts_repository.lock_cart(tx, user).await? else {
            return Ok(None);
        };

        cart.items = self.items_repository.list_items(tx, cart.uuid).await?;

        Ok(Some(cart))
    }

    async fn find_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, CartsServiceError> {
        self.products_repository
            .get_product(tx, product)
            .await
            .map_err(|error| match CartsServiceError::from(error) {
                CartsServiceError::NotFound => CartsServiceError::ProductNotFound,
                other => other,
            })
    }

    /// Persist the items of `cart` and return the refreshed record.
    async fn save_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        record: &CartRecord,
        cart: Cart<ProductUuid>,
    ) -> Result<CartRecord, CartsServiceError> {
        self.items_repository
            .replace_items(tx, record.uuid, cart.items())
            .await?;

        let touched = self.carts_repository.touch_cart(tx, record.uuid).await?;

        Ok(touched.with_cart(cart)?)
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.open_cart(&mut tx, user).await?;

        tx.commit().await?;

        let cart = record.cart();

        Ok(record.with_cart(cart)?)
    }

    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError> {
        let quantity = positive_quantity(item.quantity)?;

        let mut tx = self.db.begin().await?;

        let record = self.open_cart(&mut tx, user).await?;
        let product = self.find_product(&mut tx, item.product_uuid).await?;

        let mut cart = record.cart();

        cart.add_item(&product.listing(), quantity)?;

        let saved = self.save_cart(&mut tx, &record, cart).await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn update_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<CartRecord, CartsServiceError> {
        if quantity <= 0 {
            return self.remove_item(user, product).await;
        }

        let quantity = positive_quantity(quantity)?;

        let mut tx = self.db.begin().await?;

        let record = self
            .find_cart(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let product = self.find_product(&mut tx, product).await?;

        let mut cart = record.cart();

        cart.update_item(&product.listing(), quantity)?;

        let saved = self.save_cart(&mut tx, &record, cart).await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self
            .find_cart(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let mut cart = record.cart();

        cart.remove_item(product)?;

        let saved = self.save_cart(&mut tx, &record, cart).await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn clear_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.open_cart(&mut tx, user).await?;

        let saved = self.save_cart(&mut tx, &record, Cart::new()).await?;

        tx.commit().await?;

        Ok(saved)
    }
}

fn positive_quantity(quantity: i64) -> Result<u32, CartsServiceError> {
    u32::try_from(quantity)
        .ok()
        .filter(|quantity| *quantity > 0)
        .ok_or(CartsServiceError::InvalidQuantity)
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the cart of a user, creating an empty one if absent.
    async fn get_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;

    /// Add units of a product, merging with an existing line for it.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Overwrite the quantity of a line. A quantity of zero or less removes the line.
    async fn update_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove the line for a product.
    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove every line from the cart of a user.
    async fn clear_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::{ProductsService, data::ProductUpdate},
        test::{
            TestContext,
            helpers::{create_product, create_user},
        },
    };

    use super::*;

    fn item(product: ProductUuid, quantity: i64) -> NewCartItem {
        NewCartItem {
            product_uuid: product,
            quantity,
        }
    }

    #[tokio::test]
    async fn get_cart_creates_empty_cart_once() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "shopper@example.com").await?;

        let first = ctx.carts.get_cart(user).await?;
        let second = ctx.carts.get_cart(user).await?;

        assert_eq!(first.uuid, second.uuid);
        assert_eq!(first.user_uuid, user);
        assert!(first.items.is_empty());
        assert_eq!(first.total_price, 0);
        assert_eq!(first.total_items, 0);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_snapshots_product_and_totals() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = create_user(&ctx, "admin@example.com").await?;
        let user = create_user(&ctx, "shopper@example.com").await?;
        let product = create_product(&ctx, admin, "Lamp", 25_00, 5).await?;

        let cart = ctx.carts.add_item(user, item(product.uuid, 2)).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_price, 50_00);
        assert_eq!(cart.total_items, 2);

        let line = cart.items.first().ok_or("missing line item")?;

        assert_eq!(line.product_uuid, product.uuid);
        assert_eq!(line.name, "Lamp");
        assert_eq!(line.image, "/images/sample.jpg");
        assert_eq!(line.price, 25_00);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_twice_merges_and_keeps_price() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = create_user(&ctx, "admin@example.com").await?;
        let user = create_user(&ctx, "shopper@example.com").await?;
        let product = create_product(&ctx, admin, "Lamp", 25_00, 3).await?;

        ctx.carts.add_item(user, item(product.uuid, 2)).await?;

        ctx.products
            .update_product(
                product.uuid,
                ProductUpdate {
                    price: Some(30_00),
                    ..ProductUpdate::default()
                },
            )
            .await?;

        let cart = ctx.carts.add_item(user, item(product.uuid, 3)).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_items, 5);
        assert_eq!(cart.total_price, 125_00);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_rejects_invalid_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = create_user(&ctx, "admin@example.com").await?;
        let user = create_user(&ctx, "shopper@example.com").await?;
        let product = create_product(&ctx, admin, "Lamp", 25_00, 3).await?;

        let result = ctx.carts.add_item(user, item(product.uuid, 0)).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_beyond_stock_returns_insufficient_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = create_user(&ctx, "admin@example.com").await?;
        let user = create_user(&ctx, "shopper@example.com").await?;
        let product = create_product(&ctx, admin, "Lamp", 25_00, 1).await?;

        let result = ctx.carts.add_item(user, item(product.uuid, 2)).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::InsufficientStock {
                    requested: 2,
                    available: 1
                })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_unknown_product_returns_product_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "shopper@example.com").await?;

        let result = ctx.carts.add_item(user, item(ProductUuid::new(), 1)).await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_item_overwrites_quantity_and_refreshes_price() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = create_user(&ctx, "admin@example.com").await?;
        let user = create_user(&ctx, "shopper@example.com").await?;
        let product = create_product(&ctx, admin, "Lamp", 25_00, 10).await?;

        ctx.carts.add_item(user, item(product.uuid, 2)).await?;

        ctx.products
            .update_product(
                product.uuid,
                ProductUpdate {
                    price: Some(20_00),
                    ..ProductUpdate::default()
                },
            )
            .await?;

        let cart = ctx.carts.update_item(user, product.uuid, 4).await?;

        assert_eq!(cart.total_items, 4);
        assert_eq!(cart.total_price, 80_00);

        Ok(())
    }

    #[tokio::test]
    async fn update_item_with_zero_quantity_removes_line() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = create_user(&ctx, "admin@example.com").await?;
        let user = create_user(&ctx, "shopper@example.com").await?;
        let lamp = create_product(&ctx, admin, "Lamp", 25_00, 10).await?;
        let chair = create_product(&ctx, admin, "Chair", 40_00, 10).await?;

        ctx.carts.add_item(user, item(lamp.uuid, 1)).await?;
        ctx.carts.add_item(user, item(chair.uuid, 1)).await?;

        let updated = ctx.carts.update_item(user, lamp.uuid, 0).await?;

        assert_eq!(
            updated.items.iter().map(|i| i.product_uuid).collect::<Vec<_>>(),
            vec![chair.uuid]
        );
        assert_eq!(updated.total_price, 40_00);

        Ok(())
    }

    #[tokio::test]
    async fn update_item_missing_line_returns_item_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = create_user(&ctx, "admin@example.com").await?;
        let user = create_user(&ctx, "shopper@example.com").await?;
        let product = create_product(&ctx, admin, "Lamp", 25_00, 10).await?;

        ctx.carts.get_cart(user).await?;

        let result = ctx.carts.update_item(user, product.uuid, 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_without_cart_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "shopper@example.com").await?;

        let result = ctx.carts.remove_item(user, ProductUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_empties_items_and_is_idempotent() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = create_user(&ctx, "admin@example.com").await?;
        let user = create_user(&ctx, "shopper@example.com").await?;
        let product = create_product(&ctx, admin, "Lamp", 25_00, 10).await?;

        ctx.carts.add_item(user, item(product.uuid, 3)).await?;

        let cleared = ctx.carts.clear_cart(user).await?;
        let cleared_again = ctx.carts.clear_cart(user).await?;
        let fetched = ctx.carts.get_cart(user).await?;

        assert!(cleared.items.is_empty());
        assert_eq!(cleared.total_price, 0);
        assert!(cleared_again.items.is_empty());
        assert!(fetched.items.is_empty());
        assert_eq!(fetched.total_items, 0);

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_without_cart_succeeds() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "shopper@example.com").await?;

        let cleared = ctx.carts.clear_cart(user).await?;

        assert!(cleared.items.is_empty());

        Ok(())
    }
}
