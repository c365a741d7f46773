//! Cart Items Repository

use shopfront::carts::LineItem;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    carts::records::{CartItemRecord, CartUuid},
    columns::{encode_amount, encode_count, encode_position, try_get_amount, try_get_count},
    products::records::ProductUuid,
};

const LIST_CART_ITEMS_SQL: &str = include_str!("../sql/list_cart_items.sql");
const DELETE_CART_ITEMS_SQL: &str = include_str!("../sql/delete_cart_items.sql");
const CREATE_CART_ITEMS_SQL: &str = include_str!("../sql/create_cart_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartItemRecord>, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(LIST_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Replace every line of a cart, keeping the given order.
    pub(crate) async fn replace_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        items: &[LineItem<ProductUuid>],
    ) -> Result<(), sqlx::Error> {
        query(DELETE_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?;

        if items.is_empty() {
            return Ok(());
        }

        let products: Vec<Uuid> = items.iter().map(|item| item.product.into_uuid()).collect();

        let positions = (0..items.len())
            .map(encode_position)
            .collect::<Result<Vec<i32>, _>>()?;

        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
        let images: Vec<&str> = items.iter().map(|item| item.image.as_str()).collect();

        let prices = items
            .iter()
            .map(|item| encode_amount(item.price))
            .collect::<Result<Vec<i64>, _>>()?;

        let quantities = items
            .iter()
            .map(|item| encode_count(item.quantity))
            .collect::<Result<Vec<i32>, _>>()?;

        query(CREATE_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .bind(products)
            .bind(positions)
            .bind(names)
            .bind(images)
            .bind(prices)
            .bind(quantities)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for CartItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            image: row.try_get("image")?,
            price: try_get_amount(row, "price")?,
            quantity: try_get_count(row, "quantity")?,
        })
    }
}
