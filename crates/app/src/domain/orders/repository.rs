//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use shopfront::{
    orders::{Fulfilment, OrderStatus, PriceBreakdown},
    pagination::PageRequest,
};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    columns::{encode_amount, encode_count, encode_position, try_get_amount, try_get_count},
    orders::{
        data::{OrderDraft, OrderFilter},
        records::{OrderItemRecord, OrderRecord, OrderUuid, PaymentResult},
    },
    products::records::ProductUuid,
    users::records::{PostalAddress, UserUuid},
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEMS_SQL: &str = include_str!("sql/create_order_items.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("sql/list_user_orders.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("sql/count_orders.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");
const UPDATE_FULFILMENT_SQL: &str = include_str!("sql/update_fulfilment.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert an order and its items.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderDraft,
    ) -> Result<OrderRecord, sqlx::Error> {
        let address = &order.shipping_address;

        let mut record = query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user_uuid.into_uuid())
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.postal_code)
            .bind(&address.country)
            .bind(&order.payment_method)
            .bind(encode_amount(order.prices.items_price)?)
            .bind(encode_amount(order.prices.tax_price)?)
            .bind(encode_amount(order.prices.shipping_price)?)
            .bind(encode_amount(order.prices.total_amount)?)
            .fetch_one(&mut **tx)
            .await?;

        self.create_items(tx, order.uuid, &order.items).await?;

        record.items = order.items;

        Ok(record)
    }

    async fn create_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        items: &[OrderItemRecord],
    ) -> Result<(), sqlx::Error> {
        let positions = (0..items.len())
            .map(encode_position)
            .collect::<Result<Vec<i32>, _>>()?;

        let products: Vec<Uuid> = items
            .iter()
            .map(|item| item.product_uuid.into_uuid())
            .collect();

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

        query(CREATE_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .bind(positions)
            .bind(products)
            .bind(names)
            .bind(images)
            .bind(prices)
            .bind(quantities)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let record = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.with_items(tx, vec![record]).await?.pop().ok_or(sqlx::Error::RowNotFound)
    }

    /// Like [`Self::get_order`], holding a row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let record = query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.with_items(tx, vec![record]).await?.pop().ok_or(sqlx::Error::RowNotFound)
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        buyer: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let records = query_as::<Postgres, OrderRecord>(LIST_USER_ORDERS_SQL)
            .bind(buyer.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        self.with_items(tx, records).await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let offset = i64::try_from(page.offset()).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        let records = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(filter.status.map(OrderStatus::as_str))
            .bind(filter.user.map(UserUuid::into_uuid))
            .bind(i64::from(page.limit()))
            .bind(offset)
            .fetch_all(&mut **tx)
            .await?;

        self.with_items(tx, records).await
    }

    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: OrderFilter,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_ORDERS_SQL)
            .bind(filter.status.map(OrderStatus::as_str))
            .bind(filter.user.map(UserUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }

    /// Store the status, payment and delivery facts of an order.
    pub(crate) async fn update_fulfilment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderRecord,
        fulfilment: Fulfilment<Timestamp>,
        payment: Option<&PaymentResult>,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, OrderRecord>(UPDATE_FULFILMENT_SQL)
            .bind(order.uuid.into_uuid())
            .bind(fulfilment.status.as_str())
            .bind(fulfilment.paid_at.map(SqlxTimestamp::from))
            .bind(fulfilment.delivered_at.map(SqlxTimestamp::from))
            .bind(payment.and_then(|payment| payment.id.as_deref()))
            .bind(payment.and_then(|payment| payment.status.as_deref()))
            .bind(payment.and_then(|payment| payment.update_time.as_deref()))
            .bind(payment.and_then(|payment| payment.email_address.as_deref()))
            .fetch_one(&mut **tx)
            .await?;

        record.items.clone_from(&order.items);

        Ok(record)
    }

    /// Attach the items of each order, keeping the order of `records`.
    async fn with_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut records: Vec<OrderRecord>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        if records.is_empty() {
            return Ok(records);
        }

        let uuids: Vec<Uuid> = records.iter().map(|record| record.uuid.into_uuid()).collect();

        let rows = query_as::<Postgres, OrderItemRow>(LIST_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut grouped: FxHashMap<OrderUuid, Vec<OrderItemRecord>> = FxHashMap::default();

        for row in rows {
            grouped.entry(row.order_uuid).or_default().push(row.item);
        }

        for record in &mut records {
            record.items = grouped.remove(&record.uuid).unwrap_or_default();
        }

        Ok(records)
    }
}

struct OrderItemRow {
    order_uuid: OrderUuid,
    item: OrderItemRecord,
}

impl<'r> FromRow<'r, PgRow> for OrderItemRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            item: OrderItemRecord {
                product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                name: row.try_get("name")?,
                image: row.try_get("image")?,
                price: try_get_amount(row, "price")?,
                quantity: try_get_count(row, "quantity")?,
            },
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("order_status")?;

        let paid_at = row
            .try_get::<Option<SqlxTimestamp>, _>("paid_at")?
            .map(SqlxTimestamp::to_jiff);

        let payment_result = match paid_at {
            Some(_) => Some(PaymentResult {
                id: row.try_get("payment_id")?,
                status: row.try_get("payment_status")?,
                update_time: row.try_get("payment_update_time")?,
                email_address: row.try_get("payment_email_address")?,
            }),
            None => None,
        };

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            items: Vec::new(),
            shipping_address: PostalAddress {
                street: row.try_get("shipping_street")?,
                city: row.try_get("shipping_city")?,
                state: row.try_get("shipping_state")?,
                postal_code: row.try_get("shipping_postal_code")?,
                country: row.try_get("shipping_country")?,
            },
            payment_method: row.try_get("payment_method")?,
            payment_result,
            prices: PriceBreakdown {
                items_price: try_get_amount(row, "items_price")?,
                shipping_price: try_get_amount(row, "shipping_price")?,
                tax_price: try_get_amount(row, "tax_price")?,
                total_amount: try_get_amount(row, "total_amount")?,
            },
            fulfilment: Fulfilment {
                status: status.parse().map_err(|e| sqlx::Error::ColumnDecode {
                    index: "order_status".to_string(),
                    source: Box::new(e),
                })?,
                paid_at,
                delivered_at: row
                    .try_get::<Option<SqlxTimestamp>, _>("delivered_at")?
                    .map(SqlxTimestamp::to_jiff),
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
