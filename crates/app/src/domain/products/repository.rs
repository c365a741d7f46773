//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use shopfront::{
    catalog::{ProductFilter, ProductSort, SortDirection, SortField},
    pagination::PageRequest,
    reviews::{Rating, ReviewSummary},
};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::{
    columns::{encode_amount, encode_count, try_get_amount, try_get_count},
    products::{
        data::{NewProduct, NewReview, ProductUpdate},
        records::{ProductRecord, ProductUuid, ReviewRecord, ReviewUuid},
    },
    users::records::UserUuid,
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const COUNT_PRODUCTS_SQL: &str = include_str!("sql/count_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const LOCK_PRODUCT_SQL: &str = include_str!("sql/lock_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");
const LIST_REVIEWS_SQL: &str = include_str!("sql/list_reviews.sql");
const FIND_REVIEW_SQL: &str = include_str!("sql/find_review.sql");
const CREATE_REVIEW_SQL: &str = include_str!("sql/create_review.sql");
const UPDATE_REVIEW_SUMMARY_SQL: &str = include_str!("sql/update_review_summary.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductFilter,
        sort: ProductSort,
        page: PageRequest,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let direction = sort_direction(sort.direction);

        let sql = format!(
            "{LIST_PRODUCTS_SQL}ORDER BY {column} {direction}, uuid {direction}\nLIMIT $6 OFFSET $7",
            column = sort_column(sort.field),
        );

        let offset = i64::try_from(page.offset()).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<Postgres, ProductRecord>(&sql)
            .bind(filter.keyword.as_deref().map(escape_like))
            .bind(filter.category.as_deref())
            .bind(filter.brand.as_deref())
            .bind(filter.min_price.map(encode_amount).transpose()?)
            .bind(filter.max_price.map(encode_amount).transpose()?)
            .bind(i64::from(page.limit()))
            .bind(offset)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductFilter,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_PRODUCTS_SQL)
            .bind(filter.keyword.as_deref().map(escape_like))
            .bind(filter.category.as_deref())
            .bind(filter.brand.as_deref())
            .bind(filter.min_price.map(encode_amount).transpose()?)
            .bind(filter.max_price.map(encode_amount).transpose()?)
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Like [`Self::get_product`], holding a row lock until the transaction ends.
    pub(crate) async fn lock_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LOCK_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        creator: UserUuid,
        product: &NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(creator.into_uuid())
            .bind(&product.name)
            .bind(&product.description)
            .bind(encode_amount(product.price)?)
            .bind(&product.images)
            .bind(&product.category)
            .bind(&product.brand)
            .bind(encode_count(product.stock_quantity)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: &ProductUpdate,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(update.name.as_deref())
            .bind(update.description.as_deref())
            .bind(update.price.map(encode_amount).transpose()?)
            .bind(update.images.as_deref())
            .bind(update.category.as_deref())
            .bind(update.brand.as_deref())
            .bind(update.stock_quantity.map(encode_count).transpose()?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Take `quantity` units out of stock. Returns `false`, changing nothing, when the product
    /// has fewer units than that.
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(encode_count(quantity)?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }

    pub(crate) async fn list_reviews(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Vec<ReviewRecord>, sqlx::Error> {
        query_as::<Postgres, ReviewRecord>(LIST_REVIEWS_SQL)
            .bind(product.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        reviewer: UserUuid,
    ) -> Result<Option<ReviewRecord>, sqlx::Error> {
        query_as::<Postgres, ReviewRecord>(FIND_REVIEW_SQL)
            .bind(product.into_uuid())
            .bind(reviewer.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        reviewer: UserUuid,
        reviewer_name: &str,
        review: &NewReview,
    ) -> Result<ReviewRecord, sqlx::Error> {
        query_as::<Postgres, ReviewRecord>(CREATE_REVIEW_SQL)
            .bind(review.uuid.into_uuid())
            .bind(product.into_uuid())
            .bind(reviewer.into_uuid())
            .bind(reviewer_name)
            .bind(i16::from(review.rating.get()))
            .bind(&review.comment)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_review_summary(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        summary: ReviewSummary,
    ) -> Result<(), sqlx::Error> {
        query(UPDATE_REVIEW_SUMMARY_SQL)
            .bind(product.into_uuid())
            .bind(encode_count(summary.num_reviews)?)
            .bind(summary.average_rating)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

const fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Name => "name",
        SortField::Price => "price",
        SortField::CreatedAt => "created_at",
        SortField::AverageRating => "average_rating",
        SortField::NumReviews => "num_reviews",
        SortField::StockQuantity => "stock_quantity",
    }
}

const fn sort_direction(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "ASC",
        SortDirection::Descending => "DESC",
    }
}

/// Escape `LIKE` wildcards so a keyword only ever matches literally.
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());

    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }

        escaped.push(c);
    }

    escaped
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: try_get_amount(row, "price")?,
            images: row.try_get("images")?,
            category: row.try_get("category")?,
            brand: row.try_get("brand")?,
            stock_quantity: try_get_count(row, "stock_quantity")?,
            num_reviews: try_get_count(row, "num_reviews")?,
            average_rating: row.try_get("average_rating")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ReviewRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let rating: i16 = row.try_get("rating")?;

        Ok(Self {
            uuid: ReviewUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            name: row.try_get("name")?,
            rating: Rating::try_from(i64::from(rating)).map_err(|e| sqlx::Error::ColumnDecode {
                index: "rating".to_string(),
                source: Box::new(e),
            })?,
            comment: row.try_get("comment")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
