//! Products service.

use async_trait::async_trait;
use mockall::automock;
use shopfront::{
    catalog::{ProductFilter, ProductSort},
    pagination::{Page, PageRequest},
    reviews::ReviewSummary,
};

use crate::{
    database::Db,
    domain::{
        products::{
            data::{NewProduct, NewReview, ProductUpdate},
            errors::ProductsServiceError,
            records::{ProductDetails, ProductRecord, ProductUuid, ReviewRecord},
            repository::PgProductsRepository,
        },
        users::{records::UserUuid, repository::PgUsersRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
    users: PgUsersRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
            users: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        filter: ProductFilter,
        sort: ProductSort,
        page: PageRequest,
    ) -> Result<Page<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let count = self.repository.count_products(&mut tx, &filter).await?;

        let products = self
            .repository
            .list_products(&mut tx, &filter, sort, page)
            .await?;

        tx.commit().await?;

        Ok(Page::new(products, page, count))
    }

    async fn get_product(&self, product: ProductUuid) -> Result<ProductDetails, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.get_product(&mut tx, product).await?;
        let reviews = self.repository.list_reviews(&mut tx, product).await?;

        tx.commit().await?;

        Ok(ProductDetails {
            product: record,
            reviews,
        })
    }

    async fn create_product(
        &self,
        creator: UserUuid,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_product(&mut tx, creator, &product)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn add_review(
        &self,
        product: ProductUuid,
        reviewer: UserUuid,
        review: NewReview,
    ) -> Result<ReviewRecord, ProductsServiceError> {
        if review.comment.trim().is_empty() {
            return Err(ProductsServiceError::MissingComment);
        }

        let mut tx = self.db.begin().await?;

        // Serializes reviews of one product so the summary is computed over every review.
        self.repository.lock_product(&mut tx, product).await?;

        if self
            .repository
            .find_review(&mut tx, product, reviewer)
            .await?
            .is_some()
        {
            return Err(ProductsServiceError::AlreadyReviewed);
        }

        let reviewer_name = self
            .users
            .get_user(&mut tx, reviewer)
            .await
            .map_err(|error| match ProductsServiceError::from(error) {
                ProductsServiceError::NotFound => ProductsServiceError::InvalidReference,
                other => other,
            })?
            .name;

        let created = self
            .repository
            .create_review(&mut tx, product, reviewer, &reviewer_name, &review)
            .await
            .map_err(|error| match ProductsServiceError::from(error) {
                ProductsServiceError::AlreadyExists => ProductsServiceError::AlreadyReviewed,
                other => other,
            })?;

        let reviews = self.repository.list_reviews(&mut tx, product).await?;
        let summary = ReviewSummary::from_ratings(reviews.iter().map(|review| review.rating));

        self.repository
            .update_review_summary(&mut tx, product, summary)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_reviews(
        &self,
        product: ProductUuid,
    ) -> Result<Vec<ReviewRecord>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository.get_product(&mut tx, product).await?;

        let reviews = self.repository.list_reviews(&mut tx, product).await?;

        tx.commit().await?;

        Ok(reviews)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieve one page of products matching a filter.
    async fn list_products(
        &self,
        filter: ProductFilter,
        sort: ProductSort,
        page: PageRequest,
    ) -> Result<Page<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product with its reviews.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductDetails, ProductsServiceError>;

    /// Creates a new product owned by `creator`.
    async fn create_product(
        &self,
        creator: UserUuid,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Applies a partial update to a product.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Deletes a product with the given UUID.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;

    /// Adds the single review a user may leave on a product and refreshes its rating.
    async fn add_review(
        &self,
        product: ProductUuid,
        reviewer: UserUuid,
        review: NewReview,
    ) -> Result<ReviewRecord, ProductsServiceError>;

    /// Retrieve the reviews of a product, oldest first.
    async fn list_reviews(
        &self,
        product: ProductUuid,
    ) -> Result<Vec<ReviewRecord>, ProductsServiceError>;
}
