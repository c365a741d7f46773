//! Test Helpers

use crate::{
    auth::{AuthServiceError, Registration},
    domain::{
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
        users::records::{PostalAddress, Role, UserUuid},
    },
    test::TestContext,
};

pub(crate) fn registration(email: &str) -> Registration {
    Registration {
        uuid: UserUuid::new(),
        name: "Test User".to_string(),
        email: email.to_string(),
        password: "correct horse".to_string(),
    }
}

/// Create a user directly, returning their UUID.
pub(crate) async fn create_user(
    ctx: &TestContext,
    email: &str,
) -> Result<UserUuid, AuthServiceError> {
    let created = ctx.auth.create_user(registration(email), Role::User).await?;

    Ok(created.user.uuid)
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    creator: UserUuid,
    name: &str,
    price: u64,
    stock_quantity: u32,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(
            creator,
            NewProduct {
                stock_quantity,
                ..NewProduct::new(ProductUuid::new(), name, price)
            },
        )
        .await
}

pub(crate) fn shipping_address() -> PostalAddress {
    PostalAddress {
        street: "1 Market Street".to_string(),
        city: "Springfield".to_string(),
        state: "OR".to_string(),
        postal_code: "97477".to_string(),
        country: "US".to_string(),
    }
}
