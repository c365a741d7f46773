//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use shopfront::{
    orders::{Fulfilment, PriceBreakdown},
    reviews::Rating,
};
use shopfront_app::{
    auth::{
        Actor, ApiTokenMetadata, ApiTokenVersion, AuthenticatedUser, IssuedApiToken,
        MockAuthService,
    },
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            records::{CartItemRecord, CartRecord, CartUuid},
        },
        orders::{
            MockOrdersService,
            records::{OrderItemRecord, OrderRecord, OrderUuid},
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid, ReviewRecord, ReviewUuid},
        },
        users::records::{PostalAddress, Role, UserRecord, UserUuid},
    },
};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_ADMIN_UUID: UserUuid = UserUuid::from_uuid(Uuid::max());

pub(crate) fn user() -> Actor {
    Actor {
        user_uuid: TEST_USER_UUID,
        role: Role::User,
    }
}

pub(crate) fn admin() -> Actor {
    Actor {
        user_uuid: TEST_ADMIN_UUID,
        role: Role::Admin,
    }
}

/// Service mocks backing a test state. Mocks without expectations panic when called.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) auth: MockAuthService,
    pub(crate) products: MockProductsService,
    pub(crate) carts: MockCartsService,
    pub(crate) orders: MockOrdersService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            auth: Arc::new(self.auth),
            products: Arc::new(self.products),
            carts: Arc::new(self.carts),
            orders: Arc::new(self.orders),
        })
    }
}

/// Stands in for the auth middleware by injecting a fixed caller.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InjectActor(pub(crate) Actor);

#[salvo::async_trait]
impl Handler for InjectActor {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_actor(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

/// A service for `route`, called by `actor` when given, anonymously otherwise.
pub(crate) fn service(mocks: Mocks, actor: Option<Actor>, route: Router) -> Service {
    let mut router = Router::new().hoop(inject(mocks.into_state()));

    if let Some(actor) = actor {
        router = router.hoop(InjectActor(actor));
    }

    Service::new(router.push(route))
}

pub(crate) fn make_user(uuid: UserUuid) -> UserRecord {
    UserRecord {
        uuid,
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        role: Role::User,
        addresses: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_authenticated(user: UserUuid) -> AuthenticatedUser {
    AuthenticatedUser {
        user: make_user(user),
        token: IssuedApiToken {
            token: "sf_v1_token".to_string(),
            metadata: ApiTokenMetadata {
                uuid: Uuid::now_v7(),
                user_uuid: user,
                version: ApiTokenVersion::V1,
                created_at: Timestamp::UNIX_EPOCH,
                last_used_at: None,
                expires_at: None,
                revoked_at: None,
            },
        },
    }
}

pub(crate) fn make_product(uuid: ProductUuid, price: u64) -> ProductRecord {
    ProductRecord {
        uuid,
        user_uuid: TEST_ADMIN_UUID,
        name: "Airpods".to_string(),
        description: "Wireless earbuds".to_string(),
        price,
        images: vec!["/images/airpods.jpg".to_string()],
        category: "Electronics".to_string(),
        brand: "Apple".to_string(),
        stock_quantity: 10,
        num_reviews: 0,
        average_rating: 0.0,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_review(product: ProductUuid, rating: Rating) -> ReviewRecord {
    ReviewRecord {
        uuid: ReviewUuid::new(),
        product_uuid: product,
        user_uuid: TEST_USER_UUID,
        name: "Test User".to_string(),
        rating,
        comment: "Great sound".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart(items: Vec<CartItemRecord>) -> CartRecord {
    let total_price = items
        .iter()
        .map(|item| item.price * u64::from(item.quantity))
        .sum();

    let total_items = items.iter().map(|item| u64::from(item.quantity)).sum();

    CartRecord {
        uuid: CartUuid::new(),
        user_uuid: TEST_USER_UUID,
        items,
        total_price,
        total_items,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart_item(product: ProductUuid, price: u64, quantity: u32) -> CartItemRecord {
    CartItemRecord {
        product_uuid: product,
        name: "Airpods".to_string(),
        image: "/images/airpods.jpg".to_string(),
        price,
        quantity,
    }
}

pub(crate) fn shipping_address() -> PostalAddress {
    PostalAddress {
        street: "1 Main Street".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: "62701".to_string(),
        country: "US".to_string(),
    }
}

pub(crate) fn make_order(uuid: OrderUuid, owner: UserUuid) -> OrderRecord {
    OrderRecord {
        uuid,
        user_uuid: owner,
        items: vec![OrderItemRecord {
            product_uuid: ProductUuid::new(),
            name: "Airpods".to_string(),
            image: "/images/airpods.jpg".to_string(),
            price: 45_00,
            quantity: 2,
        }],
        shipping_address: shipping_address(),
        payment_method: "Stripe".to_string(),
        payment_result: None,
        prices: PriceBreakdown {
            items_price: 90_00,
            shipping_price: 10_00,
            tax_price: 13_50,
            total_amount: 113_50,
        },
        fulfilment: Fulfilment::placed(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
