//! App Router

use salvo::Router;

use crate::{auth, cart, orders, products};

/// Routes that require a bearer token.
fn authenticated() -> Router {
    Router::with_hoop(auth::middleware::handler)
}

/// Routes that require an admin bearer token.
fn admin() -> Router {
    authenticated().hoop(auth::middleware::require_admin)
}

/// Every API route, mounted under `prefix`.
pub(crate) fn app_router(prefix: &str) -> Router {
    Router::with_path(prefix)
        .push(auth_router())
        .push(products_router())
        .push(cart_router())
        .push(orders_router())
}

fn auth_router() -> Router {
    Router::with_path("auth")
        .push(Router::with_path("register").post(auth::register::handler))
        .push(Router::with_path("login").post(auth::login::handler))
        .push(
            authenticated().push(
                Router::with_path("me")
                    .get(auth::me::handler)
                    .push(Router::with_path("update").put(auth::update::handler)),
            ),
        )
}

fn products_router() -> Router {
    Router::with_path("products")
        .get(products::index::handler)
        .push(admin().post(products::create::handler))
        .push(
            Router::with_path("{product}")
                .get(products::get::handler)
                .push(
                    admin()
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                )
                .push(
                    Router::with_path("reviews")
                        .get(products::reviews::index::handler)
                        .push(authenticated().post(products::reviews::create::handler)),
                ),
        )
}

fn cart_router() -> Router {
    authenticated().push(
        Router::with_path("cart")
            .get(cart::get::handler)
            .delete(cart::delete::handler)
            .push(
                Router::with_path("items")
                    .post(cart::items::create::handler)
                    .push(
                        Router::with_path("{product}")
                            .put(cart::items::update::handler)
                            .delete(cart::items::delete::handler),
                    ),
            ),
    )
}

fn orders_router() -> Router {
    Router::with_path("orders")
        .push(authenticated().post(orders::create::handler))
        .push(admin().get(orders::index::handler))
        .push(authenticated().push(Router::with_path("myorders").get(orders::mine::handler)))
        .push(
            Router::with_path("{order}")
                .push(authenticated().get(orders::get::handler))
                .push(authenticated().push(Router::with_path("pay").put(orders::pay::handler)))
                .push(
                    admin()
                        .push(Router::with_path("deliver").put(orders::deliver::handler))
                        .push(Router::with_path("status").put(orders::status::handler)),
                ),
        )
}
