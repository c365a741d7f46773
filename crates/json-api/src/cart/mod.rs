//! Shopping Cart

mod errors;
mod handlers;
pub(crate) mod items;

pub(crate) use errors::into_status_error;
pub(crate) use handlers::*;
