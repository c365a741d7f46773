//! Products

mod errors;
mod handlers;
pub(crate) mod reviews;

pub(crate) use errors::into_status_error;
pub(crate) use handlers::*;
