//! Product Reviews

mod handlers;

pub(crate) use handlers::*;
