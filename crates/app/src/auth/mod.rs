//! Authentication

mod errors;
mod models;
mod passwords;
mod repository;
mod service;
mod token;
pub(crate) mod validation;

pub use errors::*;
pub use models::*;
pub use passwords::{PasswordError, hash_password, verify_password};
pub use service::*;
pub use token::*;
pub use validation::{MIN_PASSWORD_CHARS, ValidationError, address as validate_address};
