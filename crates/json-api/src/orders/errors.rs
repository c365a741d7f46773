//! Errors

use salvo::http::StatusError;
use tracing::error;

use shopfront_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::AddressNotFound => {
            StatusError::not_found().brief("Shipping address not found")
        }
        OrdersServiceError::Forbidden => {
            StatusError::forbidden().brief("Not authorized to access this order")
        }
        OrdersServiceError::EmptyCart => StatusError::bad_request().brief("No order items"),
        OrdersServiceError::MissingShippingAddress => {
            StatusError::bad_request().brief("Shipping address is required")
        }
        OrdersServiceError::InvalidShippingAddress(source) => {
            StatusError::bad_request().brief(format!("Invalid shipping address: {source}"))
        }
        OrdersServiceError::InsufficientStock => {
            StatusError::bad_request().brief("Insufficient stock for one or more items")
        }
        OrdersServiceError::AlreadyExists => {
            StatusError::bad_request().brief("Order already exists")
        }
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Pricing(source) => {
            error!("failed to price order: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Cart(source) => {
            error!("failed to total cart: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
