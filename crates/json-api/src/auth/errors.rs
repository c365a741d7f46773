//! Auth Errors

use salvo::http::StatusError;
use tracing::error;

use shopfront_app::auth::AuthServiceError;

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid email or password")
        }
        AuthServiceError::InvalidToken => {
            StatusError::unauthorized().brief("Not authorized, token failed")
        }
        AuthServiceError::NotFound => StatusError::not_found().brief("User not found"),
        AuthServiceError::AlreadyExists => StatusError::bad_request().brief("User already exists"),
        AuthServiceError::Validation(source) => StatusError::bad_request().brief(source.to_string()),
        AuthServiceError::InvalidReference
        | AuthServiceError::MissingRequiredData
        | AuthServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid user payload")
        }
        AuthServiceError::TokenLifetime(source) => {
            error!("failed to compute token expiry: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Password(source) => {
            error!("failed to process password: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Token(source) => {
            error!("failed to process api token: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Sql(source) => {
            error!("auth storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
