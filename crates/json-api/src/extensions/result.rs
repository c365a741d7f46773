//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::error;

/// Map any error to an HTTP error.
pub(crate) trait ResultExt<T> {
    /// Log the error and answer 500.
    fn or_500(self, context: &str) -> Result<T, StatusError>;

    /// Answer 400 with the error as the message.
    fn or_400(self, context: &str) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            StatusError::internal_server_error()
        })
    }

    fn or_400(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| StatusError::bad_request().brief(format!("{context}: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn or_400_keeps_the_error_message() {
        let result: Result<(), StatusError> =
            Err::<(), _>("unknown sort field").or_400("invalid sort");

        assert!(
            matches!(
                &result,
                Err(error) if error.code == StatusCode::BAD_REQUEST
                    && error.brief == "invalid sort: unknown sort field"
            ),
            "expected 400, got {result:?}"
        );
    }

    #[test]
    fn or_500_hides_the_error() {
        let result: Result<(), StatusError> = Err::<(), _>("connection reset").or_500("query");

        assert!(
            matches!(&result, Err(error) if error.code == StatusCode::INTERNAL_SERVER_ERROR),
            "expected 500, got {result:?}"
        );
    }
}
