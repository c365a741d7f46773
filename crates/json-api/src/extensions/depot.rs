//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};
use shopfront_app::auth::Actor;

/// Helpers for typed depot access that fail with HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the authenticated caller of the current request.
    fn insert_actor(&mut self, actor: Actor);

    /// The authenticated caller, or 401 on routes the auth middleware did not guard.
    fn actor_or_401(&self) -> Result<Actor, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_actor(&mut self, actor: Actor) {
        self.inject(actor);
    }

    fn actor_or_401(&self) -> Result<Actor, StatusError> {
        self.obtain::<Actor>()
            .copied()
            .map_err(|_ignored| StatusError::unauthorized().brief("Not authorized, no token"))
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use shopfront_app::domain::users::records::{Role, UserUuid};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn inserted_actor_can_be_read_back() -> TestResult {
        let actor = Actor {
            user_uuid: UserUuid::new(),
            role: Role::Admin,
        };

        let mut depot = Depot::new();

        depot.insert_actor(actor);

        assert_eq!(depot.actor_or_401()?, actor);

        Ok(())
    }

    #[test]
    fn missing_actor_is_unauthorized() {
        let result = Depot::new().actor_or_401();

        assert!(
            matches!(&result, Err(error) if error.code == StatusCode::UNAUTHORIZED),
            "expected 401, got {result:?}"
        );
    }
}
