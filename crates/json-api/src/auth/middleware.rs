//! Auth middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use shopfront_app::auth::AuthServiceError;
use tracing::{Span, field::display};

use crate::{auth::into_status_error, extensions::*, state::State};

/// Resolve the bearer token to an [`Actor`](shopfront_app::auth::Actor) for the rest of the
/// request.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Not authorized, no token"));

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => state,
        Err(error) => {
            res.render(error);

            return;
        }
    };

    let actor = match state.app.auth.authenticate_bearer(token).await {
        Ok(actor) => actor,
        Err(AuthServiceError::NotFound) => {
            res.render(StatusError::unauthorized().brief("Not authorized, token failed"));

            return;
        }
        Err(error) => {
            res.render(into_status_error(error));

            return;
        }
    };

    Span::current().record("user", display(actor.user_uuid));

    depot.insert_actor(actor);

    ctrl.call_next(req, depot, res).await;
}

/// Let only admins through. Must run after [`handler`].
#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match depot.actor_or_401() {
        Ok(actor) if actor.is_admin() => {
            ctrl.call_next(req, depot, res).await;
        }
        Ok(_) => res.render(StatusError::forbidden().brief("Not authorized as an admin")),
        Err(error) => res.render(error),
    }
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
