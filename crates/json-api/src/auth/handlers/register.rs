//! Register User Handler

use std::{fmt, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use shopfront_app::{
    auth::{AuthenticatedUser, Registration},
    domain::users::records::UserUuid,
};

use crate::{
    auth::{into_status_error, me::ProfileResponse},
    extensions::*,
    state::State,
};

/// Register Request
#[derive(Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl From<RegisterRequest> for Registration {
    fn from(request: RegisterRequest) -> Self {
        Registration {
            uuid: UserUuid::new(),
            name: request.name,
            email: request.email,
            password: request.password,
        }
    }
}

/// Profile plus a bearer token for subsequent requests.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AuthResponse {
    #[serde(flatten)]
    pub profile: ProfileResponse,

    /// Bearer token, shown once
    pub token: String,
}

impl From<AuthenticatedUser> for AuthResponse {
    fn from(authenticated: AuthenticatedUser) -> Self {
        AuthResponse {
            profile: authenticated.user.into(),
            token: authenticated.token.token,
        }
    }
}

/// Register User Handler
#[endpoint(
    tags("auth"),
    summary = "Register User",
    responses(
        (status_code = StatusCode::CREATED, description = "User registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid or duplicate user"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AuthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let authenticated = state
        .app
        .auth
        .register(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    info!(user = %authenticated.user.uuid, "user registered");

    res.status_code(StatusCode::CREATED);

    Ok(Json(authenticated.into()))
}
