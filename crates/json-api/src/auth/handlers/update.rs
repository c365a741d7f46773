//! Update Profile Handler

use std::{fmt, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::Deserialize;
use tracing::info;

use shopfront_app::{
    auth::ProfileUpdate,
    domain::users::{data::NewAddress, records::PostalAddress},
};

use crate::{
    auth::{into_status_error, register::AuthResponse},
    extensions::*,
    state::State,
};

/// Postal address as sent by clients.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddressRequest {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl From<AddressRequest> for PostalAddress {
    fn from(request: AddressRequest) -> Self {
        PostalAddress {
            street: request.street,
            city: request.city,
            state: request.state,
            postal_code: request.postal_code,
            country: request.country,
        }
    }
}

/// Address to save on the profile.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SavedAddressRequest {
    #[serde(flatten)]
    pub address: AddressRequest,

    #[serde(default)]
    pub is_default: bool,
}

/// Update Profile Request. Omitted fields are left unchanged.
#[derive(Deserialize, ToSchema)]
pub(crate) struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,

    /// Replaces every saved address when present
    pub addresses: Option<Vec<SavedAddressRequest>>,
}

impl fmt::Debug for UpdateProfileRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateProfileRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("addresses", &self.addresses)
            .finish_non_exhaustive()
    }
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            name: request.name,
            email: request.email,
            password: request.password,
            addresses: request.addresses.map(|addresses| {
                addresses
                    .into_iter()
                    .map(|saved| NewAddress {
                        address: saved.address.into(),
                        is_default: saved.is_default,
                    })
                    .collect()
            }),
        }
    }
}

/// Update Profile Handler
///
/// Applies the changes and returns the profile with a fresh token.
#[endpoint(
    tags("auth"),
    summary = "Update Profile",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid or duplicate field"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authorized"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateProfileRequest>,
    depot: &mut Depot,
) -> Result<Json<AuthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let authenticated = state
        .app
        .auth
        .update_profile(actor.user_uuid, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    info!(user = %actor.user_uuid, "profile updated");

    Ok(Json(authenticated.into()))
}
