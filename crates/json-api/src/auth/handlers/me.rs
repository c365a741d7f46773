//! Current User Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopfront_app::domain::users::records::{AddressRecord, UserRecord};

use crate::{auth::into_status_error, extensions::*, state::State};

/// Saved Address Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddressResponse {
    pub uuid: Uuid,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
}

impl From<AddressRecord> for AddressResponse {
    fn from(record: AddressRecord) -> Self {
        let address = record.address;

        AddressResponse {
            uuid: record.uuid.into_uuid(),
            street: address.street,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
            is_default: record.is_default,
        }
    }
}

/// User Profile Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProfileResponse {
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub addresses: Vec<AddressResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserRecord> for ProfileResponse {
    fn from(user: UserRecord) -> Self {
        ProfileResponse {
            uuid: user.uuid.into_uuid(),
            name: user.name,
            email: user.email,
            is_admin: user.role.is_admin(),
            addresses: user.addresses.into_iter().map(Into::into).collect(),
            created_at: user.created_at.to_string(),
            updated_at: user.updated_at.to_string(),
        }
    }
}

/// Current User Handler
///
/// Returns the profile of the caller.
#[endpoint(
    tags("auth"),
    summary = "Get Profile",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authorized"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProfileResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let user = state
        .app
        .auth
        .profile(actor.user_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
