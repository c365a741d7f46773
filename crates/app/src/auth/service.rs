//! Auth service.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        Actor, ApiTokenSecret, ApiTokenVersion, AuthServiceError, AuthenticatedUser, Credentials,
        IssuedApiToken, ProfileUpdate, Registration, ValidationError, format_api_token,
        hash_password, models::NewApiToken, parse_api_token, repository::PgAuthRepository,
        token_verifier, validation, verifiers_match, verify_password,
    },
    database::Db,
    domain::users::{
        data::{NewAddress, NewUser, UserUpdate},
        records::{Role, UserRecord, UserUuid},
        repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    tokens: PgAuthRepository,
    users: PgUsersRepository,
    token_ttl: Option<SignedDuration>,
}

impl PgAuthService {
    /// Tokens expire `token_ttl` after issue, or never when `None`.
    #[must_use]
    pub fn new(db: Db, token_ttl: Option<SignedDuration>) -> Self {
        Self {
            db,
            tokens: PgAuthRepository::new(),
            users: PgUsersRepository::new(),
            token_ttl,
        }
    }

    /// Create a user with the given role and issue their first token.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is invalid, the email is taken, or storage fails.
    pub async fn create_user(
        &self,
        registration: Registration,
        role: Role,
    ) -> Result<AuthenticatedUser, AuthServiceError> {
        let name = validation::name(&registration.name)?;
        let email = validation::email(&registration.email)?;

        validation::password(&registration.password)?;

        let password_hash = hash_password(registration.password).await?;

        let mut tx = self.db.begin().await?;

        let user = self
            .users
            .create_user(
                &mut tx,
                &NewUser {
                    uuid: registration.uuid,
                    name,
                    email,
                    password_hash,
                    role,
                },
            )
            .await?;

        let token = self.issue_api_token(&mut tx, user.uuid).await?;

        tx.commit().await?;

        Ok(AuthenticatedUser { user, token })
    }

    /// Grant the admin role to the user with the given email.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::NotFound`] if no user has that email.
    pub async fn promote_user(&self, email: &str) -> Result<UserRecord, AuthServiceError> {
        let email = validation::email(email)?;

        let mut tx = self.db.begin().await?;

        let user = self
            .users
            .set_role_by_email(&mut tx, &email, Role::Admin)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let revoked = self.tokens.revoke_api_token(&mut tx, token_uuid).await?;

        tx.commit().await?;

        Ok(revoked.is_some())
    }

    async fn issue_api_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_uuid: UserUuid,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = ApiTokenSecret::generate();
        let token = format_api_token(token_uuid, version, &secret);

        let expires_at = self
            .token_ttl
            .map(|ttl| Timestamp::now().checked_add(ttl))
            .transpose()
            .map_err(AuthServiceError::TokenLifetime)?;

        let pruned = self.tokens.prune_user_api_tokens(tx, user_uuid).await?;

        if pruned > 0 {
            debug!(user = %user_uuid, pruned, "pruned dead api tokens");
        }

        let metadata = self
            .tokens
            .create_api_token(
                tx,
                &NewApiToken {
                    uuid: token_uuid,
                    user_uuid,
                    version,
                    token_hash: token_verifier(token_uuid, version, user_uuid, &secret),
                    expires_at,
                },
            )
            .await?;

        Ok(IssuedApiToken { token, metadata })
    }

    async fn touch_api_token(&self, token_uuid: Uuid) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin().await?;

        self.tokens
            .touch_api_token_last_used(&mut tx, token_uuid)
            .await?;

        tx.commit().await
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn register(
        &self,
        registration: Registration,
    ) -> Result<AuthenticatedUser, AuthServiceError> {
        self.create_user(registration, Role::User).await
    }

    async fn login(&self, credentials: Credentials) -> Result<AuthenticatedUser, AuthServiceError> {
        let email =
            validation::email(&credentials.email).map_err(|_| AuthServiceError::InvalidCredentials)?;

        let mut tx = self.db.begin().await?;

        let stored = self
            .users
            .find_credentials(&mut tx, &email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        tx.commit().await?;

        if !verify_password(credentials.password, stored.password_hash).await? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let mut tx = self.db.begin().await?;

        let user = self.users.get_user(&mut tx, stored.uuid).await?;
        let token = self.issue_api_token(&mut tx, user.uuid).await?;

        tx.commit().await?;

        Ok(AuthenticatedUser { user, token })
    }

    async fn profile(&self, user: UserUuid) -> Result<UserRecord, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self.users.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn update_profile(
        &self,
        user: UserUuid,
        update: ProfileUpdate,
    ) -> Result<AuthenticatedUser, AuthServiceError> {
        let name = update.name.as_deref().map(validation::name).transpose()?;
        let email = update.email.as_deref().map(validation::email).transpose()?;

        let addresses = update
            .addresses
            .map(|addresses| {
                addresses
                    .into_iter()
                    .map(|saved| -> Result<NewAddress, ValidationError> {
                        Ok(NewAddress {
                            address: validation::address(saved.address)?,
                            is_default: saved.is_default,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let password_hash = match update.password {
            Some(password) => {
                validation::password(&password)?;

                Some(hash_password(password).await?)
            }
            None => None,
        };

        let password_changed = password_hash.is_some();

        let mut tx = self.db.begin().await?;

        if let Some(addresses) = &addresses {
            self.users
                .replace_addresses(&mut tx, user, addresses)
                .await?;
        }

        let record = self
            .users
            .update_user(
                &mut tx,
                user,
                &UserUpdate {
                    name,
                    email,
                    password_hash,
                },
            )
            .await?;

        let token = self.issue_api_token(&mut tx, user).await?;

        if password_changed {
            let revoked = self
                .tokens
                .revoke_user_api_tokens(&mut tx, user, token.metadata.uuid)
                .await?;

            info!(user = %user, revoked, "password changed, earlier tokens revoked");
        }

        tx.commit().await?;

        Ok(AuthenticatedUser {
            user: record,
            token,
        })
    }

    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Actor, AuthServiceError> {
        let parsed = parse_api_token(bearer_token).map_err(|_| AuthServiceError::InvalidToken)?;

        let mut tx = self.db.begin().await?;

        let token = self
            .tokens
            .find_active_api_token(&mut tx, parsed.token_uuid, parsed.version)
            .await?
            .ok_or(AuthServiceError::InvalidToken)?;

        tx.commit().await?;

        if token.version != parsed.version {
            return Err(AuthServiceError::InvalidToken);
        }

        let expected = token_verifier(
            parsed.token_uuid,
            parsed.version,
            token.user_uuid,
            &parsed.secret,
        );

        if !verifiers_match(&expected, &token.token_hash) {
            return Err(AuthServiceError::InvalidToken);
        }

        // Authentication does not depend on this write.
        if let Err(error) = self.touch_api_token(parsed.token_uuid).await {
            warn!(%error, token_uuid = %parsed.token_uuid, "failed to record token use");
        }

        Ok(Actor {
            user_uuid: token.user_uuid,
            role: token.role,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a regular user and issue a token.
    async fn register(
        &self,
        registration: Registration,
    ) -> Result<AuthenticatedUser, AuthServiceError>;

    /// Check credentials and issue a token.
    async fn login(&self, credentials: Credentials) -> Result<AuthenticatedUser, AuthServiceError>;

    /// Retrieve a user's profile.
    async fn profile(&self, user: UserUuid) -> Result<UserRecord, AuthServiceError>;

    /// Apply profile changes and issue a fresh token.
    async fn update_profile(
        &self,
        user: UserUuid,
        update: ProfileUpdate,
    ) -> Result<AuthenticatedUser, AuthServiceError>;

    /// Resolve a bearer token to the calling user.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Actor, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        auth::ValidationError,
        domain::users::{data::NewAddress, records::PostalAddress},
        test::{TestContext, helpers::registration},
    };

    use super::*;

    #[tokio::test]
    async fn register_issues_working_token() -> TestResult {
        let ctx = TestContext::new().await;

        let registered = ctx.auth.register(registration("ada@example.com")).await?;
        let actor = ctx
            .auth
            .authenticate_bearer(&registered.token.token)
            .await?;

        assert_eq!(registered.user.role, Role::User);
        assert_eq!(actor.user_uuid, registered.user.uuid);
        assert_eq!(actor.role, Role::User);

        Ok(())
    }

    #[tokio::test]
    async fn register_lower_cases_email() -> TestResult {
        let ctx = TestContext::new().await;

        let registered = ctx.auth.register(registration("Ada@Example.COM")).await?;

        assert_eq!(registered.user.email, "ada@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn register_duplicate_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.auth.register(registration("ada@example.com")).await?;

        let result = ctx.auth.register(registration("ADA@example.com")).await;

        assert!(
            matches!(result, Err(AuthServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn register_short_password_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .auth
            .register(Registration {
                password: "12345".to_string(),
                ..registration("ada@example.com")
            })
            .await;

        assert!(
            matches!(
                result,
                Err(AuthServiceError::Validation(ValidationError::PasswordTooShort))
            ),
            "expected PasswordTooShort, got {result:?}"
        );
    }

    #[tokio::test]
    async fn login_with_correct_password_succeeds() -> TestResult {
        let ctx = TestContext::new().await;

        let registered = ctx.auth.register(registration("ada@example.com")).await?;

        let logged_in = ctx
            .auth
            .login(Credentials {
                email: "ADA@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await?;

        assert_eq!(logged_in.user.uuid, registered.user.uuid);
        assert_ne!(logged_in.token.token, registered.token.token);

        Ok(())
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.auth.register(registration("ada@example.com")).await?;

        let result = ctx
            .auth
            .login(Credentials {
                email: "ada@example.com".to_string(),
                password: "wrong horse".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn login_with_unknown_email_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .auth
            .login(Credentials {
                email: "nobody@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_profile_keeps_absent_fields_and_replaces_addresses() -> TestResult {
        let ctx = TestContext::new().await;

        let registered = ctx.auth.register(registration("ada@example.com")).await?;

        let address = NewAddress {
            address: PostalAddress {
                street: "1 Analytical Way".to_string(),
                city: "London".to_string(),
                state: "London".to_string(),
                postal_code: "N1 1AA".to_string(),
                country: "UK".to_string(),
            },
            is_default: true,
        };

        let updated = ctx
            .auth
            .update_profile(
                registered.user.uuid,
                ProfileUpdate {
                    name: Some("Ada Lovelace".to_string()),
                    addresses: Some(vec![address.clone()]),
                    ..ProfileUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.user.name, "Ada Lovelace");
        assert_eq!(updated.user.email, "ada@example.com");
        assert_eq!(updated.user.addresses.len(), 1);
        assert_eq!(
            updated.user.addresses.first().map(|saved| &saved.address),
            Some(&address.address)
        );
        assert_ne!(updated.token.token, registered.token.token);

        let cleared = ctx
            .auth
            .update_profile(
                registered.user.uuid,
                ProfileUpdate {
                    addresses: Some(Vec::new()),
                    ..ProfileUpdate::default()
                },
            )
            .await?;

        assert!(cleared.user.addresses.is_empty(), "addresses should be cleared");

        Ok(())
    }

    #[tokio::test]
    async fn update_profile_with_new_password_allows_login() -> TestResult {
        let ctx = TestContext::new().await;

        let registered = ctx.auth.register(registration("ada@example.com")).await?;

        ctx.auth
            .update_profile(
                registered.user.uuid,
                ProfileUpdate {
                    password: Some("battery staple".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await?;

        ctx.auth
            .login(Credentials {
                email: "ada@example.com".to_string(),
                password: "battery staple".to_string(),
            })
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn update_profile_with_new_password_revokes_earlier_tokens() -> TestResult {
        let ctx = TestContext::new().await;

        let registered = ctx.auth.register(registration("ada@example.com")).await?;

        let logged_in = ctx
            .auth
            .login(Credentials {
                email: "ada@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await?;

        let updated = ctx
            .auth
            .update_profile(
                registered.user.uuid,
                ProfileUpdate {
                    password: Some("battery staple".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await?;

        for stale in [&registered.token.token, &logged_in.token.token] {
            let result = ctx.auth.authenticate_bearer(stale).await;

            assert!(
                matches!(result, Err(AuthServiceError::InvalidToken)),
                "expected InvalidToken, got {result:?}"
            );
        }

        let actor = ctx.auth.authenticate_bearer(&updated.token.token).await?;

        assert_eq!(actor.user_uuid, registered.user.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn update_profile_without_password_keeps_earlier_tokens() -> TestResult {
        let ctx = TestContext::new().await;

        let registered = ctx.auth.register(registration("ada@example.com")).await?;

        ctx.auth
            .update_profile(
                registered.user.uuid,
                ProfileUpdate {
                    name: Some("Ada Lovelace".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await?;

        ctx.auth
            .authenticate_bearer(&registered.token.token)
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn update_profile_rejects_blank_address_fields() -> TestResult {
        let ctx = TestContext::new().await;

        let registered = ctx.auth.register(registration("ada@example.com")).await?;

        let result = ctx
            .auth
            .update_profile(
                registered.user.uuid,
                ProfileUpdate {
                    addresses: Some(vec![NewAddress {
                        address: PostalAddress {
                            street: "1 Analytical Way".to_string(),
                            city: "London".to_string(),
                            state: "London".to_string(),
                            postal_code: " ".to_string(),
                            country: "UK".to_string(),
                        },
                        is_default: true,
                    }]),
                    ..ProfileUpdate::default()
                },
            )
            .await;

        assert!(
            matches!(
                result,
                Err(AuthServiceError::Validation(ValidationError::IncompleteAddress(
                    "postal code"
                )))
            ),
            "expected IncompleteAddress, got {result:?}"
        );

        let profile = ctx.auth.profile(registered.user.uuid).await?;

        assert!(profile.addresses.is_empty(), "no address should be saved");

        Ok(())
    }

    #[tokio::test]
    async fn issuing_a_token_prunes_revoked_ones() -> TestResult {
        let ctx = TestContext::new().await;

        let registered = ctx.auth.register(registration("ada@example.com")).await?;

        ctx.auth
            .revoke_api_token(registered.token.metadata.uuid)
            .await?;

        ctx.auth
            .login(Credentials {
                email: "ada@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await?;

        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE user_uuid = $1")
                .bind(registered.user.uuid.into_uuid())
                .fetch_one(ctx.db.pool())
                .await?;

        assert_eq!(remaining, 1);

        Ok(())
    }

    #[tokio::test]
    async fn authenticate_rejects_malformed_and_revoked_tokens() -> TestResult {
        let ctx = TestContext::new().await;

        let registered = ctx.auth.register(registration("ada@example.com")).await?;

        let malformed = ctx.auth.authenticate_bearer("not-a-token").await;

        assert!(
            matches!(malformed, Err(AuthServiceError::InvalidToken)),
            "expected InvalidToken, got {malformed:?}"
        );

        assert!(
            ctx.auth
                .revoke_api_token(registered.token.metadata.uuid)
                .await?
        );

        let revoked = ctx.auth.authenticate_bearer(&registered.token.token).await;

        assert!(
            matches!(revoked, Err(AuthServiceError::InvalidToken)),
            "expected InvalidToken, got {revoked:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn authenticate_rejects_tampered_secret() -> TestResult {
        let ctx = TestContext::new().await;

        let registered = ctx.auth.register(registration("ada@example.com")).await?;

        let (identifier, _secret) = registered
            .token
            .token
            .split_once('.')
            .ok_or("token should contain a secret")?;

        let tampered = format!("{identifier}.{}", "0".repeat(64));

        let result = ctx.auth.authenticate_bearer(&tampered).await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidToken)),
            "expected InvalidToken, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn expired_tokens_are_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let expired_auth = PgAuthService::new(
            Db::new(ctx.db.pool().clone()),
            Some(SignedDuration::from_hours(-1)),
        );

        let registered = expired_auth.register(registration("ada@example.com")).await?;

        let result = ctx.auth.authenticate_bearer(&registered.token.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidToken)),
            "expected InvalidToken, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn promote_user_grants_admin_role() -> TestResult {
        let ctx = TestContext::new().await;

        let registered = ctx.auth.register(registration("ada@example.com")).await?;

        let promoted = ctx.auth.promote_user("ada@example.com").await?;
        let actor = ctx
            .auth
            .authenticate_bearer(&registered.token.token)
            .await?;

        assert_eq!(promoted.role, Role::Admin);
        assert!(actor.is_admin(), "existing tokens should carry the new role");

        Ok(())
    }

    #[tokio::test]
    async fn promote_unknown_user_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.promote_user("nobody@example.com").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
