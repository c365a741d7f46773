//! Users Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    columns::encode_position,
    users::{
        data::{NewAddress, NewUser, UserUpdate},
        records::{
            AddressRecord, AddressUuid, CredentialsRecord, PostalAddress, Role, UserRecord,
            UserUuid,
        },
    },
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const FIND_CREDENTIALS_SQL: &str = include_str!("sql/find_credentials.sql");
const UPDATE_USER_SQL: &str = include_str!("sql/update_user.sql");
const SET_USER_ROLE_SQL: &str = include_str!("sql/set_user_role.sql");
const LIST_ADDRESSES_SQL: &str = include_str!("sql/list_addresses.sql");
const GET_ADDRESS_SQL: &str = include_str!("sql/get_address.sql");
const DELETE_ADDRESSES_SQL: &str = include_str!("sql/delete_addresses.sql");
const CREATE_ADDRESSES_SQL: &str = include_str!("sql/create_addresses.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: &NewUser,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Load a user together with their saved addresses.
    pub(crate) async fn get_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, UserRecord>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        record.addresses = self.list_addresses(tx, user).await?;

        Ok(record)
    }

    pub(crate) async fn find_credentials(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<Option<CredentialsRecord>, sqlx::Error> {
        query_as::<Postgres, CredentialsRecord>(FIND_CREDENTIALS_SQL)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn update_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        update: &UserUpdate,
    ) -> Result<UserRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, UserRecord>(UPDATE_USER_SQL)
            .bind(user.into_uuid())
            .bind(update.name.as_deref())
            .bind(update.email.as_deref())
            .bind(update.password_hash.as_deref())
            .fetch_one(&mut **tx)
            .await?;

        record.addresses = self.list_addresses(tx, user).await?;

        Ok(record)
    }

    pub(crate) async fn set_role_by_email(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
        role: Role,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(SET_USER_ROLE_SQL)
            .bind(email)
            .bind(role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_addresses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<AddressRecord>, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(LIST_ADDRESSES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<Option<AddressRecord>, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(GET_ADDRESS_SQL)
            .bind(user.into_uuid())
            .bind(address.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Replace every saved address of a user, keeping the given order.
    pub(crate) async fn replace_addresses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        addresses: &[NewAddress],
    ) -> Result<(), sqlx::Error> {
        query(DELETE_ADDRESSES_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?;

        if addresses.is_empty() {
            return Ok(());
        }

        let uuids: Vec<Uuid> = addresses
            .iter()
            .map(|_| AddressUuid::new().into_uuid())
            .collect();

        let positions = (0..addresses.len())
            .map(encode_position)
            .collect::<Result<Vec<i32>, _>>()?;

        let defaults: Vec<bool> = addresses.iter().map(|address| address.is_default).collect();

        query(CREATE_ADDRESSES_SQL)
            .bind(user.into_uuid())
            .bind(uuids)
            .bind(positions)
            .bind(column(addresses, |address| &address.street))
            .bind(column(addresses, |address| &address.city))
            .bind(column(addresses, |address| &address.state))
            .bind(column(addresses, |address| &address.postal_code))
            .bind(column(addresses, |address| &address.country))
            .bind(defaults)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

fn column(addresses: &[NewAddress], field: impl Fn(&PostalAddress) -> &String) -> Vec<String> {
    addresses
        .iter()
        .map(|address| field(&address.address).clone())
        .collect()
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role: String = row.try_get("role")?;

        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            role: role.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "role".to_string(),
                source: Box::new(e),
            })?,
            addresses: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CredentialsRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            password_hash: row.try_get("password_hash")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AddressRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AddressUuid::from_uuid(row.try_get("uuid")?),
            address: PostalAddress {
                street: row.try_get("street")?,
                city: row.try_get("city")?,
                state: row.try_get("state")?,
                postal_code: row.try_get("postal_code")?,
                country: row.try_get("country")?,
            },
            is_default: row.try_get("is_default")?,
        })
    }
}
