//! Account manager
//!
//! Creation, authentication and authorisation primitives for accounts.
//! Passwords are only ever stored as an Argon2id hash plus salt.

pub mod access;
pub mod errors;
pub mod types;

pub use access::AccessPolicy;
pub use errors::AccountError;
pub use types::*;

use crate::advisory::AdvisoryExt;
use crate::crypto::{self, HashAndSalt};
use crate::database::query::{self, Column, FieldSet, SelectOptions};
use crate::database::{Database, DatabaseError};
use crate::{Error, Result};

pub const TABLE: &str = "account";
pub const COLUMN_ID: &str = "id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_ADMIN: &str = "admin";
pub const COLUMN_PUBLIC: &str = "public";
pub const COLUMN_PASSWORD_HASH: &str = "password_hash";
pub const COLUMN_PASSWORD_SALT: &str = "password_salt";

const PUBLIC_COLUMNS: [Column; 4] = [
    Column::new(COLUMN_ID),
    Column::new(COLUMN_NAME),
    Column::new(COLUMN_ADMIN),
    Column::new(COLUMN_PUBLIC),
];

const CREDENTIAL_COLUMNS: [Column; 3] = [
    Column::new(COLUMN_ID),
    Column::new(COLUMN_PASSWORD_HASH),
    Column::new(COLUMN_PASSWORD_SALT),
];

/// Turn a storage uniqueness violation on `name` into the domain error.
fn name_conflict(name: &str, err: Error) -> Error {
    match err {
        Error::Database(DatabaseError::UniqueViolation { .. }) => AccountError::NameAlreadyExists {
            name: name.to_string(),
        }
        .into(),
        other => other,
    }
}

/// Create an account and return its id.
///
/// Checks, in order: the name is not taken, the name format, the password
/// format.
pub async fn create(database: &Database, input: &CreateAccount) -> Result<AccountId> {
    if exists_by_name(database, &input.name).await {
        return Err(AccountError::NameAlreadyExists {
            name: input.name.clone(),
        }
        .into());
    }
    if !is_valid_name(&input.name) {
        return Err(AccountError::InvalidNameFormat {
            name: input.name.clone(),
        }
        .into());
    }
    if !is_valid_password(&input.password) {
        return Err(AccountError::InvalidPasswordFormat.into());
    }

    let HashAndSalt { hash, salt } = crypto::generate_hash_and_salt(&input.password)?;
    let (statement, params) = FieldSet::new()
        .set(COLUMN_NAME, input.name.as_str())
        .set(COLUMN_PASSWORD_HASH, hash)
        .set(COLUMN_PASSWORD_SALT, salt)
        .set(COLUMN_ADMIN, input.admin)
        .set(COLUMN_PUBLIC, input.public)
        .into_insert(TABLE);

    // A concurrent create with the same name can still win the race
    let result = database
        .post(&statement, &params)
        .await
        .map_err(|e| name_conflict(&input.name, e))?;

    let id = AccountId(result.last_insert_id);
    tracing::debug!(%id, name = %input.name, "Created account");
    Ok(id)
}

/// Whether an account with `id` exists. Storage failures read as `false`.
pub async fn exists(database: &Database, id: AccountId) -> bool {
    database
        .get_exists(&query::exists(TABLE, COLUMN_ID), &[id.into()])
        .await
        .or_false("account.exists")
}

/// Whether an account named `name` exists. Storage failures read as `false`.
pub async fn exists_by_name(database: &Database, name: &str) -> bool {
    database
        .get_exists(&query::exists(TABLE, COLUMN_NAME), &[name.into()])
        .await
        .or_false("account.exists_by_name")
}

/// Whether `id` is an admin account. Absent ids and storage failures read as `false`.
pub async fn is_admin(database: &Database, id: Option<AccountId>) -> bool {
    let Some(id) = id else {
        return false;
    };
    let statement = query::select(
        TABLE,
        &[Column::new(COLUMN_ADMIN)],
        SelectOptions::filter(COLUMN_ID),
    );
    let row: Result<Option<(bool,)>> = database.get_one(&statement, &[id.into()]).await;
    row.map(|row| matches!(row, Some((true,))))
        .or_false("account.is_admin")
}

async fn ensure_exists(database: &Database, id: AccountId) -> Result<()> {
    if exists(database, id).await {
        Ok(())
    } else {
        Err(AccountError::NotExisting { id }.into())
    }
}

/// Check a name/password pair.
///
/// Fails with [`AccountError::NameNotExisting`] for an unknown name; returns
/// the account id only when the password matches.
pub async fn check_login(database: &Database, input: &Credentials) -> Result<Option<AccountId>> {
    if !exists_by_name(database, &input.name).await {
        return Err(AccountError::NameNotExisting {
            name: input.name.clone(),
        }
        .into());
    }

    let statement = query::select(TABLE, &CREDENTIAL_COLUMNS, SelectOptions::filter(COLUMN_NAME));
    let row: Option<CredentialRow> = database.get_one(&statement, &[input.name.as_str().into()]).await?;

    Ok(row.and_then(|row| {
        let stored = HashAndSalt {
            hash: row.password_hash,
            salt: row.password_salt,
        };
        crypto::check_password(&input.password, &stored).then_some(AccountId(row.id))
    }))
}

/// Check the password of account `id`. Every failure reads as `false`.
pub async fn check_login_id(database: &Database, id: AccountId, password: &str) -> bool {
    verify_password_by_id(database, id, password)
        .await
        .or_false("account.check_login_id")
}

async fn verify_password_by_id(database: &Database, id: AccountId, password: &str) -> Result<bool> {
    ensure_exists(database, id).await?;
    let statement = query::select(TABLE, &CREDENTIAL_COLUMNS, SelectOptions::filter(COLUMN_ID));
    let row: Option<CredentialRow> = database.get_one(&statement, &[id.into()]).await?;
    Ok(row.is_some_and(|row| {
        crypto::check_password(
            password,
            &HashAndSalt {
                hash: row.password_hash,
                salt: row.password_salt,
            },
        )
    }))
}

/// Read account `id` if the requester passes the visibility policy.
pub async fn get(
    database: &Database,
    requester: Option<AccountId>,
    id: AccountId,
) -> Result<Option<Account>> {
    ensure_exists(database, id).await?;

    let statement = query::select(TABLE, &PUBLIC_COLUMNS, SelectOptions::filter(COLUMN_ID));
    let row: Option<AccountRow> = database.get_one(&statement, &[id.into()]).await?;
    let Some(row) = row else {
        return Err(Error::vanished(format_args!("account {id}")));
    };

    AccessPolicy::visibility(requester, id, row.public)
        .check(database)
        .await?;
    Ok(Some(row.into()))
}

/// Read the account named `name` if the requester passes the visibility policy.
pub async fn get_by_name(
    database: &Database,
    requester: Option<AccountId>,
    name: &str,
) -> Result<Option<Account>> {
    if !exists_by_name(database, name).await {
        return Err(AccountError::NameNotExisting {
            name: name.to_string(),
        }
        .into());
    }

    let statement = query::select(TABLE, &PUBLIC_COLUMNS, SelectOptions::filter(COLUMN_NAME));
    let row: Option<AccountRow> = database.get_one(&statement, &[name.into()]).await?;
    let Some(row) = row else {
        return Err(Error::vanished(format_args!("account '{name}'")));
    };

    AccessPolicy::visibility(requester, AccountId(row.id), row.public)
        .check(database)
        .await?;
    Ok(Some(row.into()))
}

/// Resolve an account name to its id without any access check.
pub(crate) async fn id_by_name(database: &Database, name: &str) -> Result<Option<AccountId>> {
    let statement = query::select(TABLE, &[Column::new(COLUMN_ID)], SelectOptions::filter(COLUMN_NAME));
    let row: Option<(i64,)> = database.get_one(&statement, &[name.into()]).await?;
    Ok(row.map(|(id,)| AccountId(id)))
}

/// Apply the fields present in `input` to the account.
///
/// The requester must be the account itself or an admin. Returns whether a
/// row changed; an update with no fields changes nothing.
pub async fn update(database: &Database, requester: AccountId, input: &UpdateAccount) -> Result<bool> {
    ensure_exists(database, input.id).await?;
    AccessPolicy::direct(requester, input.id)
        .check(database)
        .await?;

    if let Some(name) = &input.name
        && !is_valid_name(name)
    {
        return Err(AccountError::InvalidNameFormat { name: name.clone() }.into());
    }
    let credentials = match &input.password {
        Some(password) if !is_valid_password(password) => {
            return Err(AccountError::InvalidPasswordFormat.into());
        }
        Some(password) => Some(crypto::generate_hash_and_salt(password)?),
        None => None,
    };
    if let Some(admin) = input.admin {
        tracing::warn!(id = %input.id, %requester, admin, "Account admin status updated");
    }

    let (hash, salt) = credentials.map(|c| (c.hash, c.salt)).unzip();
    let fields = FieldSet::new()
        .set_if(COLUMN_PUBLIC, input.public)
        .set_if(COLUMN_PASSWORD_HASH, hash)
        .set_if(COLUMN_PASSWORD_SALT, salt)
        .set_if(COLUMN_NAME, input.name.clone())
        .set_if(COLUMN_ADMIN, input.admin);
    if fields.is_empty() {
        return Ok(false);
    }

    let (statement, params) = fields.into_update(TABLE, COLUMN_ID, input.id);
    let result = database
        .post(&statement, &params)
        .await
        .map_err(|e| name_conflict(input.name.as_deref().unwrap_or_default(), e))?
        .expect_changes(format_args!("account {}", input.id))?;
    tracing::debug!(id = %input.id, changes = result.changes, "Updated account");
    Ok(true)
}

/// Delete account `id`. The requester must be the account itself or an admin.
///
/// Documents, groups and friend edges referencing the account are left in place.
pub async fn remove(database: &Database, requester: AccountId, id: AccountId) -> Result<bool> {
    ensure_exists(database, id).await?;
    AccessPolicy::direct(requester, id).check(database).await?;

    let result = database
        .post(&query::remove(TABLE, COLUMN_ID), &[id.into()])
        .await?;
    tracing::debug!(%id, %requester, "Removed account");
    Ok(result.changes > 0)
}
