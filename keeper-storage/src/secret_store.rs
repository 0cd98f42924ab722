//! Local secret store.

use crate::error::{StorageError, StorageResult};
use crate::schema::initialize_schema;
use chrono::{DateTime, SecondsFormat, Utc};
use keeper_crypto::EncryptedPayload;
use keeper_types::{Secret, SecretIdentity, SecretType};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Secret store backed by SQLite.
///
/// Cloning shares the underlying connection.
#[derive(Clone)]
pub struct SecretStore {
    conn: Arc<Mutex<Connection>>,
    read_only: bool,
}

/// Columns of one `secrets` row before conversion.
struct RawRow {
    name: String,
    secret_type: String,
    owner: String,
    ciphertext: Vec<u8>,
    wrapped_key: Vec<u8>,
    created_at: String,
    updated_at: String,
}

const SELECT_COLUMNS: &str =
    "SELECT name, secret_type, owner, ciphertext, wrapped_key, created_at, updated_at FROM secrets";

impl SecretStore {
    /// Opens or creates a store at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        initialize_schema(&conn)?;
        Ok(Self::wrap(conn, false))
    }

    /// Opens an existing store without write access.
    pub fn open_read_only(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self::wrap(conn, true))
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self::wrap(conn, false))
    }

    fn wrap(conn: Connection, read_only: bool) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            read_only,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    /// Inserts a secret or overwrites the payload of the row with the same
    /// identity. `created_at` of an existing row is kept.
    pub fn save(&self, secret: &Secret) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO secrets
                (name, secret_type, owner, ciphertext, wrapped_key, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT (name, secret_type, owner) DO UPDATE SET
                ciphertext = excluded.ciphertext,
                wrapped_key = excluded.wrapped_key,
                updated_at = excluded.updated_at",
            params![
                secret.name,
                secret.secret_type.as_str(),
                secret.owner,
                secret.ciphertext(),
                secret.wrapped_key(),
                format_timestamp(&secret.created_at),
                format_timestamp(&secret.updated_at),
            ],
        )?;
        debug!("saved secret {}", secret.identity());
        Ok(())
    }

    /// Looks up one secret by its identity triple.
    pub fn get(&self, identity: &SecretIdentity) -> StorageResult<Option<Secret>> {
        let conn = self.lock()?;
        let raw = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE name = ?1 AND secret_type = ?2 AND owner = ?3"),
                params![identity.name, identity.secret_type.as_str(), identity.owner],
                read_row,
            )
            .optional()?;
        raw.map(RawRow::into_secret).transpose()
    }

    /// Lists secrets ordered by name then type, optionally for one owner.
    pub fn list(&self, owner: Option<&str>) -> StorageResult<Vec<Secret>> {
        let conn = self.lock()?;
        let rows = match owner {
            Some(owner) => {
                let mut stmt = conn.prepare(&format!(
                    "{SELECT_COLUMNS} WHERE owner = ?1 ORDER BY name, secret_type"
                ))?;
                let rows = stmt
                    .query_map(params![owner], read_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt =
                    conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY name, secret_type, owner"))?;
                let rows = stmt
                    .query_map([], read_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };
        rows.into_iter().map(RawRow::into_secret).collect()
    }

    /// Removes a secret. Returns whether a row existed.
    pub fn delete(&self, identity: &SecretIdentity) -> StorageResult<bool> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM secrets WHERE name = ?1 AND secret_type = ?2 AND owner = ?3",
            params![identity.name, identity.secret_type.as_str(), identity.owner],
        )?;
        Ok(removed > 0)
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        name: row.get(0)?,
        secret_type: row.get(1)?,
        owner: row.get(2)?,
        ciphertext: row.get(3)?,
        wrapped_key: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

impl RawRow {
    fn into_secret(self) -> StorageResult<Secret> {
        let corrupt = |reason: String| StorageError::Corrupt {
            name: self.name.clone(),
            reason,
        };
        let secret_type: SecretType = self
            .secret_type
            .parse()
            .map_err(|e: keeper_types::UnknownSecretType| corrupt(e.to_string()))?;
        let created_at = parse_timestamp(&self.created_at).map_err(&corrupt)?;
        let updated_at = parse_timestamp(&self.updated_at).map_err(&corrupt)?;

        Ok(Secret::from_parts(
            SecretIdentity::new(self.name, secret_type, self.owner),
            EncryptedPayload {
                ciphertext: self.ciphertext,
                wrapped_key: self.wrapped_key,
            },
            created_at,
            updated_at,
        ))
    }
}

/// Fixed-width RFC 3339 so that text order matches time order and the
/// value round-trips exactly.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| format!("bad timestamp {raw:?}: {e}"))
}
