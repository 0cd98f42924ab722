use crate::error::StorageResult;
use rusqlite::Connection;

const SCHEMA_VERSION: i64 = 1;

pub(crate) fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version >= SCHEMA_VERSION {
        return Ok(());
    }

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS secrets (
            name         TEXT NOT NULL,
            secret_type  TEXT NOT NULL,
            owner        TEXT NOT NULL,
            ciphertext   BLOB NOT NULL,
            wrapped_key  BLOB NOT NULL,
            created_at   TEXT NOT NULL,
            updated_at   TEXT NOT NULL,
            PRIMARY KEY (name, secret_type, owner)
        );
        CREATE INDEX IF NOT EXISTS idx_secrets_owner ON secrets(owner);
        PRAGMA user_version = 1;",
    )?;
    Ok(())
}
