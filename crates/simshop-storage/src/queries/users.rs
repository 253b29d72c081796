//! User collection. The password hash is only ever read by `get_user_credentials`.

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use simshop_core::models::{Role, User};
use simshop_core::ShopResult;

use super::{conversion_err, get_time, get_uuid, ts};
use crate::to_storage_err;

const COLUMNS: &str = "id, name, email, role, active, created_at, updated_at";

fn get_role(row: &Row<'_>, idx: usize) -> rusqlite::Result<Role> {
    let raw: String = row.get(idx)?;
    Role::parse(&raw).map_err(|e| conversion_err(idx, e))
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: get_uuid(row, 0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: get_role(row, 3)?,
        active: row.get(4)?,
        created_at: get_time(row, 5)?,
        updated_at: get_time(row, 6)?,
    })
}

pub fn insert_user(conn: &Connection, user: &User, password_hash: &str) -> ShopResult<()> {
    conn.execute(
        "INSERT INTO users (id, name, email, password_hash, role, active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user.id.to_string(),
            user.name,
            user.email,
            password_hash,
            user.role.as_str(),
            user.active,
            ts(&user.created_at),
            ts(&user.updated_at),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn get_user(conn: &Connection, id: Uuid) -> ShopResult<Option<User>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM users WHERE id = ?1"),
        params![id.to_string()],
        row_to_user,
    )
    .optional()
    .map_err(to_storage_err)
}

/// The user with `email` (already normalized) and their password hash.
pub fn get_user_credentials(conn: &Connection, email: &str) -> ShopResult<Option<(User, String)>> {
    conn.query_row(
        &format!("SELECT {COLUMNS}, password_hash FROM users WHERE email = ?1"),
        params![email],
        |row| Ok((row_to_user(row)?, row.get(7)?)),
    )
    .optional()
    .map_err(to_storage_err)
}

/// Newest accounts first.
pub fn list_users(conn: &Connection, limit: u32, offset: u32) -> ShopResult<Vec<User>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM users
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?1 OFFSET ?2"
        ))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![limit, offset], row_to_user)
        .map_err(to_storage_err)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(to_storage_err)
}

pub fn count_users(conn: &Connection) -> ShopResult<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .map_err(to_storage_err)
}

/// Overwrite the profile fields. Returns false when the id is unknown.
pub fn update_user(conn: &Connection, user: &User) -> ShopResult<bool> {
    let changed = conn
        .execute(
            "UPDATE users SET name = ?2, email = ?3, role = ?4, active = ?5, updated_at = ?6
             WHERE id = ?1",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.role.as_str(),
                user.active,
                ts(&user.updated_at),
            ],
        )
        .map_err(to_storage_err)?;
    Ok(changed > 0)
}

pub fn update_password(conn: &Connection, id: Uuid, password_hash: &str) -> ShopResult<bool> {
    let changed = conn
        .execute(
            "UPDATE users SET password_hash = ?2 WHERE id = ?1",
            params![id.to_string(), password_hash],
        )
        .map_err(to_storage_err)?;
    Ok(changed > 0)
}

/// Fails with a reference error while orders still point at the user.
pub fn delete_user(conn: &Connection, id: Uuid) -> ShopResult<bool> {
    let changed = conn
        .execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])
        .map_err(to_storage_err)?;
    Ok(changed > 0)
}
