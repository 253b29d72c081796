//! Category collection.

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use simshop_core::models::Category;
use simshop_core::ShopResult;

use super::{get_time, get_uuid, ts};
use crate::to_storage_err;

const COLUMNS: &str = "id, name, slug, description, created_at";

fn row_to_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: get_uuid(row, 0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
        created_at: get_time(row, 4)?,
    })
}

pub fn insert_category(conn: &Connection, category: &Category) -> ShopResult<()> {
    conn.execute(
        "INSERT INTO categories (id, name, slug, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            category.id.to_string(),
            category.name,
            category.slug,
            category.description,
            ts(&category.created_at),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// All categories by name.
pub fn list_categories(conn: &Connection) -> ShopResult<Vec<Category>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM categories ORDER BY name COLLATE NOCASE, rowid"
        ))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map([], row_to_category)
        .map_err(to_storage_err)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(to_storage_err)
}

pub fn get_category(conn: &Connection, id: Uuid) -> ShopResult<Option<Category>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM categories WHERE id = ?1"),
        params![id.to_string()],
        row_to_category,
    )
    .optional()
    .map_err(to_storage_err)
}

pub fn get_category_by_slug(conn: &Connection, slug: &str) -> ShopResult<Option<Category>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM categories WHERE slug = ?1"),
        params![slug],
        row_to_category,
    )
    .optional()
    .map_err(to_storage_err)
}

/// Overwrite the mutable fields. Returns false when the id is unknown.
pub fn update_category(conn: &Connection, category: &Category) -> ShopResult<bool> {
    let changed = conn
        .execute(
            "UPDATE categories SET name = ?2, slug = ?3, description = ?4 WHERE id = ?1",
            params![
                category.id.to_string(),
                category.name,
                category.slug,
                category.description,
            ],
        )
        .map_err(to_storage_err)?;
    Ok(changed > 0)
}

/// Fails with a reference error while products still point at the category.
pub fn delete_category(conn: &Connection, id: Uuid) -> ShopResult<bool> {
    let changed = conn
        .execute("DELETE FROM categories WHERE id = ?1", params![id.to_string()])
        .map_err(to_storage_err)?;
    Ok(changed > 0)
}
