//! Lower-cased search column for products.
//!
//! SQLite's `LIKE` folds ASCII only, so accented names are folded here.

use rusqlite::{params, Connection};

use crate::queries::products::search_text;

pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "ALTER TABLE products ADD COLUMN search_text TEXT NOT NULL DEFAULT '';",
    )?;

    let rows = {
        let mut stmt = conn.prepare("SELECT id, name, description, brand, sku FROM products")?;
        let rows = stmt.query_map([], |row| {
            let id: String = row.get(0)?;
            let name: String = row.get(1)?;
            let description: String = row.get(2)?;
            let brand: Option<String> = row.get(3)?;
            let sku: String = row.get(4)?;
            Ok((id, search_text(&name, &description, brand.as_deref(), &sku)))
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()?
    };

    let mut update = conn.prepare("UPDATE products SET search_text = ?2 WHERE id = ?1")?;
    for (id, text) in rows {
        update.execute(params![id, text])?;
    }
    Ok(())
}
