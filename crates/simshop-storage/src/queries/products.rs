//! Product collection: filtered listing, lookups, writes and stock adjustment.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

use simshop_core::models::{Product, ProductFilter, ProductSort};
use simshop_core::ShopResult;

use super::{get_json, get_time, get_uuid, like_pattern, ts};
use crate::to_storage_err;

const COLUMNS: &str = "id, name, slug, description, price, original_price, discount, \
                       category_id, images, stock, sku, brand, is_featured, is_offer, \
                       created_at, updated_at";

fn row_to_product(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: get_uuid(row, 0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
        price: row.get(4)?,
        original_price: row.get(5)?,
        discount: row.get(6)?,
        category: get_uuid(row, 7)?,
        images: get_json(row, 8)?,
        stock: row.get(9)?,
        sku: row.get(10)?,
        brand: row.get(11)?,
        is_featured: row.get(12)?,
        is_offer: row.get(13)?,
        created_at: get_time(row, 14)?,
        updated_at: get_time(row, 15)?,
    })
}

/// Lower-cased text the search filter matches against. SQLite's `LIKE`
/// folds ASCII only.
pub(crate) fn search_text(name: &str, description: &str, brand: Option<&str>, sku: &str) -> String {
    [name, description, brand.unwrap_or_default(), sku]
        .join("\n")
        .to_lowercase()
}

fn product_search_text(product: &Product) -> String {
    search_text(
        &product.name,
        &product.description,
        product.brand.as_deref(),
        &product.sku,
    )
}

pub fn insert_product(conn: &Connection, product: &Product) -> ShopResult<()> {
    let images = serde_json::to_string(&product.images)?;
    conn.execute(
        &format!(
            "INSERT INTO products ({COLUMNS}, search_text)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
        ),
        params![
            product.id.to_string(),
            product.name,
            product.slug,
            product.description,
            product.price,
            product.original_price,
            product.discount,
            product.category.to_string(),
            images,
            product.stock,
            product.sku,
            product.brand,
            product.is_featured,
            product.is_offer,
            ts(&product.created_at),
            ts(&product.updated_at),
            product_search_text(product),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn get_product(conn: &Connection, id: Uuid) -> ShopResult<Option<Product>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM products WHERE id = ?1"),
        params![id.to_string()],
        row_to_product,
    )
    .optional()
    .map_err(to_storage_err)
}

pub fn get_product_by_slug(conn: &Connection, slug: &str) -> ShopResult<Option<Product>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM products WHERE slug = ?1"),
        params![slug],
        row_to_product,
    )
    .optional()
    .map_err(to_storage_err)
}

/// Search products with filters. Ties in the sort key keep insertion order.
pub fn list_products(conn: &Connection, filter: &ProductFilter) -> ShopResult<Vec<Product>> {
    let mut sql = format!("SELECT {COLUMNS} FROM products WHERE 1=1");
    let mut values: Vec<Value> = Vec::new();

    if let Some(category) = filter.category {
        values.push(Value::Text(category.to_string()));
        sql.push_str(&format!(" AND category_id = ?{}", values.len()));
    }
    if let Some(term) = &filter.search {
        values.push(Value::Text(like_pattern(&term.to_lowercase())));
        sql.push_str(&format!(
            " AND search_text LIKE ?{} ESCAPE '\\'",
            values.len()
        ));
    }
    if filter.only_offers {
        sql.push_str(" AND is_offer = 1");
    }
    if filter.only_featured {
        sql.push_str(" AND is_featured = 1");
    }

    sql.push_str(match filter.sort {
        ProductSort::Newest => " ORDER BY created_at DESC, rowid DESC",
        ProductSort::PriceAsc => " ORDER BY price ASC, rowid ASC",
        ProductSort::PriceDesc => " ORDER BY price DESC, rowid ASC",
    });

    if let Some((limit, offset)) = filter.window {
        values.push(Value::Integer(i64::from(limit)));
        values.push(Value::Integer(i64::from(offset)));
        sql.push_str(&format!(" LIMIT ?{} OFFSET ?{}", values.len() - 1, values.len()));
    }

    let mut stmt = conn.prepare(&sql).map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), row_to_product)
        .map_err(to_storage_err)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(to_storage_err)
}

/// Overwrite every mutable field. Returns false when the id is unknown.
pub fn update_product(conn: &Connection, product: &Product) -> ShopResult<bool> {
    let images = serde_json::to_string(&product.images)?;
    let changed = conn
        .execute(
            "UPDATE products SET
                name = ?2, slug = ?3, description = ?4, price = ?5, original_price = ?6,
                discount = ?7, category_id = ?8, images = ?9, stock = ?10, sku = ?11,
                brand = ?12, is_featured = ?13, is_offer = ?14, updated_at = ?15,
                search_text = ?16
             WHERE id = ?1",
            params![
                product.id.to_string(),
                product.name,
                product.slug,
                product.description,
                product.price,
                product.original_price,
                product.discount,
                product.category.to_string(),
                images,
                product.stock,
                product.sku,
                product.brand,
                product.is_featured,
                product.is_offer,
                ts(&product.updated_at),
                product_search_text(product),
            ],
        )
        .map_err(to_storage_err)?;
    Ok(changed > 0)
}

pub fn delete_product(conn: &Connection, id: Uuid) -> ShopResult<bool> {
    let changed = conn
        .execute("DELETE FROM products WHERE id = ?1", params![id.to_string()])
        .map_err(to_storage_err)?;
    Ok(changed > 0)
}

/// Add `delta` to the stock unless that would take it below zero.
/// Returns false when the product is unknown or stock is insufficient.
pub fn adjust_stock(conn: &Connection, id: Uuid, delta: i64) -> ShopResult<bool> {
    let changed = conn
        .execute(
            "UPDATE products SET stock = stock + ?2
             WHERE id = ?1 AND stock + ?2 >= 0",
            params![id.to_string(), delta],
        )
        .map_err(to_storage_err)?;
    Ok(changed > 0)
}
