//! Order collection plus the stock bookkeeping that goes with placing and
//! cancelling orders.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use simshop_core::models::{Order, PaymentMethod};
use simshop_core::{OrderStatus, ShopError, ShopResult};

use super::{conversion_err, get_json, get_parsed, get_time, get_uuid, products, ts};
use crate::to_storage_err;

const COLUMNS: &str = "id, user_id, items, total_amount, shipping_address, payment_method, \
                       order_status, payment_status, notes, stock_reserved, created_at, updated_at";

fn row_to_order(row: &Row<'_>) -> rusqlite::Result<Order> {
    let method: String = row.get(5)?;
    Ok(Order {
        id: get_uuid(row, 0)?,
        user: get_uuid(row, 1)?,
        items: get_json(row, 2)?,
        total_amount: row.get(3)?,
        shipping_address: get_json(row, 4)?,
        payment_method: PaymentMethod::parse(&method).map_err(|e| conversion_err(5, e))?,
        order_status: get_parsed(row, 6)?,
        payment_status: get_parsed(row, 7)?,
        notes: row.get(8)?,
        stock_reserved: row.get(9)?,
        created_at: get_time(row, 10)?,
        updated_at: get_time(row, 11)?,
    })
}

pub fn insert_order(conn: &Connection, order: &Order) -> ShopResult<()> {
    let items = serde_json::to_string(&order.items)?;
    let address = serde_json::to_string(&order.shipping_address)?;
    conn.execute(
        &format!(
            "INSERT INTO orders ({COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        ),
        params![
            order.id.to_string(),
            order.user.to_string(),
            items,
            order.total_amount,
            address,
            order.payment_method.as_str(),
            order.order_status.as_str(),
            order.payment_status.as_str(),
            order.notes,
            order.stock_reserved,
            ts(&order.created_at),
            ts(&order.updated_at),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// Insert `order` and take its quantities out of stock, all or nothing.
///
/// Fails with `Conflict` when a product is unknown or has too little stock;
/// nothing is written in that case.
pub fn insert_order_reserving_stock(conn: &Connection, order: &mut Order) -> ShopResult<()> {
    let tx = conn.unchecked_transaction().map_err(to_storage_err)?;
    for item in &order.items {
        if !products::adjust_stock(&tx, item.product, -i64::from(item.quantity))? {
            // Dropping `tx` rolls back the decrements already made.
            return Err(ShopError::Conflict(format!(
                "insufficient stock for product {}",
                item.product
            )));
        }
    }
    order.stock_reserved = true;
    insert_order(&tx, order)?;
    tx.commit().map_err(to_storage_err)?;
    debug!(order = %order.id, items = order.items.len(), "stock reserved");
    Ok(())
}

pub fn get_order(conn: &Connection, id: Uuid) -> ShopResult<Option<Order>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM orders WHERE id = ?1"),
        params![id.to_string()],
        row_to_order,
    )
    .optional()
    .map_err(to_storage_err)
}

fn query_orders<P: rusqlite::Params>(conn: &Connection, sql: &str, params: P) -> ShopResult<Vec<Order>> {
    let mut stmt = conn.prepare(sql).map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params, row_to_order)
        .map_err(to_storage_err)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(to_storage_err)
}

/// Every order, newest first.
pub fn list_orders(conn: &Connection) -> ShopResult<Vec<Order>> {
    query_orders(
        conn,
        &format!("SELECT {COLUMNS} FROM orders ORDER BY created_at DESC, rowid DESC"),
        [],
    )
}

/// One user's orders, newest first.
pub fn list_orders_for_user(conn: &Connection, user: Uuid) -> ShopResult<Vec<Order>> {
    query_orders(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM orders WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC"
        ),
        params![user.to_string()],
    )
}

pub fn count_orders(conn: &Connection) -> ShopResult<i64> {
    conn.query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))
        .map_err(to_storage_err)
}

/// Persist new statuses. A reserved order moving to `cancelado` gives its
/// quantities back to the catalog in the same transaction.
///
/// Returns false when the id is unknown.
pub fn save_status(conn: &Connection, order: &mut Order) -> ShopResult<bool> {
    let tx = conn.unchecked_transaction().map_err(to_storage_err)?;
    if order.stock_reserved && order.order_status == OrderStatus::Cancelado {
        for item in &order.items {
            // A product deleted since the order was placed has nothing to restock.
            products::adjust_stock(&tx, item.product, i64::from(item.quantity))?;
        }
        order.stock_reserved = false;
        debug!(order = %order.id, "stock released");
    }
    let changed = tx
        .execute(
            "UPDATE orders SET order_status = ?2, payment_status = ?3,
                               stock_reserved = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                order.id.to_string(),
                order.order_status.as_str(),
                order.payment_status.as_str(),
                order.stock_reserved,
                ts(&order.updated_at),
            ],
        )
        .map_err(to_storage_err)?;
    if changed == 0 {
        return Ok(false);
    }
    tx.commit().map_err(to_storage_err)?;
    Ok(true)
}
