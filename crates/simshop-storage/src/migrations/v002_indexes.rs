//! Indexes for the listing queries.

use rusqlite::Connection;

pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE INDEX idx_products_category ON products(category_id);
        CREATE INDEX idx_products_created ON products(created_at);
        CREATE INDEX idx_orders_user_created ON orders(user_id, created_at);
        CREATE INDEX idx_orders_created ON orders(created_at);
        ",
    )
}
