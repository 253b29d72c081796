//! The four collections. Nested values (images, items, shipping address)
//! are JSON text.

use rusqlite::Connection;

pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE categories (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            slug        TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );

        CREATE TABLE products (
            id             TEXT PRIMARY KEY,
            name           TEXT NOT NULL,
            slug           TEXT NOT NULL UNIQUE,
            description    TEXT NOT NULL DEFAULT '',
            price          REAL NOT NULL CHECK (price >= 0),
            original_price REAL,
            discount       INTEGER,
            category_id    TEXT NOT NULL REFERENCES categories(id),
            images         TEXT NOT NULL DEFAULT '[]',
            stock          INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
            sku            TEXT NOT NULL,
            brand          TEXT,
            is_featured    INTEGER NOT NULL DEFAULT 0,
            is_offer       INTEGER NOT NULL DEFAULT 0,
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL
        );

        CREATE TABLE users (
            id            TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role          TEXT NOT NULL DEFAULT 'customer',
            active        INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );

        CREATE TABLE orders (
            id               TEXT PRIMARY KEY,
            user_id          TEXT NOT NULL REFERENCES users(id),
            items            TEXT NOT NULL,
            total_amount     REAL NOT NULL,
            shipping_address TEXT NOT NULL,
            payment_method   TEXT NOT NULL,
            order_status     TEXT NOT NULL DEFAULT 'pendiente',
            payment_status   TEXT NOT NULL DEFAULT 'pendiente',
            notes            TEXT,
            stock_reserved   INTEGER NOT NULL DEFAULT 0,
            created_at       TEXT NOT NULL,
            updated_at       TEXT NOT NULL
        );
        ",
    )
}
