use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    user_id TEXT PRIMARY KEY,
    total_balance INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS main_categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    is_savings INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS sub_categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    main_category_id INTEGER NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),
    UNIQUE (name, main_category_id),
    FOREIGN KEY (main_category_id) REFERENCES main_categories(id)
);

CREATE TABLE IF NOT EXISTS conversation_state (
    user_id TEXT PRIMARY KEY,
    phase TEXT NOT NULL DEFAULT 'idle',
    pending_amount INTEGER,
    pending_main_category_id INTEGER,
    pending_sub_category_id INTEGER,
    pending_date TEXT,
    updated_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (user_id) REFERENCES users(user_id),
    FOREIGN KEY (pending_main_category_id) REFERENCES main_categories(id),
    FOREIGN KEY (pending_sub_category_id) REFERENCES sub_categories(id)
);

CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY,
    user_id TEXT NOT NULL,
    main_category_id INTEGER NOT NULL,
    sub_category_id INTEGER NOT NULL,
    amount INTEGER NOT NULL,
    entry_kind TEXT NOT NULL,
    entry_date TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (user_id) REFERENCES users(user_id),
    FOREIGN KEY (main_category_id) REFERENCES main_categories(id),
    FOREIGN KEY (sub_category_id) REFERENCES sub_categories(id)
);

CREATE TABLE IF NOT EXISTS category_balances (
    user_id TEXT NOT NULL,
    main_category_id INTEGER NOT NULL,
    sub_category_id INTEGER NOT NULL,
    balance INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, main_category_id, sub_category_id),
    FOREIGN KEY (user_id) REFERENCES users(user_id),
    FOREIGN KEY (main_category_id) REFERENCES main_categories(id),
    FOREIGN KEY (sub_category_id) REFERENCES sub_categories(id)
);
";

// (id, name, is_savings); ids double as the menu index
const DEFAULT_MAIN_CATEGORIES: &[(i64, &str, bool)] = &[
    (1, "Needs", false),
    (2, "Wants", false),
    (3, "Savings", true),
];

/// Writers wait at most this long for the database lock before failing the turn.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let count: i64 = conn.query_row("SELECT count(*) FROM main_categories", [], |row| row.get(0))?;
    if count == 0 {
        for (id, name, is_savings) in DEFAULT_MAIN_CATEGORIES {
            conn.execute(
                "INSERT INTO main_categories (id, name, is_savings) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, name, is_savings],
            )?;
        }
    }
    Ok(())
}
