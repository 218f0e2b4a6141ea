use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Transaction};

use crate::categories::main_category;
use crate::dialog::{clear_pending, load_state};
use crate::error::{BotError, Result};
use crate::models::{BalanceLine, Entry, EntryKind, SavedEntry};

const DATE_FMT: &str = "%Y-%m-%d";

/// Apply `delta` to the user's total and to one (main, sub) running balance.
fn apply_delta(conn: &Connection, user_id: &str, main_id: i64, sub_id: i64, delta: i64) -> Result<()> {
    conn.execute(
        "UPDATE users SET total_balance = total_balance + ?1 WHERE user_id = ?2",
        rusqlite::params![delta, user_id],
    )?;
    conn.execute(
        "INSERT INTO category_balances (user_id, main_category_id, sub_category_id, balance) \
         VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT (user_id, main_category_id, sub_category_id) \
         DO UPDATE SET balance = balance + excluded.balance",
        rusqlite::params![user_id, main_id, sub_id, delta],
    )?;
    Ok(())
}

/// Turn the user's completed pending fields into an entry.
///
/// Runs inside the caller's transaction: the entry row, both balance
/// decrements and the clearing of the pending fields commit or roll back
/// together. A missing date means today.
pub fn record_entry(tx: &Transaction<'_>, user_id: &str, today: NaiveDate) -> Result<SavedEntry> {
    let state = load_state(tx, user_id)?;
    let (Some(amount), Some(main_id), Some(sub_id)) = (
        state.pending_amount,
        state.pending_main_category,
        state.pending_sub_category,
    ) else {
        return Err(BotError::IncompleteDialog(user_id.to_string()));
    };
    let date = state.pending_date.unwrap_or(today);
    let category = main_category(tx, main_id)?;
    let kind = EntryKind::for_category(&category);

    tx.execute(
        "INSERT INTO entries (user_id, main_category_id, sub_category_id, amount, entry_kind, entry_date) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            user_id,
            main_id,
            sub_id,
            amount,
            kind.as_str(),
            date.format(DATE_FMT).to_string()
        ],
    )?;
    let entry_id = tx.last_insert_rowid();

    apply_delta(tx, user_id, main_id, sub_id, -amount)?;
    clear_pending(tx, user_id)?;

    tracing::info!(user_id, entry_id, amount, category = %category.name, kind = kind.as_str(), "entry recorded");
    Ok(SavedEntry {
        entry_id,
        amount,
        main_category: category,
        kind,
        date,
    })
}

fn map_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<Entry> {
    let kind: String = row.get(5)?;
    let date: String = row.get(6)?;
    Ok(Entry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        main_category: row.get(2)?,
        sub_category: row.get(3)?,
        amount: row.get(4)?,
        kind: kind.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, e.into())
        })?,
        date: NaiveDate::parse_from_str(&date, DATE_FMT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?,
    })
}

const ENTRY_SELECT: &str = "SELECT e.id, e.user_id, m.name, s.name, e.amount, e.entry_kind, e.entry_date \
     FROM entries e \
     JOIN main_categories m ON e.main_category_id = m.id \
     JOIN sub_categories s ON e.sub_category_id = s.id";

pub fn last_entry(conn: &Connection, user_id: &str) -> Result<Option<Entry>> {
    let sql = format!("{ENTRY_SELECT} WHERE e.user_id = ?1 ORDER BY e.id DESC LIMIT 1");
    Ok(conn.query_row(&sql, [user_id], map_entry).optional()?)
}

pub fn recent_entries(conn: &Connection, user_id: &str, limit: usize) -> Result<Vec<Entry>> {
    let sql = format!("{ENTRY_SELECT} WHERE e.user_id = ?1 ORDER BY e.id DESC LIMIT ?2");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params![user_id, limit as i64], map_entry)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Remove the user's most recent entry and give its amount back to the
/// balances it was taken from. Returns `None` when there is nothing to remove.
pub fn delete_last_entry(tx: &Transaction<'_>, user_id: &str) -> Result<Option<Entry>> {
    let found: Option<(i64, i64, i64)> = tx
        .query_row(
            "SELECT id, main_category_id, sub_category_id FROM entries \
             WHERE user_id = ?1 ORDER BY id DESC LIMIT 1",
            [user_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;
    let Some((entry_id, main_id, sub_id)) = found else {
        return Ok(None);
    };
    let entry = last_entry(tx, user_id)?.ok_or_else(|| BotError::Other(format!("entry {entry_id} vanished")))?;

    tx.execute("DELETE FROM entries WHERE id = ?1", [entry_id])?;
    apply_delta(tx, user_id, main_id, sub_id, entry.amount)?;

    tracing::info!(user_id, entry_id, amount = entry.amount, "entry deleted");
    Ok(Some(entry))
}

pub fn total_balance(conn: &Connection, user_id: &str) -> Result<i64> {
    Ok(conn
        .query_row(
            "SELECT total_balance FROM users WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(0))
}

/// Aggregated balance per main category, every category listed even when unused.
pub fn main_balances(conn: &Connection, user_id: &str) -> Result<Vec<BalanceLine>> {
    let mut stmt = conn.prepare(
        "SELECT m.name, COALESCE(SUM(cb.balance), 0) \
         FROM main_categories m \
         LEFT JOIN category_balances cb ON cb.main_category_id = m.id AND cb.user_id = ?1 \
         GROUP BY m.id, m.name ORDER BY m.id",
    )?;
    let rows = stmt
        .query_map([user_id], |row| {
            Ok(BalanceLine {
                name: row.get(0)?,
                balance: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn sub_balances(conn: &Connection, user_id: &str, main_category_id: i64) -> Result<Vec<BalanceLine>> {
    let mut stmt = conn.prepare(
        "SELECT s.name, cb.balance FROM category_balances cb \
         JOIN sub_categories s ON cb.sub_category_id = s.id \
         WHERE cb.user_id = ?1 AND cb.main_category_id = ?2 \
         ORDER BY s.name",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![user_id, main_category_id], |row| {
            Ok(BalanceLine {
                name: row.get(0)?,
                balance: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Every (main, sub) running balance for the user, for the balance table.
pub fn all_sub_balances(conn: &Connection, user_id: &str) -> Result<Vec<(String, BalanceLine)>> {
    let mut stmt = conn.prepare(
        "SELECT m.name, s.name, cb.balance FROM category_balances cb \
         JOIN main_categories m ON cb.main_category_id = m.id \
         JOIN sub_categories s ON cb.sub_category_id = s.id \
         WHERE cb.user_id = ?1 ORDER BY m.id, s.name",
    )?;
    let rows = stmt
        .query_map([user_id], |row| {
            Ok((
                row.get(0)?,
                BalanceLine {
                    name: row.get(1)?,
                    balance: row.get(2)?,
                },
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
