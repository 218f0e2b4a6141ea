use chrono::NaiveDate;
use rusqlite::Connection;

use crate::error::Result;
use crate::models::{DialogState, Phase};

const DATE_FMT: &str = "%Y-%m-%d";

/// Create the user and their dialog row on first contact.
pub fn ensure_user(conn: &Connection, user_id: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO users (user_id, total_balance) VALUES (?1, 0)",
        [user_id],
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO conversation_state (user_id, phase) VALUES (?1, 'idle')",
        [user_id],
    )?;
    Ok(())
}

pub fn load_state(conn: &Connection, user_id: &str) -> Result<DialogState> {
    ensure_user(conn, user_id)?;
    let (phase, amount, main, sub, date): (String, Option<i64>, Option<i64>, Option<i64>, Option<String>) =
        conn.query_row(
            "SELECT phase, pending_amount, pending_main_category_id, pending_sub_category_id, pending_date \
             FROM conversation_state WHERE user_id = ?1",
            [user_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
        )?;

    Ok(DialogState {
        phase: phase.parse::<Phase>().ok(),
        pending_amount: amount,
        pending_main_category: main,
        pending_sub_category: sub,
        pending_date: date.and_then(|d| NaiveDate::parse_from_str(&d, DATE_FMT).ok()),
    })
}

/// Write the whole dialog row. A state with an unknown phase is stored as idle.
pub fn save_state(conn: &Connection, user_id: &str, state: &DialogState) -> Result<()> {
    let phase = state.phase.unwrap_or(Phase::Idle);
    let date = state.pending_date.map(|d| d.format(DATE_FMT).to_string());
    conn.execute(
        "UPDATE conversation_state SET phase = ?1, pending_amount = ?2, pending_main_category_id = ?3, \
         pending_sub_category_id = ?4, pending_date = ?5, updated_at = datetime('now') WHERE user_id = ?6",
        rusqlite::params![
            phase.as_str(),
            state.pending_amount,
            state.pending_main_category,
            state.pending_sub_category,
            date,
            user_id
        ],
    )?;
    Ok(())
}

pub fn clear_pending(conn: &Connection, user_id: &str) -> Result<()> {
    conn.execute(
        "UPDATE conversation_state SET pending_amount = NULL, pending_main_category_id = NULL, \
         pending_sub_category_id = NULL, pending_date = NULL, updated_at = datetime('now') WHERE user_id = ?1",
        [user_id],
    )?;
    Ok(())
}
