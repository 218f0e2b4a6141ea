use comfy_table::{Cell, Table};

use crate::cli::open_db;
use crate::error::Result;
use crate::fmt::money;
use crate::ledger::recent_entries;
use crate::settings::load_settings;

pub fn run(user: &str, limit: usize) -> Result<()> {
    let settings = load_settings();
    let conn = open_db(&settings)?;
    let user_id = user.trim();
    let entries = recent_entries(&conn, user_id, limit)?;

    if entries.is_empty() {
        println!("No entries for {user_id}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Category", "Sub-category", "Kind", "Amount"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(entry.date.format("%Y-%m-%d")),
            Cell::new(entry.main_category),
            Cell::new(entry.sub_category),
            Cell::new(entry.kind.as_str()),
            Cell::new(money(entry.amount, &settings.currency_symbol)),
        ]);
    }
    println!("Entries for {user_id}\n{table}");
    Ok(())
}
