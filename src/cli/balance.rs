use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::open_db;
use crate::error::Result;
use crate::fmt::money;
use crate::ledger::{all_sub_balances, main_balances, total_balance};
use crate::settings::load_settings;

pub fn run(user: &str) -> Result<()> {
    let settings = load_settings();
    let conn = open_db(&settings)?;
    let user_id = user.trim();
    let currency = settings.currency_symbol.as_str();

    let subs = all_sub_balances(&conn, user_id)?;

    let mut table = Table::new();
    table.set_header(vec!["Category", "Balance"]);
    for main in main_balances(&conn, user_id)? {
        table.add_row(vec![
            Cell::new(main.name.as_str().bold()),
            Cell::new(money(main.balance, currency)),
        ]);
        for (_, sub) in subs.iter().filter(|(owner, _)| *owner == main.name) {
            table.add_row(vec![
                Cell::new(format!("  {}", sub.name)),
                Cell::new(money(sub.balance, currency)),
            ]);
        }
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(total_balance(&conn, user_id)?, currency)),
    ]);
    println!("Balances for {user_id}\n{table}");
    Ok(())
}
