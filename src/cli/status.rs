use crate::db::get_connection;
use crate::error::Result;
use crate::settings::{db_path, load_settings};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db_path = db_path(&settings);

    println!("Data dir:   {}", settings.data_dir);
    println!("Database:   {}", db_path.display());
    println!("Currency:   {}", settings.currency_symbol);

    if db_path.exists() {
        let conn = get_connection(&db_path)?;

        let users: i64 = conn.query_row("SELECT count(*) FROM users", [], |r| r.get(0))?;
        let entries: i64 = conn.query_row("SELECT count(*) FROM entries", [], |r| r.get(0))?;
        let subs: i64 = conn.query_row("SELECT count(*) FROM sub_categories", [], |r| r.get(0))?;
        let open: i64 = conn.query_row(
            "SELECT count(*) FROM conversation_state WHERE phase != 'idle'",
            [],
            |r| r.get(0),
        )?;

        println!();
        println!("Users:           {users}");
        println!("Entries:         {entries}");
        println!("Sub-categories:  {subs}");
        println!("Open dialogs:    {open}");
    } else {
        println!();
        println!("Database not found. Run `tallybot init` to set up.");
    }

    Ok(())
}
