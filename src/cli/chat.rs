use std::io::{BufRead, Write};

use chrono::Local;
use colored::Colorize;

use crate::bot::{handle_turn, TRY_AGAIN};
use crate::cli::open_db;
use crate::error::Result;
use crate::machine::TurnContext;
use crate::settings::load_settings;

pub fn run(user: &str) -> Result<()> {
    let settings = load_settings();
    let mut conn = open_db(&settings)?;
    let user_id = user.trim();

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        // re-read the clock each turn so a long session rolls over midnight
        let ctx = TurnContext {
            user_id,
            today: Local::now().date_naive(),
            currency: &settings.currency_symbol,
        };
        match handle_turn(&mut conn, ctx, &line) {
            Ok(reply) => writeln!(stdout, "{reply}")?,
            Err(e) => {
                tracing::error!(user_id, error = %e, "turn failed");
                writeln!(stdout, "{}", TRY_AGAIN.red())?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}
