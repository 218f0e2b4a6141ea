use chrono::Local;

use crate::bot::{handle_turn, TRY_AGAIN};
use crate::cli::open_db;
use crate::error::Result;
use crate::machine::TurnContext;
use crate::settings::load_settings;

pub fn run(user: &str, message: &[String]) -> Result<()> {
    let settings = load_settings();
    let mut conn = open_db(&settings)?;
    let ctx = TurnContext {
        user_id: user.trim(),
        today: Local::now().date_naive(),
        currency: &settings.currency_symbol,
    };

    match handle_turn(&mut conn, ctx, &message.join(" ")) {
        Ok(reply) => {
            println!("{reply}");
            Ok(())
        }
        Err(e) => {
            tracing::error!(user_id = ctx.user_id, error = %e, "turn failed");
            println!("{TRY_AGAIN}");
            Err(e)
        }
    }
}
