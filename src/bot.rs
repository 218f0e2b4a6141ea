use rusqlite::{Connection, TransactionBehavior};

use crate::categories::list_main_categories;
use crate::dialog::ensure_user;
use crate::error::{BotError, Result};
use crate::fmt::money;
use crate::ledger::{delete_last_entry, record_entry, total_balance};
use crate::machine::{Conversation, TurnContext, NOTHING_TO_DELETE};
use crate::models::{Phase, Reply, SavedEntry};
use crate::tokenizer::parse_hints;

pub const CANCELLED: &str = "Cancelled";
pub const TRY_AGAIN: &str = "Something went wrong, please try again.";

fn saved_text(saved: &SavedEntry, total: i64, currency: &str) -> String {
    format!(
        "\u{2705} Saved\n{}\n{} updated\nTotal balance: {}",
        money(saved.amount, currency),
        saved.main_category.name,
        money(total, currency)
    )
}

/// Run one inbound message through the dialog and return the reply text.
///
/// The whole turn (dialog update, entry recording or deletion) happens in a
/// single IMMEDIATE transaction, so two turns for the same user never
/// interleave and a failed turn leaves the database as it was.
pub fn handle_turn(conn: &mut Connection, ctx: TurnContext<'_>, raw: &str) -> Result<String> {
    if ctx.user_id.trim().is_empty() {
        return Err(BotError::InvalidUser(ctx.user_id.to_string()));
    }
    let msg = raw.trim().to_lowercase();
    let user_id = ctx.user_id;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    ensure_user(&tx, user_id)?;
    let directory = list_main_categories(&tx)?;
    let hints = parse_hints(&msg, &directory);

    let reply = {
        let mut conversation = Conversation::load(&tx, ctx)?;
        let reply = conversation.handle_message(&msg, &hints)?;
        tracing::debug!(
            user_id,
            phase = %conversation.state().phase.unwrap_or(Phase::Idle),
            ?reply,
            "turn handled"
        );
        reply
    };

    let text = match reply {
        Reply::Prompt(text) => text,
        Reply::SaveRequested => {
            let saved = record_entry(&tx, user_id, ctx.today)?;
            let total = total_balance(&tx, user_id)?;
            saved_text(&saved, total, ctx.currency)
        }
        Reply::DeleteConfirmed => match delete_last_entry(&tx, user_id)? {
            Some(entry) => format!(
                "\u{1F5D1} Deleted {} {} / {}\nTotal balance: {}",
                money(entry.amount, ctx.currency),
                entry.main_category,
                entry.sub_category,
                money(total_balance(&tx, user_id)?, ctx.currency)
            ),
            None => NOTHING_TO_DELETE.to_string(),
        },
        Reply::Cancelled => CANCELLED.to_string(),
    };

    tx.commit()?;
    Ok(text)
}
