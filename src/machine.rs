use chrono::{Days, NaiveDate};
use regex::Regex;
use rusqlite::Connection;

use crate::categories::{find_main_category, main_category, menu_prompt, resolve_sub_category};
use crate::dialog::{load_state, save_state};
use crate::error::{BotError, Result};
use crate::fmt::money;
use crate::ledger::{last_entry, main_balances, sub_balances, total_balance};
use crate::models::{DialogState, MainCategory, ParsedHints, Phase, Reply};

pub const AMOUNT_PROMPT: &str = "Please enter the amount";
pub const INVALID_AMOUNT: &str = "Please enter a valid amount";
pub const SUB_CATEGORY_PROMPT: &str = "Which sub-category?";
pub const DATE_PROMPT: &str = "Enter date (today / yesterday / YYYY-MM-DD)";
pub const NOTHING_TO_DELETE: &str = "Nothing to delete.";
pub const FALLBACK: &str = "Type help for examples";

pub const HELP_TEXT: &str = "\
Log an expense in one message, e.g. 500 needs food
or send just the amount and I'll ask for the rest.
Categories: 1. Needs, 2. Wants, 3. Savings
Dates: today, yesterday or YYYY-MM-DD
Commands: balance, needs balance, delete last, cancel";

const HELP_PHRASES: &[&str] = &["help", "?"];
const DELETE_PHRASES: &[&str] = &["delete last", "delete last expense"];
const CANCEL_PHRASES: &[&str] = &["cancel", "stop"];
const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// Largest single amount accepted. Keeps running balances well inside `i64`.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

pub fn is_help(msg: &str) -> bool {
    HELP_PHRASES.contains(&msg)
}

pub fn is_delete_request(msg: &str) -> bool {
    DELETE_PHRASES.contains(&msg)
}

pub fn is_cancel(msg: &str) -> bool {
    CANCEL_PHRASES.contains(&msg)
}

/// `today`, `yesterday`, or a strict `YYYY-MM-DD` literal.
pub fn parse_date(msg: &str, today: NaiveDate) -> Option<NaiveDate> {
    match msg {
        "today" => Some(today),
        "yesterday" => today.checked_sub_days(Days::new(1)),
        _ => {
            let strict = Regex::new(DATE_PATTERN)
                .map(|re| re.is_match(msg))
                .unwrap_or(false);
            if !strict {
                return None;
            }
            NaiveDate::parse_from_str(msg, "%Y-%m-%d").ok()
        }
    }
}

/// A whole number in `1..=MAX_AMOUNT`.
pub fn parse_amount(msg: &str) -> Option<i64> {
    if msg.is_empty() || !msg.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    msg.parse::<i64>()
        .ok()
        .filter(|amount| (1..=MAX_AMOUNT).contains(amount))
}

/// Per-turn inputs that do not live in the dialog row.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub user_id: &'a str,
    pub today: NaiveDate,
    pub currency: &'a str,
}

enum BalanceScope {
    All,
    Category(MainCategory),
}

/// One user's dialog, loaded from the store for a single turn.
///
/// Every change to the phase or a pending field is written back through
/// `persist` before `handle_message` returns, so a turn that produced a reply
/// has nothing left only in memory.
pub struct Conversation<'a> {
    conn: &'a Connection,
    ctx: TurnContext<'a>,
    state: DialogState,
}

impl<'a> Conversation<'a> {
    pub fn load(conn: &'a Connection, ctx: TurnContext<'a>) -> Result<Self> {
        let state = load_state(conn, ctx.user_id)?;
        Ok(Self { conn, ctx, state })
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    /// Interpret one normalised message against the current phase.
    pub fn handle_message(&mut self, msg: &str, hints: &ParsedHints) -> Result<Reply> {
        let msg = msg.trim();

        if is_help(msg) {
            return Ok(Reply::Prompt(HELP_TEXT.to_string()));
        }
        if let Some(scope) = self.balance_scope(msg)? {
            return Ok(Reply::Prompt(self.balance_text(scope)?));
        }

        let Some(phase) = self.state.phase else {
            tracing::warn!(user_id = self.ctx.user_id, "unrecognised stored phase, resetting dialog");
            self.state = DialogState::idle();
            self.persist()?;
            return Ok(Reply::Prompt(FALLBACK.to_string()));
        };

        if phase != Phase::Idle && is_cancel(msg) {
            self.state = DialogState::idle();
            self.persist()?;
            return Ok(Reply::Cancelled);
        }

        match phase {
            Phase::Idle if is_delete_request(msg) => self.request_delete(),
            Phase::Idle => self.on_idle(hints),
            Phase::AwaitingAmount => self.on_amount(msg),
            Phase::AwaitingMainCategory => self.on_main_category(msg),
            Phase::AwaitingSubCategory => self.on_sub_category(msg),
            Phase::AwaitingDate => self.on_date(msg),
            Phase::ConfirmingDelete => self.on_confirm_delete(msg),
        }
    }

    fn persist(&self) -> Result<()> {
        save_state(self.conn, self.ctx.user_id, &self.state)?;
        tracing::debug!(
            user_id = self.ctx.user_id,
            phase = %self.state.phase.unwrap_or(Phase::Idle),
            "dialog state saved"
        );
        Ok(())
    }

    fn transition(&mut self, phase: Phase) -> Result<()> {
        self.state.phase = Some(phase);
        self.persist()
    }

    fn known_category(&self, id: i64) -> Result<Option<MainCategory>> {
        match main_category(self.conn, id) {
            Ok(cat) => Ok(Some(cat)),
            Err(BotError::UnknownCategory(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn sub_category_prompt(category: &MainCategory) -> String {
        format!("Which sub-category for {}?", category.name)
    }

    fn on_idle(&mut self, hints: &ParsedHints) -> Result<Reply> {
        if self.state.has_pending() {
            tracing::debug!(user_id = self.ctx.user_id, "discarding stale pending fields");
            self.state.clear_pending();
        }
        let Some(amount) = hints.amount.filter(|a| (1..=MAX_AMOUNT).contains(a)) else {
            self.transition(Phase::AwaitingAmount)?;
            return Ok(Reply::Prompt(AMOUNT_PROMPT.to_string()));
        };
        self.state.pending_amount = Some(amount);
        self.persist()?;

        let category = match hints.main_category {
            Some(id) => self.known_category(id)?,
            None => None,
        };
        let Some(category) = category else {
            self.transition(Phase::AwaitingMainCategory)?;
            return Ok(Reply::Prompt(menu_prompt(self.conn)?));
        };
        self.state.pending_main_category = Some(category.id);
        self.persist()?;

        let label = hints.sub_category.as_deref().map(str::trim).filter(|l| !l.is_empty());
        let Some(label) = label else {
            self.transition(Phase::AwaitingSubCategory)?;
            return Ok(Reply::Prompt(Self::sub_category_prompt(&category)));
        };
        let sub = resolve_sub_category(self.conn, label, category.id)?;
        self.state.pending_sub_category = Some(sub.id);
        self.transition(Phase::AwaitingDate)?;
        Ok(Reply::Prompt(DATE_PROMPT.to_string()))
    }

    fn on_amount(&mut self, msg: &str) -> Result<Reply> {
        let Some(amount) = parse_amount(msg) else {
            return Ok(Reply::Prompt(INVALID_AMOUNT.to_string()));
        };
        self.state.pending_amount = Some(amount);
        self.transition(Phase::AwaitingMainCategory)?;
        Ok(Reply::Prompt(menu_prompt(self.conn)?))
    }

    fn on_main_category(&mut self, msg: &str) -> Result<Reply> {
        let Some(category) = find_main_category(self.conn, msg)? else {
            return Ok(Reply::Prompt(menu_prompt(self.conn)?));
        };
        self.state.pending_main_category = Some(category.id);
        self.transition(Phase::AwaitingSubCategory)?;
        Ok(Reply::Prompt(Self::sub_category_prompt(&category)))
    }

    fn on_sub_category(&mut self, msg: &str) -> Result<Reply> {
        if msg.is_empty() {
            return Ok(Reply::Prompt(SUB_CATEGORY_PROMPT.to_string()));
        }
        let category = match self.state.pending_main_category {
            Some(id) => self.known_category(id)?,
            None => None,
        };
        let Some(category) = category else {
            // pending row lost its main category; ask again instead of guessing
            self.state.pending_main_category = None;
            self.transition(Phase::AwaitingMainCategory)?;
            return Ok(Reply::Prompt(menu_prompt(self.conn)?));
        };
        let sub = resolve_sub_category(self.conn, msg, category.id)?;
        self.state.pending_sub_category = Some(sub.id);
        self.transition(Phase::AwaitingDate)?;
        Ok(Reply::Prompt(DATE_PROMPT.to_string()))
    }

    fn on_date(&mut self, msg: &str) -> Result<Reply> {
        let Some(date) = parse_date(msg, self.ctx.today) else {
            return Ok(Reply::Prompt(DATE_PROMPT.to_string()));
        };
        self.state.pending_date = Some(date);
        self.transition(Phase::Idle)?;
        Ok(Reply::SaveRequested)
    }

    fn on_confirm_delete(&mut self, msg: &str) -> Result<Reply> {
        if msg == "yes" {
            self.transition(Phase::Idle)?;
            return Ok(Reply::DeleteConfirmed);
        }
        self.state = DialogState::idle();
        self.persist()?;
        Ok(Reply::Cancelled)
    }

    fn request_delete(&mut self) -> Result<Reply> {
        let Some(entry) = last_entry(self.conn, self.ctx.user_id)? else {
            return Ok(Reply::Prompt(NOTHING_TO_DELETE.to_string()));
        };
        self.transition(Phase::ConfirmingDelete)?;
        Ok(Reply::Prompt(format!(
            "Delete your last entry: {} {} / {} on {}? Reply yes to confirm.",
            money(entry.amount, self.ctx.currency),
            entry.main_category,
            entry.sub_category,
            entry.date.format("%Y-%m-%d"),
        )))
    }

    fn balance_scope(&self, msg: &str) -> Result<Option<BalanceScope>> {
        if msg == "balance" {
            return Ok(Some(BalanceScope::All));
        }
        let Some(name) = msg.strip_suffix(" balance") else {
            return Ok(None);
        };
        if name.is_empty() || name.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(None);
        }
        Ok(find_main_category(self.conn, name)?.map(BalanceScope::Category))
    }

    fn balance_text(&self, scope: BalanceScope) -> Result<String> {
        let user_id = self.ctx.user_id;
        let currency = self.ctx.currency;
        let mut lines = Vec::new();
        match scope {
            BalanceScope::All => {
                lines.push("Balances".to_string());
                for line in main_balances(self.conn, user_id)? {
                    lines.push(format!("{}: {}", line.name, money(line.balance, currency)));
                }
                lines.push(format!(
                    "Total balance: {}",
                    money(total_balance(self.conn, user_id)?, currency)
                ));
            }
            BalanceScope::Category(category) => {
                let subs = sub_balances(self.conn, user_id, category.id)?;
                let aggregate: i64 = subs.iter().map(|s| s.balance).sum();
                lines.push(format!("{} balance: {}", category.name, money(aggregate, currency)));
                for sub in subs {
                    lines.push(format!("  {}: {}", sub.name, money(sub.balance, currency)));
                }
            }
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::dialog::ensure_user;

    const USER: &str = "whatsapp:+15550100";

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn ctx() -> TurnContext<'static> {
        TurnContext {
            user_id: USER,
            today: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            currency: "₹",
        }
    }

    fn turn(conn: &Connection, msg: &str, hints: ParsedHints) -> Reply {
        let mut conv = Conversation::load(conn, ctx()).unwrap();
        conv.handle_message(msg, &hints).unwrap()
    }

    fn stored(conn: &Connection) -> DialogState {
        load_state(conn, USER).unwrap()
    }

    fn put(conn: &Connection, state: &DialogState) {
        ensure_user(conn, USER).unwrap();
        save_state(conn, USER, state).unwrap();
    }

    fn in_phase(phase: Phase) -> DialogState {
        let mut state = DialogState::idle();
        state.phase = Some(phase);
        state
    }

    fn prompt(text: &str) -> Reply {
        Reply::Prompt(text.to_string())
    }

    #[test]
    fn test_parse_date() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_date("today", today), Some(today));
        assert_eq!(parse_date("yesterday", today), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_date("2024-01-15", today), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(parse_date("2024-1-15", today), None);
        assert_eq!(parse_date("2024-02-30", today), None);
        assert_eq!(parse_date("tomorrow", today), None);
        assert_eq!(parse_date(" 2024-01-15", today), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("500"), Some(500));
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount("12.5"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1000000000000"), Some(MAX_AMOUNT));
        assert_eq!(parse_amount("1000000000001"), None);
        assert_eq!(parse_amount("9223372036854775807"), None);
    }

    #[test]
    fn test_idle_without_amount_asks_for_it() {
        let (_dir, conn) = test_db();
        assert_eq!(turn(&conn, "hello", ParsedHints::default()), prompt(AMOUNT_PROMPT));
        assert_eq!(stored(&conn).phase, Some(Phase::AwaitingAmount));
    }

    #[test]
    fn test_fast_path_reaches_date_in_one_turn() {
        let (_dir, conn) = test_db();
        let hints = ParsedHints {
            amount: Some(500),
            main_category: Some(1),
            sub_category: Some("Food".into()),
        };
        assert_eq!(turn(&conn, "500 needs food", hints), prompt(DATE_PROMPT));
        let state = stored(&conn);
        assert_eq!(state.phase, Some(Phase::AwaitingDate));
        assert_eq!(state.pending_amount, Some(500));
        assert_eq!(state.pending_main_category, Some(1));
        let food = resolve_sub_category(&conn, "food", 1).unwrap();
        assert_eq!(state.pending_sub_category, Some(food.id));
    }

    #[test]
    fn test_partial_fast_path_keeps_what_it_got() {
        let (_dir, conn) = test_db();
        let hints = ParsedHints {
            amount: Some(120),
            main_category: Some(2),
            sub_category: None,
        };
        assert_eq!(turn(&conn, "120 wants", hints), prompt("Which sub-category for Wants?"));
        let state = stored(&conn);
        assert_eq!(state.phase, Some(Phase::AwaitingSubCategory));
        assert_eq!(state.pending_amount, Some(120));
        assert_eq!(state.pending_main_category, Some(2));
    }

    #[test]
    fn test_fast_path_with_unknown_category_id_asks_menu() {
        let (_dir, conn) = test_db();
        let hints = ParsedHints {
            amount: Some(120),
            main_category: Some(9),
            sub_category: Some("Food".into()),
        };
        let reply = turn(&conn, "120", hints);
        assert_eq!(reply, Reply::Prompt(menu_prompt(&conn).unwrap()));
        let state = stored(&conn);
        assert_eq!(state.phase, Some(Phase::AwaitingMainCategory));
        assert_eq!(state.pending_main_category, None);
        assert_eq!(state.pending_sub_category, None);
    }

    #[test]
    fn test_rejected_input_changes_nothing() {
        let (_dir, conn) = test_db();
        let food = resolve_sub_category(&conn, "food", 1).unwrap();
        let cases: Vec<(DialogState, &str)> = vec![
            (in_phase(Phase::AwaitingAmount), "abc"),
            (in_phase(Phase::AwaitingAmount), "0"),
            (in_phase(Phase::AwaitingAmount), "9223372036854775807"),
            (
                DialogState { pending_amount: Some(5), ..in_phase(Phase::AwaitingMainCategory) },
                "groceries",
            ),
            (
                DialogState { pending_amount: Some(5), ..in_phase(Phase::AwaitingMainCategory) },
                "7",
            ),
            (
                DialogState {
                    pending_amount: Some(5),
                    pending_main_category: Some(1),
                    ..in_phase(Phase::AwaitingSubCategory)
                },
                "",
            ),
            (
                DialogState {
                    pending_amount: Some(5),
                    pending_main_category: Some(1),
                    pending_sub_category: Some(food.id),
                    ..in_phase(Phase::AwaitingDate)
                },
                "next week",
            ),
            (
                DialogState {
                    pending_amount: Some(5),
                    pending_main_category: Some(1),
                    pending_sub_category: Some(food.id),
                    ..in_phase(Phase::AwaitingDate)
                },
                "2024/01/15",
            ),
        ];
        for (state, msg) in cases {
            put(&conn, &state);
            let reply = turn(&conn, msg, ParsedHints::default());
            assert!(matches!(reply, Reply::Prompt(_)), "{msg:?} gave {reply:?}");
            assert_eq!(stored(&conn), state, "{msg:?} mutated the dialog");
        }
    }

    #[test]
    fn test_amount_then_menu() {
        let (_dir, conn) = test_db();
        put(&conn, &in_phase(Phase::AwaitingAmount));
        assert_eq!(turn(&conn, "abc", ParsedHints::default()), prompt(INVALID_AMOUNT));
        assert_eq!(stored(&conn).phase, Some(Phase::AwaitingAmount));
        let reply = turn(&conn, "500", ParsedHints::default());
        assert_eq!(reply, Reply::Prompt(menu_prompt(&conn).unwrap()));
        assert_eq!(stored(&conn).pending_amount, Some(500));
    }

    #[test]
    fn test_step_by_step_to_save() {
        let (_dir, conn) = test_db();
        put(&conn, &in_phase(Phase::AwaitingAmount));
        turn(&conn, "500", ParsedHints::default());
        assert_eq!(turn(&conn, "savings", ParsedHints::default()), prompt("Which sub-category for Savings?"));
        assert_eq!(turn(&conn, "emergency", ParsedHints::default()), prompt(DATE_PROMPT));
        assert_eq!(turn(&conn, "2024-01-15", ParsedHints::default()), Reply::SaveRequested);

        let state = stored(&conn);
        assert_eq!(state.phase, Some(Phase::Idle));
        assert_eq!(state.pending_amount, Some(500));
        assert_eq!(state.pending_main_category, Some(3));
        assert_eq!(state.pending_date, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn test_main_category_by_index_echoes_name() {
        let (_dir, conn) = test_db();
        put(&conn, &DialogState { pending_amount: Some(5), ..in_phase(Phase::AwaitingMainCategory) });
        assert_eq!(turn(&conn, "2", ParsedHints::default()), prompt("Which sub-category for Wants?"));
        assert_eq!(stored(&conn).pending_main_category, Some(2));
    }

    #[test]
    fn test_sub_category_stores_id_not_text() {
        let (_dir, conn) = test_db();
        put(
            &conn,
            &DialogState {
                pending_amount: Some(5),
                pending_main_category: Some(1),
                ..in_phase(Phase::AwaitingSubCategory)
            },
        );
        turn(&conn, "eating out", ParsedHints::default());
        let name: String = conn
            .query_row(
                "SELECT name FROM sub_categories WHERE id = ?1",
                [stored(&conn).pending_sub_category.unwrap()],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(name, "Eating out");
    }

    #[test]
    fn test_sub_category_without_main_goes_back_to_menu() {
        let (_dir, conn) = test_db();
        put(&conn, &DialogState { pending_amount: Some(5), ..in_phase(Phase::AwaitingSubCategory) });
        let reply = turn(&conn, "food", ParsedHints::default());
        assert_eq!(reply, Reply::Prompt(menu_prompt(&conn).unwrap()));
        assert_eq!(stored(&conn).phase, Some(Phase::AwaitingMainCategory));
    }

    #[test]
    fn test_yesterday_is_the_day_before() {
        let (_dir, conn) = test_db();
        let food = resolve_sub_category(&conn, "food", 1).unwrap();
        put(
            &conn,
            &DialogState {
                pending_amount: Some(5),
                pending_main_category: Some(1),
                pending_sub_category: Some(food.id),
                ..in_phase(Phase::AwaitingDate)
            },
        );
        assert_eq!(turn(&conn, "yesterday", ParsedHints::default()), Reply::SaveRequested);
        assert_eq!(stored(&conn).pending_date, NaiveDate::from_ymd_opt(2024, 3, 9));
    }

    #[test]
    fn test_help_and_balance_keep_the_dialog() {
        let (_dir, conn) = test_db();
        let state = DialogState {
            pending_amount: Some(500),
            pending_main_category: Some(1),
            ..in_phase(Phase::AwaitingSubCategory)
        };
        put(&conn, &state);

        assert_eq!(turn(&conn, "help", ParsedHints::default()), prompt(HELP_TEXT));
        assert_eq!(stored(&conn), state);

        let Reply::Prompt(text) = turn(&conn, "balance", ParsedHints::default()) else {
            panic!("balance should be a prompt");
        };
        assert!(text.starts_with("Balances\nNeeds: ₹0"), "{text}");
        assert!(text.ends_with("Total balance: ₹0"), "{text}");
        assert_eq!(stored(&conn), state);

        assert_eq!(turn(&conn, "food", ParsedHints::default()), prompt(DATE_PROMPT));
    }

    #[test]
    fn test_scoped_balance() {
        let (_dir, conn) = test_db();
        ensure_user(&conn, USER).unwrap();
        let rent = resolve_sub_category(&conn, "rent", 1).unwrap();
        conn.execute(
            "INSERT INTO category_balances (user_id, main_category_id, sub_category_id, balance) VALUES (?1, 1, ?2, -1200)",
            rusqlite::params![USER, rent.id],
        )
        .unwrap();
        assert_eq!(
            turn(&conn, "needs balance", ParsedHints::default()),
            prompt("Needs balance: -₹1,200\n  Rent: -₹1,200")
        );
        assert_eq!(turn(&conn, "wants balance", ParsedHints::default()), prompt("Wants balance: ₹0"));
    }

    #[test]
    fn test_unknown_balance_scope_is_ordinary_text() {
        let (_dir, conn) = test_db();
        put(&conn, &in_phase(Phase::AwaitingAmount));
        assert_eq!(turn(&conn, "1 balance", ParsedHints::default()), prompt(INVALID_AMOUNT));
        assert_eq!(turn(&conn, "bank balance", ParsedHints::default()), prompt(INVALID_AMOUNT));
    }

    #[test]
    fn test_cancel_clears_pending() {
        let (_dir, conn) = test_db();
        put(
            &conn,
            &DialogState {
                pending_amount: Some(500),
                pending_main_category: Some(1),
                ..in_phase(Phase::AwaitingSubCategory)
            },
        );
        assert_eq!(turn(&conn, "cancel", ParsedHints::default()), Reply::Cancelled);
        assert_eq!(stored(&conn), DialogState::idle());
    }

    #[test]
    fn test_cancel_when_idle_is_ordinary_text() {
        let (_dir, conn) = test_db();
        assert_eq!(turn(&conn, "cancel", ParsedHints::default()), prompt(AMOUNT_PROMPT));
    }

    #[test]
    fn test_unknown_phase_resets_to_idle() {
        let (_dir, conn) = test_db();
        ensure_user(&conn, USER).unwrap();
        conn.execute(
            "UPDATE conversation_state SET phase = 'awaiting_receipt', pending_amount = 9 WHERE user_id = ?1",
            [USER],
        )
        .unwrap();
        assert_eq!(turn(&conn, "500", ParsedHints::default()), prompt(FALLBACK));
        assert_eq!(stored(&conn), DialogState::idle());
    }

    #[test]
    fn test_delete_request_with_nothing_recorded() {
        let (_dir, conn) = test_db();
        assert_eq!(turn(&conn, "delete last", ParsedHints::default()), prompt(NOTHING_TO_DELETE));
        assert_eq!(stored(&conn).phase, Some(Phase::Idle));
    }

    #[test]
    fn test_delete_confirmation() {
        let (_dir, conn) = test_db();
        ensure_user(&conn, USER).unwrap();
        let food = resolve_sub_category(&conn, "food", 1).unwrap();
        conn.execute(
            "INSERT INTO entries (user_id, main_category_id, sub_category_id, amount, entry_kind, entry_date) \
             VALUES (?1, 1, ?2, 500, 'EXPENSE', '2024-03-10')",
            rusqlite::params![USER, food.id],
        )
        .unwrap();

        assert_eq!(
            turn(&conn, "delete last expense", ParsedHints::default()),
            prompt("Delete your last entry: ₹500 Needs / Food on 2024-03-10? Reply yes to confirm.")
        );
        assert_eq!(stored(&conn).phase, Some(Phase::ConfirmingDelete));
        assert_eq!(turn(&conn, "yes", ParsedHints::default()), Reply::DeleteConfirmed);
        assert_eq!(stored(&conn).phase, Some(Phase::Idle));

        turn(&conn, "delete last", ParsedHints::default());
        assert_eq!(turn(&conn, "no", ParsedHints::default()), Reply::Cancelled);
        assert_eq!(stored(&conn), DialogState::idle());
    }
}
