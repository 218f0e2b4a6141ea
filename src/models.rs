use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

/// Top-level bucket from the fixed category directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainCategory {
    pub id: i64,
    pub name: String,
    pub is_savings: bool,
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCategory {
    pub id: i64,
    pub name: String,
    pub main_category_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Expense,
    Saving,
}

impl EntryKind {
    pub fn for_category(category: &MainCategory) -> Self {
        if category.is_savings {
            EntryKind::Saving
        } else {
            EntryKind::Expense
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Expense => "EXPENSE",
            EntryKind::Saving => "SAVING",
        }
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EXPENSE" => Ok(EntryKind::Expense),
            "SAVING" => Ok(EntryKind::Saving),
            other => Err(format!("unknown entry kind: {other}")),
        }
    }
}

/// A recorded transaction. Rows are never edited, only deleted.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: i64,
    pub user_id: String,
    pub main_category: String,
    pub sub_category: String,
    pub amount: i64,
    pub kind: EntryKind,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingAmount,
    AwaitingMainCategory,
    AwaitingSubCategory,
    AwaitingDate,
    ConfirmingDelete,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::AwaitingAmount => "awaiting_amount",
            Phase::AwaitingMainCategory => "awaiting_main_category",
            Phase::AwaitingSubCategory => "awaiting_sub_category",
            Phase::AwaitingDate => "awaiting_date",
            Phase::ConfirmingDelete => "confirming_delete",
        }
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Phase::Idle),
            "awaiting_amount" => Ok(Phase::AwaitingAmount),
            "awaiting_main_category" => Ok(Phase::AwaitingMainCategory),
            "awaiting_sub_category" => Ok(Phase::AwaitingSubCategory),
            "awaiting_date" => Ok(Phase::AwaitingDate),
            "confirming_delete" => Ok(Phase::ConfirmingDelete),
            other => Err(format!("unknown phase: {other}")),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The per-user dialog row. `phase` is `None` when the stored value is not
/// one this build understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogState {
    pub phase: Option<Phase>,
    pub pending_amount: Option<i64>,
    pub pending_main_category: Option<i64>,
    pub pending_sub_category: Option<i64>,
    pub pending_date: Option<NaiveDate>,
}

impl DialogState {
    pub fn idle() -> Self {
        Self {
            phase: Some(Phase::Idle),
            pending_amount: None,
            pending_main_category: None,
            pending_sub_category: None,
            pending_date: None,
        }
    }

    pub fn clear_pending(&mut self) {
        self.pending_amount = None;
        self.pending_main_category = None;
        self.pending_sub_category = None;
        self.pending_date = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending_amount.is_some()
            || self.pending_main_category.is_some()
            || self.pending_sub_category.is_some()
            || self.pending_date.is_some()
    }
}

/// Candidate fields pulled out of one inbound message by the tokenizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHints {
    pub amount: Option<i64>,
    pub main_category: Option<i64>,
    pub sub_category: Option<String>,
}

/// Outcome of one dialog turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Prompt(String),
    SaveRequested,
    DeleteConfirmed,
    Cancelled,
}

/// What the recorder committed, for composing the confirmation.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SavedEntry {
    pub entry_id: i64,
    pub amount: i64,
    pub main_category: MainCategory,
    pub kind: EntryKind,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceLine {
    pub name: String,
    pub balance: i64,
}
