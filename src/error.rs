use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid user id: {0:?}")]
    InvalidUser(String),

    #[error("Dialog for {0} is missing pending fields")]
    IncompleteDialog(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(i64),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
