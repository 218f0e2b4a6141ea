pub mod balance;
pub mod chat;
pub mod history;
pub mod init;
pub mod send;
pub mod status;

use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{db_path, Settings};

/// Open the configured database, creating the directory and schema if needed.
pub(crate) fn open_db(settings: &Settings) -> Result<Connection> {
    std::fs::create_dir_all(&settings.data_dir)?;
    let conn = get_connection(&db_path(settings))?;
    init_db(&conn)?;
    Ok(conn)
}

#[derive(Parser)]
#[command(name = "tallybot", about = "Log expenses one chat message at a time.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for tallybot data (default: ~/Documents/tallybot)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Deliver one message as a user and print the bot's reply.
    Send {
        /// Sender identity, e.g. 'whatsapp:+15550100'
        #[arg(long)]
        user: String,
        /// Message text
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Chat as a user: one message per stdin line, replies on stdout.
    Chat {
        /// Sender identity
        #[arg(long)]
        user: String,
    },
    /// Show a user's balances per category and sub-category.
    Balance {
        /// Sender identity
        #[arg(long)]
        user: String,
    },
    /// List a user's most recent entries.
    History {
        /// Sender identity
        #[arg(long)]
        user: String,
        /// Number of entries to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Show the data directory and summary counts.
    Status,
}
