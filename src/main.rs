mod bot;
mod categories;
mod cli;
mod db;
mod dialog;
mod error;
mod fmt;
mod ledger;
mod logging;
mod machine;
mod models;
mod settings;
mod tokenizer;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    logging::init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Send { user, message } => cli::send::run(&user, &message),
        Commands::Chat { user } => cli::chat::run(&user),
        Commands::Balance { user } => cli::balance::run(&user),
        Commands::History { user, limit } => cli::history::run(&user, limit),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
