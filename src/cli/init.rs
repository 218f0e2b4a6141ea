use std::path::PathBuf;

use crate::cli::open_db;
use crate::error::Result;
use crate::settings::{load_settings, load_stored_settings, save_settings, shellexpand_path};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut stored = load_stored_settings();
    let settings = match data_dir {
        Some(dir) => {
            stored.data_dir = shellexpand_path(&dir);
            stored.clone()
        }
        None => load_settings(),
    };
    // only an explicit --data-dir is persisted; the env override stays per-process
    save_settings(&stored)?;

    open_db(&settings)?;
    tracing::info!(data_dir = %settings.data_dir, "database initialized");
    println!("Initialized tallybot at {}", PathBuf::from(&settings.data_dir).display());
    Ok(())
}
