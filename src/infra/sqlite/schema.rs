use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS preset (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            zone        TEXT NOT NULL,
            ward        TEXT NOT NULL,
            date_from   TEXT,
            date_to     TEXT,
            saved_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS preset_field (
            preset_id   INTEGER NOT NULL,
            field       TEXT NOT NULL,
            item_idx    INTEGER NOT NULL,
            value       TEXT NOT NULL,
            PRIMARY KEY (preset_id, field, item_idx),
            FOREIGN KEY (preset_id) REFERENCES preset(id)
        );

        CREATE TABLE IF NOT EXISTS preset_checked (
            preset_id   INTEGER NOT NULL,
            item        TEXT NOT NULL,
            PRIMARY KEY (preset_id, item),
            FOREIGN KEY (preset_id) REFERENCES preset(id)
        );
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
