use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use daybook_core::EventStore;
use daybook_core::transfer::export_filename;
use owo_colors::OwoColorize;

pub fn run(store: &EventStore, output: Option<PathBuf>, today: NaiveDate) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(export_filename(today)));
    let json = store.export_json(Utc::now())?;

    std::fs::write(&path, json).with_context(|| format!("Could not write {}", path.display()))?;

    println!(
        "{}",
        format!(
            "  Exported {} events to {}",
            store.events().len(),
            path.display()
        )
        .green()
    );
    Ok(())
}
