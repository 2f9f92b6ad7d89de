use std::path::Path;

use anyhow::{Context, Result};
use daybook_core::EventStore;
use owo_colors::OwoColorize;

pub fn run(store: &mut EventStore, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;

    let summary = store.import_json(&json)?;

    println!(
        "{}",
        format!(
            "  Imported {} events and {} categories",
            summary.events, summary.categories
        )
        .green()
    );
    Ok(())
}
