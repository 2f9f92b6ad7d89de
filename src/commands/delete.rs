use anyhow::Result;
use daybook_core::{DaybookError, EventId, EventStore};
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(store: &mut EventStore, id: u64, force: bool) -> Result<()> {
    let id = EventId(id);
    let event = store.get(id).ok_or(DaybookError::NotFound(id))?;

    if !force {
        println!("  {}", event.render());
        let confirmed = Confirm::new()
            .with_prompt("Are you sure you want to delete this event?")
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    let removed = store.delete(id)?;
    println!("{}", format!("  Deleted: {}", removed.title).red());

    Ok(())
}
