use anyhow::Result;
use daybook_core::{EventId, EventStore};
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(store: &mut EventStore, id: u64) -> Result<()> {
    let copy_id = store.duplicate(EventId(id))?;

    if let Some(copy) = store.get(copy_id) {
        println!("{} {}", "  Duplicated:".green(), copy.render());
    }

    Ok(())
}
