use anyhow::Result;
use daybook_core::{DaybookError, EventId, EventStore};

use crate::render::render_details;

pub fn run(store: &EventStore, id: u64) -> Result<()> {
    let id = EventId(id);
    let event = store.get(id).ok_or(DaybookError::NotFound(id))?;
    println!("{}", render_details(event, store));
    Ok(())
}
