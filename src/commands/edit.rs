use anyhow::Result;
use daybook_core::{EventId, EventStore};
use owo_colors::OwoColorize;

use super::{EventFields, require_category};

/// Replace an event with its current fields overlaid by the given ones.
/// A pending reminder fires again for the edited event.
pub fn run(store: &mut EventStore, id: u64, title: Option<String>, fields: EventFields) -> Result<()> {
    let id = EventId(id);
    let mut draft = store
        .get(id)
        .ok_or(daybook_core::DaybookError::NotFound(id))?
        .to_draft();

    if let Some(title) = title {
        draft.title = title;
    }
    fields.apply(&mut draft);
    require_category(store, &draft)?;

    let event = store.update(id, draft)?;
    println!("{}", format!("  Updated: {}", event.title).green());

    Ok(())
}
