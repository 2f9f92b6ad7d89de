use anyhow::Result;
use daybook_core::{CategoryId, EventStore};
use owo_colors::OwoColorize;

use crate::render::render_categories;

pub fn list(store: &EventStore) -> Result<()> {
    println!("{}", render_categories(&store.category_counts()));
    Ok(())
}

pub fn add(store: &mut EventStore, name: String, color: String) -> Result<()> {
    let id = store.add_category(name.clone(), color)?;
    println!("{}", format!("  Added category {} [{}]", name, id).green());
    Ok(())
}

pub fn toggle(store: &mut EventStore, id: u64) -> Result<()> {
    let visible = store.toggle_category(CategoryId(id))?;
    let state = if visible { "shown" } else { "hidden" };
    println!("  Category {} is now {}", id, state);
    Ok(())
}
