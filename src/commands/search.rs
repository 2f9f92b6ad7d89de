use anyhow::{Result, bail};
use daybook_core::EventStore;
use daybook_core::view::search_results;

use crate::render::render_search;

pub fn run(store: &EventStore, query: &str) -> Result<()> {
    let Some(results) = search_results(store, query) else {
        bail!("Search query is empty");
    };

    println!("{}", render_search(&results, store));
    Ok(())
}
