use anyhow::Result;
use chrono::NaiveDate;
use daybook_core::EventStore;
use daybook_core::view::{mini_calendar, statistics};

use crate::render::{Render, render_categories};

/// The sidebar: mini calendar, counters and categories.
pub fn run(store: &EventStore, today: NaiveDate) -> Result<()> {
    println!("{}", mini_calendar(store, today, today)?.render());
    println!();
    println!("{}", statistics(store, today, today).render());
    println!();
    println!("{}", render_categories(&store.category_counts()));
    Ok(())
}
