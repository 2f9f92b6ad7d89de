use anyhow::Result;
use chrono::NaiveDate;
use daybook_core::EventStore;
use daybook_core::view::{ViewKind, ViewState};
use owo_colors::OwoColorize;

use crate::render::ViewRender;

pub fn run(
    store: &EventStore,
    kind: ViewKind,
    date: NaiveDate,
    next: u32,
    prev: u32,
    today: NaiveDate,
) -> Result<()> {
    let mut state = ViewState::new(date, kind);
    for _ in 0..next {
        state.next();
    }
    for _ in 0..prev {
        state.previous();
    }

    let view = state.materialize(store, today)?;

    println!("{}", state.title().bold());
    println!();
    println!("{}", view.render(store));

    Ok(())
}
