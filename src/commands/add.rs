use anyhow::Result;
use chrono::NaiveDate;
use daybook_core::{EventDraft, EventStore};
use dialoguer::Input;
use owo_colors::OwoColorize;

use super::{EventFields, require_category};

pub fn run(
    store: &mut EventStore,
    title: Option<String>,
    fields: EventFields,
    today: NaiveDate,
) -> Result<()> {
    let title = match title {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("  Title")
            .interact_text()?,
    };

    let mut draft = EventDraft::new(title, today);
    fields.apply(&mut draft);
    require_category(store, &draft)?;

    let created = store.create(draft)?;

    if let Some(warning) = &created.warning {
        eprintln!("{}", format!("  {}", warning).yellow());
    }

    let Some(first) = created.ids.first().and_then(|id| store.get(*id)) else {
        return Ok(());
    };
    println!("{}", format!("  Created: {}", first.title).green());
    if created.ids.len() > 1 {
        println!("{}", format!("  {} occurrences", created.ids.len()).dimmed());
    }

    Ok(())
}
