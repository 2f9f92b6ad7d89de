use anyhow::Result;
use daybook_core::EventStore;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

pub fn run(store: &mut EventStore, force: bool) -> Result<()> {
    let total = store.events().len();

    if total == 0 {
        println!("{}", "Nothing to clear".dimmed());
        return Ok(());
    }

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete {} {}? This cannot be undone.",
                total,
                if total == 1 { "event" } else { "events" }
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    let removed = store.clear_events()?;
    println!("Cleared {} events", removed);

    Ok(())
}
