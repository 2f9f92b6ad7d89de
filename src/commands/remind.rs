use std::time::Duration;

use anyhow::{Context, Result};
use daybook_core::EventStore;
use daybook_core::reminder::reminder_loop;
use owo_colors::OwoColorize;

use crate::notifier::DesktopNotifier;

/// Scan for due reminders every `interval` until Ctrl-C.
pub async fn run(mut store: EventStore, interval: Duration) -> Result<()> {
    let (handle, reminders) = reminder_loop(interval);
    let notifier = DesktopNotifier;

    println!(
        "{}",
        format!(
            "Watching {} events for reminders (Ctrl-C to stop)",
            store.events().len()
        )
        .dimmed()
    );

    let (fired, signal) = tokio::join!(
        reminders.run(&mut store, &notifier, || {
            chrono::Local::now().naive_local()
        }),
        async {
            let result = tokio::signal::ctrl_c().await;
            handle.stop();
            result
        }
    );
    signal.context("Could not listen for Ctrl-C")?;

    println!("\nSent {} {}", fired, if fired == 1 { "reminder" } else { "reminders" });
    Ok(())
}
