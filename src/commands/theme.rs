use anyhow::Result;
use daybook_core::{EventStore, Theme};

/// Set the theme, or flip it when none is given.
pub fn run(store: &mut EventStore, theme: Option<Theme>) -> Result<()> {
    let theme = match theme {
        Some(theme) => {
            store.set_theme(theme)?;
            theme
        }
        None => store.toggle_theme()?,
    };
    println!("Theme: {}", theme);
    Ok(())
}
