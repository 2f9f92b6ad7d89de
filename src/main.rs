mod commands;
mod notifier;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use daybook_core::date_key::parse_date_key;
use daybook_core::view::ViewKind;
use daybook_core::{DaybookConfig, Theme};

use crate::commands::EventFields;

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "A personal calendar in your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an event (prompts for the title if omitted)
    Add {
        title: Option<String>,

        #[command(flatten)]
        fields: EventFields,
    },
    /// Change fields of an existing event
    Edit {
        id: u64,

        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: EventFields,
    },
    /// Show every field of an event
    Show { id: u64 },
    Delete {
        id: u64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    Duplicate { id: u64 },
    /// Delete every event (categories are kept)
    Clear {
        #[arg(short, long)]
        force: bool,
    },
    /// Show the calendar (month, week, day or agenda)
    View {
        kind: Option<ViewKind>,

        /// Anchor date (YYYY-MM-DD), defaults to today
        #[arg(short, long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,

        /// Step forward this many months, weeks or days
        #[arg(long, default_value_t = 0)]
        next: u32,

        /// Step back this many months, weeks or days
        #[arg(long, default_value_t = 0)]
        prev: u32,
    },
    /// Find events by title, description or location
    Search { query: String },
    /// Event counts, mini calendar and categories
    Stats,
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
    /// Set the theme, or toggle it when none is given
    Theme { theme: Option<Theme> },
    /// Write all events and categories to a JSON file
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Append events and new categories from an export file
    Import { file: PathBuf },
    /// Send desktop notifications for due reminders until Ctrl-C
    Remind,
}

#[derive(Subcommand)]
enum CategoryCommand {
    List,
    Add {
        name: String,

        #[arg(long, default_value = daybook_core::DEFAULT_EVENT_COLOR)]
        color: String,
    },
    /// Show or hide a category's events in the views
    Toggle { id: u64 },
}

pub(crate) fn parse_date_arg(s: &str) -> Result<NaiveDate, daybook_core::DaybookError> {
    parse_date_key(s)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DaybookConfig::load()?;
    let mut store = config.open_store()?;
    tracing::debug!(data_dir = %config.data_path().display(), "opened store");
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Add { title, fields } => commands::add::run(&mut store, title, fields, today),
        Commands::Edit { id, title, fields } => commands::edit::run(&mut store, id, title, fields),
        Commands::Show { id } => commands::show::run(&store, id),
        Commands::Delete { id, force } => commands::delete::run(&mut store, id, force),
        Commands::Duplicate { id } => commands::duplicate::run(&mut store, id),
        Commands::Clear { force } => commands::clear::run(&mut store, force),
        Commands::View {
            kind,
            date,
            next,
            prev,
        } => {
            let kind = kind.unwrap_or(config.default_view);
            commands::view::run(&store, kind, date.unwrap_or(today), next, prev, today)
        }
        Commands::Search { query } => commands::search::run(&store, &query),
        Commands::Stats => commands::stats::run(&store, today),
        Commands::Category { command } => match command {
            CategoryCommand::List => commands::category::list(&store),
            CategoryCommand::Add { name, color } => commands::category::add(&mut store, name, color),
            CategoryCommand::Toggle { id } => commands::category::toggle(&mut store, id),
        },
        Commands::Theme { theme } => commands::theme::run(&mut store, theme),
        Commands::Export { output } => commands::export::run(&store, output, today),
        Commands::Import { file } => commands::import::run(&mut store, &file),
        Commands::Remind => commands::remind::run(store, config.reminder_interval()).await,
    }
}
