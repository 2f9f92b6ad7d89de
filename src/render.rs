//! Terminal rendering for daybook types.
//!
//! `Render` covers values that draw on their own. Views need the store to
//! resolve event colors, so they implement `ViewRender` instead.

use chrono::Datelike;
use daybook_core::date_key::to_date_key;
use daybook_core::view::{
    Agenda, DayColumn, MAX_VISIBLE_PER_DAY, MaterializedView, MiniCalendar, MonthView, Statistics,
    TimedBlock,
};
use daybook_core::{Category, Event, EventStore};
use owo_colors::OwoColorize;

/// Width of one month grid cell, in columns.
const CELL_WIDTH: usize = 12;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Rendering that needs the store, e.g. for category colors.
pub trait ViewRender {
    fn render(&self, store: &EventStore) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let time = self.time_label();
        let id = format!("[{}]", self.id);
        if time.is_empty() {
            format!("{} {}", self.title, id.dimmed())
        } else {
            format!("{} {} {}", self.title, time.dimmed(), id.dimmed())
        }
    }
}

impl Render for Statistics {
    fn render(&self) -> String {
        [
            format!("{} {}", "Total events:".dimmed(), self.total.bold()),
            format!("{} {}", "This month:  ".dimmed(), self.this_month.bold()),
            format!("{} {}", "Upcoming:    ".dimmed(), self.upcoming.bold()),
        ]
        .join("\n")
    }
}

impl Render for MiniCalendar {
    fn render(&self) -> String {
        let mut lines = vec![
            format!("{:^20}", self.grid.cells[self.grid.leading].format("%B %Y"))
                .bold()
                .to_string(),
            "Su Mo Tu We Th Fr Sa".dimmed().to_string(),
        ];

        let mut row: Vec<String> = vec!["  ".to_string(); self.grid.leading];
        for day in &self.days {
            let label = format!("{:>2}", day.date.day());
            let label = if day.is_today {
                label.reversed().to_string()
            } else if day.has_events {
                label.underline().bold().to_string()
            } else {
                label
            };
            row.push(label);
            if row.len() == 7 {
                lines.push(row.join(" "));
                row.clear();
            }
        }
        if !row.is_empty() {
            lines.push(row.join(" "));
        }

        lines.join("\n")
    }
}

impl ViewRender for MaterializedView<'_> {
    fn render(&self, store: &EventStore) -> String {
        match self {
            MaterializedView::Month(month) => month.render(store),
            MaterializedView::Week(columns) => columns
                .iter()
                .map(|c| render_column(c, store, false))
                .collect::<Vec<_>>()
                .join("\n\n"),
            MaterializedView::Day(column) => render_column(column, store, true),
            MaterializedView::Agenda(agenda) => agenda.render(store),
        }
    }
}

impl ViewRender for MonthView<'_> {
    fn render(&self, store: &EventStore) -> String {
        let mut lines = vec![
            WEEKDAYS
                .iter()
                .map(|d| format!("{:<width$}", d, width = CELL_WIDTH))
                .collect::<String>()
                .dimmed()
                .to_string(),
        ];

        for week in self.cells.chunks(7) {
            let days: String = week
                .iter()
                .map(|cell| {
                    let label = format!("{:>2}", cell.date.day());
                    let label = if cell.is_today {
                        label.reversed().to_string()
                    } else if !cell.in_month {
                        label.dimmed().to_string()
                    } else {
                        label.bold().to_string()
                    };
                    format!("{}{}", label, " ".repeat(CELL_WIDTH - 2))
                })
                .collect();
            lines.push(days);

            for row in 0..MAX_VISIBLE_PER_DAY {
                if week.iter().all(|cell| cell.events.len() <= row) {
                    break;
                }
                let titles: String = week
                    .iter()
                    .map(|cell| match cell.events.get(row) {
                        Some(event) => {
                            let text = pad(&event.title, CELL_WIDTH);
                            paint(&text, store.color_of(event))
                        }
                        None => " ".repeat(CELL_WIDTH),
                    })
                    .collect();
                lines.push(titles);
            }

            if week.iter().any(|cell| cell.overflow > 0) {
                let more: String = week
                    .iter()
                    .map(|cell| match cell.overflow {
                        0 => " ".repeat(CELL_WIDTH),
                        n => pad(&format!("+{} more", n), CELL_WIDTH)
                            .dimmed()
                            .to_string(),
                    })
                    .collect();
                lines.push(more);
            }
        }

        lines.join("\n")
    }
}

impl ViewRender for Agenda<'_> {
    fn render(&self, store: &EventStore) -> String {
        if self.is_empty() {
            return "No events this month".dimmed().to_string();
        }

        self.sections
            .iter()
            .map(|section| {
                let mut lines = vec![section.date.format("%A, %B %-d, %Y").bold().to_string()];
                lines.extend(section.events.iter().map(|e| agenda_line(e, store)));
                lines.join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn agenda_line(event: &Event, store: &EventStore) -> String {
    let mut line = format!(
        "  {:<13} {}",
        event.time_label(),
        paint(&event.title, store.color_of(event))
    );
    if let Some(location) = &event.location {
        line.push_str(&format!(" {}", format!("@ {}", location).dimmed()));
    }
    line.push_str(&format!(" {}", format!("[{}]", event.id).dimmed()));
    line
}

/// One day. `full_grid` lists every hour slot, otherwise only the events.
fn render_column(column: &DayColumn, store: &EventStore, full_grid: bool) -> String {
    let heading = column.date.format("%A, %B %-d").to_string();
    let mut lines = vec![if column.is_today {
        format!("{} {}", heading.bold(), "(today)".green())
    } else {
        heading.bold().to_string()
    }];

    for event in &column.untimed {
        lines.push(format!(
            "  {:>8}  {} {}",
            "All Day".dimmed(),
            paint(&event.title, store.color_of(event)),
            format!("[{}]", event.id).dimmed()
        ));
    }

    if full_grid {
        for slot in &column.slots {
            let blocks: Vec<&TimedBlock> = column
                .timed
                .iter()
                .filter(|b| (b.top / 60.0).floor() as u32 == slot.hour)
                .collect();
            if blocks.is_empty() {
                lines.push(format!("  {:>8}", slot.label).dimmed().to_string());
            }
            for block in blocks {
                lines.push(format!("  {:>8}  {}", slot.label, timed_line(block, store)));
            }
        }
    } else {
        for block in &column.timed {
            let start = block.event.start_time.map(|t| t.to_string()).unwrap_or_default();
            lines.push(format!("  {:>8}  {}", start, timed_line(block, store)));
        }
    }

    if column.untimed.is_empty() && column.timed.is_empty() && !full_grid {
        lines.push(format!("  {}", "No events".dimmed()));
    }

    lines.join("\n")
}

fn timed_line(block: &TimedBlock, store: &EventStore) -> String {
    let event = block.event;
    let span = format!("{} ({} min)", event.time_label(), block.height as i64);
    format!(
        "{} {} {}",
        paint(&event.title, store.color_of(event)),
        span.dimmed(),
        format!("[{}]", event.id).dimmed()
    )
}

/// Matches for a search, one line each.
pub fn render_search(results: &[&Event], store: &EventStore) -> String {
    if results.is_empty() {
        return "No events found".dimmed().to_string();
    }
    results
        .iter()
        .map(|e| {
            format!(
                "{}  {:<13} {} {}",
                to_date_key(e.date).dimmed(),
                e.time_label(),
                paint(&e.title, store.color_of(e)),
                format!("[{}]", e.id).dimmed()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every field of an event, for `daybook show`.
pub fn render_details(event: &Event, store: &EventStore) -> String {
    let field = |name: &str, value: String| format!("{:>12} {}", format!("{}:", name).dimmed(), value);
    let or_none = |value: &Option<String>| value.clone().unwrap_or_else(|| "(none)".to_string());

    let mut lines = vec![
        paint(&event.title, store.color_of(event)).bold().to_string(),
        field("id", event.id.to_string()),
        field("date", event.date.format("%A, %B %-d, %Y").to_string()),
    ];

    let time = event.time_label();
    lines.push(field("time", if time.is_empty() { "(none)".into() } else { time }));

    let category = event
        .category_id
        .and_then(|id| store.category(id))
        .map(|c| c.name.clone());
    lines.push(field("category", or_none(&category)));
    lines.push(field("color", store.color_of(event).to_string()));
    lines.push(field("location", or_none(&event.location)));
    lines.push(field("url", or_none(&event.url)));

    let attendees = match event.attendee_count() {
        0 => "(none)".to_string(),
        n => format!("{} ({})", event.attendees.as_deref().unwrap_or_default(), n),
    };
    lines.push(field("attendees", attendees));
    lines.push(field("description", or_none(&event.description)));

    let repeat = match event.recurrence_end {
        Some(end) if event.recurrence.is_recurring() => {
            format!("{} until {}", event.recurrence, to_date_key(end))
        }
        _ => event.recurrence.to_string(),
    };
    lines.push(field("repeat", repeat));

    let mut reminder = event.reminder.label();
    if event.notified {
        reminder.push_str(&format!(" {}", "(sent)".dimmed()));
    }
    lines.push(field("reminder", reminder));
    lines.push(field(
        "created",
        event.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    ));

    lines.join("\n")
}

/// Categories with their event counts, for `daybook category list`.
pub fn render_categories(counts: &[(&Category, usize)]) -> String {
    counts
        .iter()
        .map(|(category, count)| {
            let line = format!(
                "{} {} {} {}",
                format!("[{}]", category.id).dimmed(),
                paint("●", &category.color),
                category.name,
                format!("({})", count).dimmed()
            );
            if category.visible {
                line
            } else {
                format!("{} {}", line, "hidden".yellow())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Color `text` with a `#rrggbb` hex color, or leave it plain.
fn paint(text: &str, hex: &str) -> String {
    match hex_rgb(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b).to_string(),
        None => text.to_string(),
    }
}

fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| -> Option<u8> { u8::from_str_radix(hex.get(i..i + 2)?, 16).ok() };
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Truncate to `width - 1` characters and pad to `width`.
fn pad(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width - 1).collect();
    format!("{:<width$}", truncated)
}
