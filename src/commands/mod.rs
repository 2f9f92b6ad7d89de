pub mod add;
pub mod category;
pub mod clear;
pub mod delete;
pub mod duplicate;
pub mod edit;
pub mod export;
pub mod import;
pub mod remind;
pub mod search;
pub mod show;
pub mod stats;
pub mod theme;
pub mod view;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::Args;
use daybook_core::{CategoryId, EventDraft, EventStore, Recurrence, Reminder, TimeOfDay};

use crate::parse_date_arg;

/// Event fields shared by `add` and `edit`. An empty string clears an
/// optional text field.
#[derive(Args, Debug, Default)]
pub struct EventFields {
    /// Date (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,

    /// Fill start and end from an hour slot, e.g. 14 for 14:00 - 15:00
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    pub hour: Option<u32>,

    /// Start time (HH:MM)
    #[arg(short, long)]
    pub start: Option<TimeOfDay>,

    /// End time (HH:MM)
    #[arg(short, long)]
    pub end: Option<TimeOfDay>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub all_day: Option<bool>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    /// Comma-separated names
    #[arg(long)]
    pub attendees: Option<String>,

    /// Category id (see `daybook category list`)
    #[arg(short, long)]
    pub category: Option<u64>,

    /// Hex color overriding the category color
    #[arg(long)]
    pub color: Option<String>,

    /// none, daily, weekly, monthly or yearly
    #[arg(short, long)]
    pub repeat: Option<Recurrence>,

    /// Last date a repeating event may fall on
    #[arg(long, value_parser = parse_date_arg)]
    pub until: Option<NaiveDate>,

    /// Minutes before the start, or "none"
    #[arg(long)]
    pub remind: Option<Reminder>,
}

impl EventFields {
    /// Overwrite the fields of `draft` that were given on the command line.
    pub fn apply(self, draft: &mut EventDraft) {
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(hour) = self.hour {
            let slot = EventDraft::at_hour(String::new(), draft.date, hour);
            draft.start_time = slot.start_time;
            draft.end_time = slot.end_time;
        }
        if self.start.is_some() {
            draft.start_time = self.start;
        }
        if self.end.is_some() {
            draft.end_time = self.end;
        }
        if let Some(all_day) = self.all_day {
            draft.all_day = all_day;
        }
        set_text(&mut draft.description, self.description);
        set_text(&mut draft.location, self.location);
        set_text(&mut draft.url, self.url);
        set_text(&mut draft.attendees, self.attendees);
        set_text(&mut draft.color, self.color);
        if let Some(id) = self.category {
            draft.category_id = Some(CategoryId(id));
        }
        if let Some(recurrence) = self.repeat {
            draft.recurrence = recurrence;
        }
        if self.until.is_some() {
            draft.recurrence_end = self.until;
        }
        if let Some(reminder) = self.remind {
            draft.reminder = reminder;
        }
    }
}

fn set_text(field: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *field = if value.trim().is_empty() {
            None
        } else {
            Some(value)
        };
    }
}

/// Fail early on a category id the store doesn't know.
pub fn require_category(store: &EventStore, draft: &EventDraft) -> Result<()> {
    if let Some(id) = draft.category_id
        && store.category(id).is_none()
    {
        let available: Vec<String> = store
            .categories()
            .iter()
            .map(|c| format!("{} ({})", c.name, c.id))
            .collect();
        bail!(
            "Category {} not found. Available: {}",
            id,
            available.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> EventDraft {
        let mut draft = EventDraft::new("Lunch", NaiveDate::from_ymd_opt(2024, 4, 2).unwrap());
        draft.location = Some("Cafe".into());
        draft
    }

    #[test]
    fn hour_slot_fills_a_one_hour_block() {
        let mut d = draft();
        EventFields {
            hour: Some(14),
            ..Default::default()
        }
        .apply(&mut d);
        assert_eq!(d.start_time, TimeOfDay::new(14, 0));
        assert_eq!(d.end_time, TimeOfDay::new(15, 0));
    }

    #[test]
    fn last_hour_slot_has_no_end() {
        let mut d = draft();
        EventFields {
            hour: Some(23),
            ..Default::default()
        }
        .apply(&mut d);
        assert_eq!(d.start_time, TimeOfDay::new(23, 0));
        assert_eq!(d.end_time, None);
    }

    #[test]
    fn explicit_times_win_over_hour_slot() {
        let mut d = draft();
        EventFields {
            hour: Some(9),
            end: TimeOfDay::new(9, 30),
            ..Default::default()
        }
        .apply(&mut d);
        assert_eq!(d.start_time, TimeOfDay::new(9, 0));
        assert_eq!(d.end_time, TimeOfDay::new(9, 30));
    }

    #[test]
    fn empty_text_clears_and_missing_text_keeps() {
        let mut d = draft();
        EventFields {
            location: Some(String::new()),
            description: Some("Bring receipts".into()),
            ..Default::default()
        }
        .apply(&mut d);
        assert_eq!(d.location, None);
        assert_eq!(d.description.as_deref(), Some("Bring receipts"));
        assert_eq!(d.title, "Lunch");
    }

    #[test]
    fn unknown_category_is_rejected() {
        let store = EventStore::in_memory();
        let mut d = draft();
        d.category_id = Some(CategoryId(999));
        assert!(require_category(&store, &d).is_err());
        d.category_id = Some(CategoryId(1));
        assert!(require_category(&store, &d).is_ok());
    }
}
