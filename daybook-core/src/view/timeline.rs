//! Hour-grid layout for the week and day views.
//!
//! Positions are in minutes from midnight: one hour of grid is 60 units.

use chrono::{Duration, NaiveDate};

use crate::date_key::{format_hour, week_start};
use crate::event::Event;
use crate::store::EventStore;

pub const HOURS_PER_DAY: u32 = 24;

/// Height given to a timed event that has no end time.
pub const DEFAULT_DURATION_MINUTES: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourSlot {
    pub hour: u32,
    pub label: String,
}

/// A timed event placed on the hour grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedBlock<'a> {
    pub event: &'a Event,
    /// Offset of the start from midnight.
    pub top: f64,
    /// End minus start. Zero or negative when the end time is not after
    /// the start time; such input is passed through untouched.
    pub height: f64,
}

impl<'a> TimedBlock<'a> {
    /// Place `event` on the grid, or `None` for all-day and untimed events.
    pub fn layout(event: &'a Event) -> Option<Self> {
        if !event.is_timed() {
            return None;
        }
        let start = event.start_time?.minutes_from_midnight() as f64;
        let height = match event.end_time {
            Some(end) => end.minutes_from_midnight() as f64 - start,
            None => DEFAULT_DURATION_MINUTES,
        };

        Some(TimedBlock {
            event,
            top: start,
            height,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DayColumn<'a> {
    pub date: NaiveDate,
    pub is_today: bool,
    pub slots: Vec<HourSlot>,
    /// Timed events in store order. Overlapping events are not spread out.
    pub timed: Vec<TimedBlock<'a>>,
    /// All-day events and events without a start time.
    pub untimed: Vec<&'a Event>,
}

pub fn hour_slots() -> Vec<HourSlot> {
    (0..HOURS_PER_DAY)
        .map(|hour| HourSlot {
            hour,
            label: format_hour(hour),
        })
        .collect()
}

pub fn day_column<'a>(store: &'a EventStore, date: NaiveDate, today: NaiveDate) -> DayColumn<'a> {
    let mut timed = Vec::new();
    let mut untimed = Vec::new();

    for event in store.find_by_date(date) {
        match TimedBlock::layout(event) {
            Some(block) => timed.push(block),
            None => untimed.push(event),
        }
    }

    DayColumn {
        date,
        is_today: date == today,
        slots: hour_slots(),
        timed,
        untimed,
    }
}

/// Seven columns, Sunday through Saturday, for the week containing `anchor`.
pub fn week_columns<'a>(
    store: &'a EventStore,
    anchor: NaiveDate,
    today: NaiveDate,
) -> Vec<DayColumn<'a>> {
    let start = week_start(anchor);
    (0..7)
        .map(|i| day_column(store, start + Duration::days(i), today))
        .collect()
}
