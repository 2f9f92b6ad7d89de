//! Month grid and mini calendar.

use chrono::{Datelike, NaiveDate};

use crate::date_key::{MonthGrid, month_grid};
use crate::error::DaybookResult;
use crate::event::Event;
use crate::store::EventStore;

/// Events listed per day cell before the rest collapse into a counter.
pub const MAX_VISIBLE_PER_DAY: usize = 3;

#[derive(Debug, Clone)]
pub struct MonthCell<'a> {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    /// At most `MAX_VISIBLE_PER_DAY` events, in store order.
    pub events: Vec<&'a Event>,
    /// How many more events the day has beyond `events`.
    pub overflow: usize,
}

#[derive(Debug, Clone)]
pub struct MonthView<'a> {
    pub grid: MonthGrid,
    pub cells: Vec<MonthCell<'a>>,
}

/// Materialize the month containing `anchor`. Only cells of that month
/// carry events; leading and trailing days are empty.
pub fn month_view<'a>(
    store: &'a EventStore,
    anchor: NaiveDate,
    today: NaiveDate,
) -> DaybookResult<MonthView<'a>> {
    let grid = month_grid(anchor.year(), anchor.month())?;

    let cells = grid
        .cells
        .iter()
        .enumerate()
        .map(|(i, &date)| {
            let in_month = grid.in_month(i);
            let mut events = if in_month {
                store.find_by_date(date)
            } else {
                Vec::new()
            };
            let overflow = events.len().saturating_sub(MAX_VISIBLE_PER_DAY);
            events.truncate(MAX_VISIBLE_PER_DAY);

            MonthCell {
                date,
                in_month,
                is_today: date == today,
                events,
                overflow,
            }
        })
        .collect();

    Ok(MonthView { grid, cells })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniDay {
    pub date: NaiveDate,
    pub is_today: bool,
    pub has_events: bool,
}

/// Sidebar calendar: the days of the month containing `month_of`, each
/// flagged when it has a visible event.
#[derive(Debug, Clone)]
pub struct MiniCalendar {
    pub grid: MonthGrid,
    pub days: Vec<MiniDay>,
}

pub fn mini_calendar(
    store: &EventStore,
    month_of: NaiveDate,
    today: NaiveDate,
) -> DaybookResult<MiniCalendar> {
    let grid = month_grid(month_of.year(), month_of.month())?;
    let days = grid.cells[grid.leading..grid.leading + grid.days_in_month]
        .iter()
        .map(|&date| MiniDay {
            date,
            is_today: date == today,
            has_events: !store.find_by_date(date).is_empty(),
        })
        .collect();

    Ok(MiniCalendar { grid, days })
}
