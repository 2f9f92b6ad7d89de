//! View materialization: turns the store into the data each calendar view
//! displays, leaving drawing to the host.

mod agenda;
mod month;
mod timeline;

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date_key::{add_months_overflowing, month_bounds, week_end, week_start};
use crate::error::{DaybookError, DaybookResult};
use crate::event::EventId;
use crate::store::EventStore;

pub use agenda::{Agenda, AgendaSection, agenda, search_results, sort_for_agenda};
pub use month::{MAX_VISIBLE_PER_DAY, MiniCalendar, MiniDay, MonthCell, MonthView, mini_calendar, month_view};
pub use timeline::{
    DEFAULT_DURATION_MINUTES, DayColumn, HOURS_PER_DAY, HourSlot, TimedBlock, day_column,
    hour_slots, week_columns,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Month,
    Week,
    Day,
    Agenda,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewKind::Month => "month",
            ViewKind::Week => "week",
            ViewKind::Day => "day",
            ViewKind::Agenda => "agenda",
        };
        f.write_str(name)
    }
}

impl FromStr for ViewKind {
    type Err = DaybookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" => Ok(ViewKind::Month),
            "week" => Ok(ViewKind::Week),
            "day" => Ok(ViewKind::Day),
            "agenda" => Ok(ViewKind::Agenda),
            other => Err(DaybookError::Validation(format!(
                "Unknown view '{}'. Expected month, week, day or agenda",
                other
            ))),
        }
    }
}

/// What the user is looking at. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Anchor date of the visible range.
    pub current_date: NaiveDate,
    pub current_view: ViewKind,
    /// Event open for viewing or editing, by id.
    pub selected_event: Option<EventId>,
}

impl ViewState {
    pub fn new(current_date: NaiveDate, current_view: ViewKind) -> Self {
        ViewState {
            current_date,
            current_view,
            selected_event: None,
        }
    }

    /// Step back one month, week or day depending on the view. Month and
    /// agenda land on the first of the month.
    pub fn previous(&mut self) {
        self.current_date = match self.current_view {
            ViewKind::Month | ViewKind::Agenda => first_of_previous_month(self.current_date),
            ViewKind::Week => self.current_date - Duration::days(7),
            ViewKind::Day => self.current_date - Duration::days(1),
        };
    }

    pub fn next(&mut self) {
        self.current_date = match self.current_view {
            ViewKind::Month | ViewKind::Agenda => {
                add_months_overflowing(month_bounds(self.current_date).0, 1)
            }
            ViewKind::Week => self.current_date + Duration::days(7),
            ViewKind::Day => self.current_date + Duration::days(1),
        };
    }

    pub fn go_to_today(&mut self, today: NaiveDate) {
        self.current_date = today;
    }

    pub fn switch_to(&mut self, view: ViewKind) {
        self.current_view = view;
    }

    /// Open a single day, as when a month cell is clicked.
    pub fn open_day(&mut self, date: NaiveDate) {
        self.current_date = date;
        self.current_view = ViewKind::Day;
    }

    /// First and last date the view shows events for.
    pub fn visible_range(&self) -> (NaiveDate, NaiveDate) {
        match self.current_view {
            ViewKind::Month | ViewKind::Agenda => month_bounds(self.current_date),
            ViewKind::Week => (week_start(self.current_date), week_end(self.current_date)),
            ViewKind::Day => (self.current_date, self.current_date),
        }
    }

    /// Heading for the view, e.g. "March 2024" or "Mar 17 - Mar 23, 2024".
    pub fn title(&self) -> String {
        let date = self.current_date;
        match self.current_view {
            ViewKind::Month | ViewKind::Agenda => date.format("%B %Y").to_string(),
            ViewKind::Week => format!(
                "{} - {}",
                week_start(date).format("%b %-d"),
                week_end(date).format("%b %-d, %Y")
            ),
            ViewKind::Day => date.format("%B %-d, %Y").to_string(),
        }
    }

    /// Build the data for the active view.
    pub fn materialize<'a>(
        &self,
        store: &'a EventStore,
        today: NaiveDate,
    ) -> DaybookResult<MaterializedView<'a>> {
        let date = self.current_date;
        Ok(match self.current_view {
            ViewKind::Month => MaterializedView::Month(month_view(store, date, today)?),
            ViewKind::Week => MaterializedView::Week(week_columns(store, date, today)),
            ViewKind::Day => MaterializedView::Day(day_column(store, date, today)),
            ViewKind::Agenda => MaterializedView::Agenda(agenda(store, date)),
        })
    }
}

fn first_of_previous_month(date: NaiveDate) -> NaiveDate {
    let first = month_bounds(date).0;
    let (year, month) = if first.month() == 1 {
        (first.year() - 1, 12)
    } else {
        (first.year(), first.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(first)
}

/// Output of the view layer, handed to whatever draws it.
#[derive(Debug, Clone)]
pub enum MaterializedView<'a> {
    Month(MonthView<'a>),
    Week(Vec<DayColumn<'a>>),
    Day(DayColumn<'a>),
    Agenda(Agenda<'a>),
}

/// Sidebar counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    /// Events in the month containing the anchor date.
    pub this_month: usize,
    /// Events dated today or later.
    pub upcoming: usize,
}

/// Count every stored event, hidden categories included.
pub fn statistics(store: &EventStore, anchor: NaiveDate, today: NaiveDate) -> Statistics {
    let (start, end) = month_bounds(anchor);
    let events = store.events();

    Statistics {
        total: events.len(),
        this_month: events
            .iter()
            .filter(|e| e.date >= start && e.date <= end)
            .count(),
        upcoming: events.iter().filter(|e| e.date >= today).count(),
    }
}
