//! Calendar arithmetic on naive local dates.
//!
//! All dates are timezone-naive: a date key such as `2024-03-20` names a
//! calendar day and is interpreted as local midnight wherever a point in
//! time is needed.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{DaybookError, DaybookResult};

/// Format of a canonical date key.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Number of cells in a month grid (6 weeks of 7 days).
pub const MONTH_GRID_CELLS: usize = 42;

/// Format a date as its canonical `YYYY-MM-DD` key.
pub fn to_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a canonical `YYYY-MM-DD` key.
pub fn parse_date_key(key: &str) -> DaybookResult<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT).map_err(|_| {
        DaybookError::Validation(format!("Invalid date '{}'. Expected YYYY-MM-DD", key))
    })
}

/// The point in time a date key stands for: local midnight of that day.
pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// The Saturday closing the week that contains `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Duration::days(6)
}

/// Equal year, month and day, whatever the time of day.
pub fn same_day<A: Datelike, B: Datelike>(a: &A, b: &B) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// Number of days in `month` (1-12) of `year`.
pub fn days_in_month(year: i32, month: u32) -> DaybookResult<u32> {
    let first = first_of_month(year, month)?;
    let next = first_of_month(year + month as i32 / 12, month % 12 + 1)?;
    Ok((next - first).num_days() as u32)
}

/// First and last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = add_months_overflowing(first, 1) - Duration::days(1);
    (first, last)
}

fn first_of_month(year: i32, month: u32) -> DaybookResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| DaybookError::Validation(format!("Invalid month {}-{}", year, month)))
}

/// Add calendar months, keeping the day of month.
///
/// A day that does not exist in the target month rolls over into the
/// following month (January 31 + 1 month = March 2 or 3). The rollover is
/// applied to the date as it stands, so repeated stepping drifts.
pub fn add_months_overflowing(date: NaiveDate, months: u32) -> NaiveDate {
    let total = date.month0() + months;
    let year = date.year() + (total / 12) as i32;
    let month = total % 12 + 1;
    roll_over(year, month, date.day()).unwrap_or(date)
}

/// Add calendar years, keeping month and day. February 29 rolls over into
/// March 1 in a non-leap target year.
pub fn add_years_overflowing(date: NaiveDate, years: i32) -> NaiveDate {
    roll_over(date.year() + years, date.month(), date.day()).unwrap_or(date)
}

fn roll_over(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_signed(Duration::days(day as i64 - 1))
}

/// The 6x7 grid of dates shown by a month view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Days borrowed from the previous month before the 1st.
    pub leading: usize,
    pub days_in_month: usize,
    pub cells: Vec<NaiveDate>,
}

impl MonthGrid {
    /// Days borrowed from the next month after the last day.
    pub fn trailing(&self) -> usize {
        MONTH_GRID_CELLS - self.leading - self.days_in_month
    }

    /// Whether the cell at `index` belongs to the grid's own month.
    pub fn in_month(&self, index: usize) -> bool {
        index >= self.leading && index < self.leading + self.days_in_month
    }
}

/// Build the month grid for `month` (1-12) of `year`, starting on the
/// Sunday on or before the 1st.
pub fn month_grid(year: i32, month: u32) -> DaybookResult<MonthGrid> {
    let first = first_of_month(year, month)?;
    let days = days_in_month(year, month)? as usize;
    let leading = first.weekday().num_days_from_sunday() as usize;
    let grid_start = first - Duration::days(leading as i64);

    let cells = (0..MONTH_GRID_CELLS)
        .map(|i| grid_start + Duration::days(i as i64))
        .collect();

    Ok(MonthGrid {
        year,
        month,
        leading,
        days_in_month: days,
        cells,
    })
}

/// 12-hour clock label for an hour of the day: 0 -> "12 AM", 13 -> "1 PM".
pub fn format_hour(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        1..=11 => format!("{} AM", hour),
        12 => "12 PM".to_string(),
        _ => format!("{} PM", hour - 12),
    }
}
