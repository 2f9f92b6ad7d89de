//! Event and category records.
//!
//! Field names on the wire are camelCase (`allDay`, `startTime`,
//! `categoryId`, ...) so snapshots and export files stay readable by other
//! tools working on the same format. Optional text fields accept empty
//! strings as absent, which is how form-submitted records store them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::date_key::{add_years_overflowing, midnight};
use crate::error::{DaybookError, DaybookResult};

/// Color used when neither the event nor its category has one.
pub const DEFAULT_EVENT_COLOR: &str = "#4285f4";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A wall-clock time of day in 24-hour `HH:MM` form.
///
/// Ordering matches the lexicographic order of the zero-padded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(TimeOfDay { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn minutes_from_midnight(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = DaybookError;

    /// Parses `HH:MM`; a trailing `:SS` is accepted and dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DaybookError::Validation(format!("Invalid time '{}'. Expected HH:MM", s));

        let mut parts = s.trim().split(':');
        let hour = parts.next().and_then(|h| h.parse().ok()).ok_or_else(invalid)?;
        let minute = parts.next().and_then(|m| m.parse().ok()).ok_or_else(invalid)?;
        if let Some(seconds) = parts.next() {
            seconds.parse::<u32>().map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        TimeOfDay::new(hour, minute).ok_or_else(invalid)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    pub fn is_recurring(&self) -> bool {
        *self != Recurrence::None
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Recurrence::None => "None",
            Recurrence::Daily => "Daily",
            Recurrence::Weekly => "Weekly",
            Recurrence::Monthly => "Monthly",
            Recurrence::Yearly => "Yearly",
        };
        f.write_str(label)
    }
}

impl FromStr for Recurrence {
    type Err = DaybookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Recurrence::None),
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            "yearly" => Ok(Recurrence::Yearly),
            other => Err(DaybookError::Validation(format!(
                "Unknown recurrence '{}'. Expected none, daily, weekly, monthly or yearly",
                other
            ))),
        }
    }
}

/// When to remind about an event. Stored as `"none"` or a minutes string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reminder {
    #[default]
    None,
    MinutesBefore(u32),
}

impl Reminder {
    pub fn minutes(&self) -> Option<u32> {
        match self {
            Reminder::None => None,
            Reminder::MinutesBefore(m) => Some(*m),
        }
    }

    /// Human-readable description, e.g. "10 minutes before".
    pub fn label(&self) -> String {
        match self {
            Reminder::None => "None".to_string(),
            Reminder::MinutesBefore(0) => "At time of event".to_string(),
            Reminder::MinutesBefore(60) => "1 hour before".to_string(),
            Reminder::MinutesBefore(1440) => "1 day before".to_string(),
            Reminder::MinutesBefore(m) => format!("{} minutes before", m),
        }
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reminder::None => f.write_str("none"),
            Reminder::MinutesBefore(m) => write!(f, "{}", m),
        }
    }
}

impl FromStr for Reminder {
    type Err = DaybookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(Reminder::None),
            minutes => minutes.parse().map(Reminder::MinutesBefore).map_err(|_| {
                DaybookError::Validation(format!(
                    "Invalid reminder '{}'. Expected none or minutes before the event",
                    s
                ))
            }),
        }
    }
}

impl Serialize for Reminder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Reminder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ReminderVisitor;

        impl Visitor<'_> for ReminderVisitor {
            type Value = Reminder;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("\"none\" or a number of minutes")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Reminder, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Reminder, E> {
                u32::try_from(v)
                    .map(Reminder::MinutesBefore)
                    .map_err(|_| E::custom("reminder minutes out of range"))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Reminder, E> {
                Ok(Reminder::None)
            }
        }

        deserializer.deserialize_any(ReminderVisitor)
    }
}

/// (De)serializes `Option<T>` through its text form, reading blank strings
/// as `None`.
mod blank_as_none {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Display,
    {
        match value {
            Some(v) => serializer.collect_str(v),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some).map_err(de::Error::custom),
        }
    }
}

/// One concrete calendar occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default, with = "blank_as_none")]
    pub start_time: Option<TimeOfDay>,
    #[serde(default, with = "blank_as_none")]
    pub end_time: Option<TimeOfDay>,
    #[serde(default, with = "blank_as_none")]
    pub description: Option<String>,
    #[serde(default, with = "blank_as_none")]
    pub location: Option<String>,
    #[serde(default, with = "blank_as_none")]
    pub url: Option<String>,
    /// Comma-separated free text.
    #[serde(default, with = "blank_as_none")]
    pub attendees: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default, with = "blank_as_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default, with = "blank_as_none")]
    pub recurrence_end: Option<NaiveDate>,
    #[serde(default)]
    pub reminder: Reminder,
    #[serde(default)]
    pub notified: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Build a stored event from user-entered fields.
    pub fn from_draft(id: EventId, draft: EventDraft, created_at: DateTime<Utc>) -> Self {
        Event {
            id,
            title: draft.title,
            date: draft.date,
            all_day: draft.all_day,
            start_time: draft.start_time,
            end_time: draft.end_time,
            description: draft.description,
            location: draft.location,
            url: draft.url,
            attendees: draft.attendees,
            category_id: draft.category_id,
            color: draft.color,
            recurrence: draft.recurrence,
            recurrence_end: draft.recurrence_end,
            reminder: draft.reminder,
            notified: false,
            created_at,
        }
    }

    /// The editable fields of this event, e.g. to prefill an edit form.
    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.clone(),
            date: self.date,
            all_day: self.all_day,
            start_time: self.start_time,
            end_time: self.end_time,
            description: self.description.clone(),
            location: self.location.clone(),
            url: self.url.clone(),
            attendees: self.attendees.clone(),
            category_id: self.category_id,
            color: self.color.clone(),
            recurrence: self.recurrence,
            recurrence_end: self.recurrence_end,
            reminder: self.reminder,
        }
    }

    /// Placed on the hour grid rather than listed as all-day.
    pub fn is_timed(&self) -> bool {
        !self.all_day && self.start_time.is_some()
    }

    /// Local start: midnight of `date`, advanced by `start_time` for timed events.
    pub fn starts_at(&self) -> NaiveDateTime {
        match self.start_time {
            Some(start) if !self.all_day => self.date.and_time(start.to_naive_time()),
            _ => midnight(self.date),
        }
    }

    /// Last date a recurring series may produce: `recurrence_end`, or one
    /// year after `date` when none is set.
    pub fn recurrence_bound(&self) -> NaiveDate {
        self.recurrence_end
            .unwrap_or_else(|| add_years_overflowing(self.date, 1))
    }

    pub fn attendee_count(&self) -> usize {
        self.attendees
            .as_deref()
            .map(|a| a.split(',').count())
            .unwrap_or(0)
    }

    /// Case-insensitive substring match on title, description or location.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        let hit = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(needle));
        hit(Some(self.title.as_str())) || hit(self.description.as_deref()) || hit(self.location.as_deref())
    }

    /// Display range, e.g. "All Day", "09:00 - 10:00" or "09:00".
    pub fn time_label(&self) -> String {
        if self.all_day {
            return "All Day".to_string();
        }
        match (self.start_time, self.end_time) {
            (Some(s), Some(e)) => format!("{} - {}", s, e),
            (Some(s), None) => s.to_string(),
            (None, Some(e)) => format!("- {}", e),
            (None, None) => String::new(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// The fields a user fills in when creating or editing an event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub date: NaiveDate,
    pub all_day: bool,
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub attendees: Option<String>,
    pub category_id: Option<CategoryId>,
    pub color: Option<String>,
    pub recurrence: Recurrence,
    pub recurrence_end: Option<NaiveDate>,
    pub reminder: Reminder,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        EventDraft {
            title: title.into(),
            date,
            all_day: false,
            start_time: None,
            end_time: None,
            description: None,
            location: None,
            url: None,
            attendees: None,
            category_id: None,
            color: None,
            recurrence: Recurrence::None,
            recurrence_end: None,
            reminder: Reminder::None,
        }
    }

    /// A draft for a clicked hour slot: starts on the hour and lasts one hour.
    pub fn at_hour(title: impl Into<String>, date: NaiveDate, hour: u32) -> Self {
        let mut draft = EventDraft::new(title, date);
        draft.start_time = TimeOfDay::new(hour, 0);
        draft.end_time = TimeOfDay::new(hour + 1, 0);
        draft
    }

    pub fn validate(&self) -> DaybookResult<()> {
        if self.title.trim().is_empty() {
            return Err(DaybookError::Validation("Title is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Category {
            id,
            name: name.into(),
            color: color.into(),
            visible: true,
        }
    }
}

/// Categories present before anything has been saved.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new(CategoryId(1), "Work", "#4285f4"),
        Category::new(CategoryId(2), "Personal", "#ea4335"),
        Category::new(CategoryId(3), "Meeting", "#34a853"),
        Category::new(CategoryId(4), "Holiday", "#fbbc04"),
    ]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = DaybookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(DaybookError::Validation(format!(
                "Unknown theme '{}'. Expected light or dark",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event() -> Event {
        let mut draft = EventDraft::new(
            "Team Lunch",
            NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
        );
        draft.start_time = TimeOfDay::new(12, 30);
        draft.location = Some("Cafeteria".into());
        Event::from_draft(
            EventId(42),
            draft,
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn time_of_day_parses_and_formats() {
        let t: TimeOfDay = "09:05".parse().unwrap();
        assert_eq!(t.hour(), 9);
        assert_eq!(t.minute(), 5);
        assert_eq!(t.to_string(), "09:05");
        assert_eq!("7:30".parse::<TimeOfDay>().unwrap().to_string(), "07:30");
        assert_eq!("14:15:00".parse::<TimeOfDay>().unwrap().minutes_from_midnight(), 855);
    }

    #[test]
    fn time_of_day_rejects_out_of_range() {
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("12:60".parse::<TimeOfDay>().is_err());
        assert!("noon".parse::<TimeOfDay>().is_err());
        assert!("1:2:3:4".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn time_of_day_orders_like_its_text() {
        let a: TimeOfDay = "09:30".parse().unwrap();
        let b: TimeOfDay = "10:00".parse().unwrap();
        assert!(a < b);
        assert_eq!(a.cmp(&b), a.to_string().cmp(&b.to_string()));
    }

    #[test]
    fn reminder_labels() {
        assert_eq!(Reminder::MinutesBefore(0).label(), "At time of event");
        assert_eq!(Reminder::MinutesBefore(10).label(), "10 minutes before");
        assert_eq!(Reminder::MinutesBefore(60).label(), "1 hour before");
        assert_eq!(Reminder::MinutesBefore(1440).label(), "1 day before");
        assert_eq!(Reminder::MinutesBefore(120).label(), "120 minutes before");
    }

    #[test]
    fn event_json_uses_camel_case_and_string_reminder() {
        let mut event = sample_event();
        event.reminder = Reminder::MinutesBefore(30);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["date"], "2024-03-20");
        assert_eq!(json["startTime"], "12:30");
        assert_eq!(json["allDay"], false);
        assert_eq!(json["reminder"], "30");
        assert_eq!(json["recurrence"], "none");
        assert!(json["endTime"].is_null());
    }

    #[test]
    fn form_style_record_loads_blank_fields_as_absent() {
        let json = r##"{
            "id": 1710000000000,
            "title": "Dentist",
            "date": "2024-03-20",
            "allDay": false,
            "startTime": "15:00",
            "endTime": "",
            "description": "",
            "location": "Main St",
            "categoryId": null,
            "color": "#4285f4",
            "recurrence": "none",
            "recurrenceEnd": "",
            "reminder": "none",
            "url": "",
            "attendees": "",
            "createdAt": "2024-03-09T16:00:00.000Z"
        }"##;

        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, EventId(1710000000000));
        assert_eq!(event.start_time, TimeOfDay::new(15, 0));
        assert_eq!(event.end_time, None);
        assert_eq!(event.description, None);
        assert_eq!(event.location.as_deref(), Some("Main St"));
        assert_eq!(event.recurrence_end, None);
        assert_eq!(event.reminder, Reminder::None);
        assert!(!event.notified);
    }

    #[test]
    fn numeric_reminder_is_accepted() {
        let reminder: Reminder = serde_json::from_str("15").unwrap();
        assert_eq!(reminder, Reminder::MinutesBefore(15));
    }

    #[test]
    fn starts_at_ignores_time_for_all_day_events() {
        let mut event = sample_event();
        assert_eq!(
            event.starts_at(),
            event.date.and_hms_opt(12, 30, 0).unwrap()
        );
        event.all_day = true;
        assert_eq!(event.starts_at(), event.date.and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn recurrence_bound_defaults_to_one_year() {
        let mut event = sample_event();
        assert_eq!(
            event.recurrence_bound(),
            NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
        );
        event.recurrence_end = NaiveDate::from_ymd_opt(2024, 4, 1);
        assert_eq!(event.recurrence_bound(), NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    }

    #[test]
    fn matches_any_text_field_case_insensitively() {
        let event = sample_event();
        assert!(event.matches("lunch"));
        assert!(event.matches("cafeteria"));
        assert!(!event.matches("dinner"));
    }

    #[test]
    fn attendee_count_splits_on_commas() {
        let mut event = sample_event();
        assert_eq!(event.attendee_count(), 0);
        event.attendees = Some("ana, bo, cy".into());
        assert_eq!(event.attendee_count(), 3);
    }

    #[test]
    fn hour_slot_draft_lasts_one_hour() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let draft = EventDraft::at_hour("Sync", date, 9);
        assert_eq!(draft.start_time, TimeOfDay::new(9, 0));
        assert_eq!(draft.end_time, TimeOfDay::new(10, 0));
        assert_eq!(EventDraft::at_hour("Late", date, 23).end_time, None);
    }

    #[test]
    fn blank_title_fails_validation() {
        let draft = EventDraft::new("   ", NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
        assert!(matches!(draft.validate(), Err(DaybookError::Validation(_))));
    }

    #[test]
    fn category_visibility_defaults_to_true() {
        let category: Category =
            serde_json::from_str(r##"{"id": 9, "name": "Gym", "color": "#000000"}"##).unwrap();
        assert!(category.visible);
    }
}
