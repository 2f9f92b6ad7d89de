//! Expansion of recurring events into concrete instances.
//!
//! A recurring event is stored as independent copies, one per occurrence.
//! The first copy is the template as entered; each following copy moves the
//! date forward by one step and receives its own id.

use chrono::{Duration, NaiveDate};

use crate::date_key::{add_months_overflowing, add_years_overflowing};
use crate::error::DaybookError;
use crate::event::{Event, Recurrence};
use crate::ids::IdGenerator;

/// Result of expanding a template.
#[derive(Debug)]
pub struct Expansion {
    /// Template first, then each instance in date order.
    pub events: Vec<Event>,
    /// Set when the series was cut down to the template alone because its
    /// end precedes its start.
    pub warning: Option<DaybookError>,
}

/// The date one recurrence step after `date`, or `None` if the event does
/// not recur (or the calendar runs out).
pub fn next_occurrence(date: NaiveDate, recurrence: Recurrence) -> Option<NaiveDate> {
    match recurrence {
        Recurrence::None => None,
        Recurrence::Daily => date.checked_add_signed(Duration::days(1)),
        Recurrence::Weekly => date.checked_add_signed(Duration::days(7)),
        Recurrence::Monthly => Some(add_months_overflowing(date, 1)).filter(|d| *d > date),
        Recurrence::Yearly => Some(add_years_overflowing(date, 1)).filter(|d| *d > date),
    }
}

/// Expand `template` into its full series up to and including its
/// recurrence bound.
///
/// Stepping is applied to the previous instance, so a monthly series that
/// starts on the 31st drifts after the first short month (Jan 31, Mar 2,
/// Apr 2, ...).
pub fn expand_recurring_event(template: &Event, ids: &mut IdGenerator) -> Expansion {
    let mut events = vec![template.clone()];

    if !template.recurrence.is_recurring() {
        return Expansion {
            events,
            warning: None,
        };
    }

    let end = template.recurrence_bound();
    if end < template.date {
        return Expansion {
            events,
            warning: Some(DaybookError::RecurrenceConfig {
                date: template.date,
                end,
            }),
        };
    }

    let mut current = template.date;
    while let Some(next) = next_occurrence(current, template.recurrence) {
        if next > end {
            break;
        }
        events.push(Event {
            id: ids.next_event_id(),
            date: next,
            ..template.clone()
        });
        current = next;
    }

    tracing::debug!(
        title = %template.title,
        instances = events.len(),
        until = %end,
        "expanded recurring event"
    );

    Expansion {
        events,
        warning: None,
    }
}
