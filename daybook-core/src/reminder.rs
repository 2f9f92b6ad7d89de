//! Reminder scanning.
//!
//! Each event with a reminder moves one way from pending to notified. A scan
//! fires the reminders whose window `[start - minutes, start)` contains the
//! current time. A window that passes entirely between two scans is missed;
//! past events are never notified after the fact.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, NaiveDateTime};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::error::DaybookResult;
use crate::event::{Event, EventId};
use crate::store::EventStore;

/// How often the host should scan.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(60);

const REMINDER_TITLE: &str = "Event Reminder";

/// A request to show a notification. Delivery is up to the host and may
/// fail or be refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationIntent {
    pub event_id: EventId,
    pub title: String,
    pub body: String,
    /// Stable per event (`event-<id>`) so repeated deliveries replace each
    /// other instead of stacking.
    pub tag: String,
}

impl NotificationIntent {
    pub fn for_event(event: &Event) -> Self {
        NotificationIntent {
            event_id: event.id,
            title: REMINDER_TITLE.to_string(),
            body: format!("{} is coming up soon!", event.title),
            tag: format!("event-{}", event.id),
        }
    }
}

/// Whether `event`'s reminder should fire at `now`.
pub fn is_due(event: &Event, now: NaiveDateTime) -> bool {
    let Some(minutes) = event.reminder.minutes() else {
        return false;
    };
    if event.notified {
        return false;
    }

    let event_time = event.starts_at();
    let reminder_time = event_time - ChronoDuration::minutes(minutes as i64);
    reminder_time <= now && now < event_time
}

/// One intent per event whose reminder is due at `now`. Does not change
/// any state.
pub fn due_intents(store: &EventStore, now: NaiveDateTime) -> Vec<NotificationIntent> {
    store
        .events()
        .iter()
        .filter(|e| is_due(e, now))
        .map(NotificationIntent::for_event)
        .collect()
}

/// Fire every due reminder: reload the store, mark due events notified
/// (persisting once) and return one intent per event.
pub fn scan(store: &mut EventStore, now: NaiveDateTime) -> DaybookResult<Vec<NotificationIntent>> {
    store.reload()?;
    let intents = due_intents(store, now);
    mark_fired(store, &intents)?;
    Ok(intents)
}

fn mark_fired(store: &mut EventStore, intents: &[NotificationIntent]) -> DaybookResult<()> {
    for intent in intents {
        tracing::debug!(tag = %intent.tag, "reminder due");
    }
    let fired: Vec<EventId> = intents.iter().map(|i| i.event_id).collect();
    store.mark_notified(&fired)
}

/// One loop tick. Delivery and persistence failures are logged; the event
/// still counts as fired.
fn scan_and_notify<N: Notifier + ?Sized>(
    store: &mut EventStore,
    notifier: &N,
    now: NaiveDateTime,
) -> usize {
    if let Err(e) = store.reload() {
        tracing::warn!("skipping reminder scan, could not reload: {}", e);
        return 0;
    }

    let intents = due_intents(store, now);
    for intent in &intents {
        if let Err(e) = notifier.notify(intent) {
            tracing::warn!(tag = %intent.tag, "notification not delivered: {}", e);
        }
    }
    if let Err(e) = mark_fired(store, &intents) {
        tracing::warn!("reminder state not saved: {}", e);
    }
    intents.len()
}

pub type NotifyError = Box<dyn std::error::Error + Send + Sync>;

/// The host's notification facility.
pub trait Notifier {
    fn notify(&self, intent: &NotificationIntent) -> Result<(), NotifyError>;
}

/// Stops a running [`ReminderLoop`].
#[derive(Debug)]
pub struct ReminderHandle {
    shutdown: watch::Sender<bool>,
}

impl ReminderHandle {
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }
}

/// Periodic scan driven by a tokio interval.
///
/// The loop owns the store borrow for its lifetime, so scans and any other
/// work on the store never interleave. Each scan reloads the store first,
/// so events written by other processes are seen and never overwritten.
#[derive(Debug)]
pub struct ReminderLoop {
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

pub fn reminder_loop(interval: Duration) -> (ReminderHandle, ReminderLoop) {
    let (tx, rx) = watch::channel(false);
    (
        ReminderHandle { shutdown: tx },
        ReminderLoop {
            interval,
            shutdown: rx,
        },
    )
}

impl ReminderLoop {
    /// Scan now and then every interval until stopped (or the handle is
    /// dropped). `clock` supplies the local time for each scan. Returns the
    /// number of reminders fired.
    pub async fn run<N, C>(mut self, store: &mut EventStore, notifier: &N, clock: C) -> usize
    where
        N: Notifier + ?Sized,
        C: Fn() -> NaiveDateTime,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut fired = 0;

        loop {
            if *self.shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    fired += scan_and_notify(store, notifier, clock());
                }
                changed = self.shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::debug!(fired, "reminder loop stopped");
        fired
    }
}
