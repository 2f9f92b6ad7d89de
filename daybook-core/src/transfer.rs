//! JSON export and import of the whole calendar.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::date_key::to_date_key;
use crate::error::{DaybookError, DaybookResult};
use crate::event::{Category, Event};
use crate::store::EventStore;

/// Shape of an export file: `{ events, categories, exportDate }`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle<'a> {
    pub events: &'a [Event],
    pub categories: &'a [Category],
    pub export_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportPayload {
    events: Option<Vec<Event>>,
    #[serde(default)]
    categories: Vec<Category>,
}

/// What an import added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub events: usize,
    pub categories: usize,
}

/// Default file name for an export made on `today`.
pub fn export_filename(today: NaiveDate) -> String {
    format!("calendar-export-{}.json", to_date_key(today))
}

impl EventStore {
    pub fn export_bundle(&self, now: DateTime<Utc>) -> ExportBundle<'_> {
        ExportBundle {
            events: self.events(),
            categories: self.categories(),
            export_date: now,
        }
    }

    /// Pretty-printed export of every event and category.
    pub fn export_json(&self, now: DateTime<Utc>) -> DaybookResult<String> {
        serde_json::to_string_pretty(&self.export_bundle(now))
            .map_err(|e| DaybookError::Serialization(e.to_string()))
    }

    /// Merge an export file into the store.
    ///
    /// Events are appended as-is, duplicates included. Categories are added
    /// only when their id is new. A payload that does not parse leaves the
    /// store untouched.
    pub fn import_json(&mut self, json: &str) -> DaybookResult<ImportSummary> {
        let payload: ImportPayload =
            serde_json::from_str(json).map_err(|e| DaybookError::Import(e.to_string()))?;
        let events = payload
            .events
            .ok_or_else(|| DaybookError::Import("File contains no events".into()))?;

        let (events, categories) = self.append(events, payload.categories)?;
        tracing::debug!(events, categories, "imported calendar data");

        Ok(ImportSummary { events, categories })
    }
}
