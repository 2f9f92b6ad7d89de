//! The event store: every event and category, persisted on each change.

use chrono::{NaiveDate, Utc};

use crate::error::{DaybookError, DaybookResult};
use crate::event::{
    Category, CategoryId, DEFAULT_EVENT_COLOR, Event, EventDraft, EventId, Theme,
    default_categories,
};
use crate::ids::IdGenerator;
use crate::recurrence::expand_recurring_event;
use crate::storage::{MemoryStorage, SnapshotStorage, StorageKey};

/// Outcome of creating an event.
#[derive(Debug)]
pub struct Created {
    /// Ids of every stored instance, template first.
    pub ids: Vec<EventId>,
    /// Non-fatal problem with the request, e.g. a recurrence end before
    /// the start date (only the template was stored).
    pub warning: Option<DaybookError>,
}

/// Ordered events plus categories and theme, backed by a snapshot storage.
///
/// Every mutating method writes a full snapshot before it returns. If that
/// write fails the in-memory change is kept and `Persistence` is returned.
pub struct EventStore {
    events: Vec<Event>,
    categories: Vec<Category>,
    theme: Theme,
    ids: IdGenerator,
    storage: Box<dyn SnapshotStorage>,
}

impl EventStore {
    /// Load state from `storage`. Keys never written keep their defaults:
    /// no events, the four seed categories, light theme.
    pub fn load(storage: impl SnapshotStorage + 'static) -> DaybookResult<Self> {
        let (events, categories, theme) = read_state(&storage)?;

        let mut ids = IdGenerator::new();
        events.iter().for_each(|e| ids.observe(e.id.0));
        categories.iter().for_each(|c| ids.observe(c.id.0));

        tracing::debug!(
            events = events.len(),
            categories = categories.len(),
            "loaded calendar state"
        );

        Ok(EventStore {
            events,
            categories,
            theme,
            ids,
            storage: Box::new(storage),
        })
    }

    /// Replace the in-memory state with what the storage holds now, picking
    /// up writes made by other processes sharing it. On error the current
    /// state is kept.
    pub fn reload(&mut self) -> DaybookResult<()> {
        let (events, categories, theme) = read_state(self.storage.as_ref())?;

        events.iter().for_each(|e| self.ids.observe(e.id.0));
        categories.iter().for_each(|c| self.ids.observe(c.id.0));
        self.events = events;
        self.categories = categories;
        self.theme = theme;

        tracing::debug!(events = self.events.len(), "reloaded calendar state");
        Ok(())
    }

    /// A fresh store that keeps its snapshots in memory.
    pub fn in_memory() -> Self {
        let mut ids = IdGenerator::new();
        let categories = default_categories();
        categories.iter().for_each(|c| ids.observe(c.id.0));

        EventStore {
            events: Vec::new(),
            categories,
            theme: Theme::default(),
            ids,
            storage: Box::new(MemoryStorage::new()),
        }
    }

    pub fn storage(&self) -> &dyn SnapshotStorage {
        self.storage.as_ref()
    }

    // READS:

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// False only when the event's category exists and is hidden.
    pub fn is_visible(&self, event: &Event) -> bool {
        event
            .category_id
            .and_then(|id| self.category(id))
            .is_none_or(|c| c.visible)
    }

    /// Visible events on `date`, in store order.
    pub fn find_by_date(&self, date: NaiveDate) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.date == date && self.is_visible(e))
            .collect()
    }

    /// Visible events with `start <= date <= end`, in store order.
    pub fn find_by_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.date >= start && e.date <= end && self.is_visible(e))
            .collect()
    }

    /// Events whose title, description or location contains `query`,
    /// ignoring case. Hidden categories are searched too.
    pub fn search(&self, query: &str) -> Vec<&Event> {
        let needle = query.trim().to_lowercase();
        self.events.iter().filter(|e| e.matches(&needle)).collect()
    }

    /// Event color, else its category's color, else the default.
    pub fn color_of<'a>(&'a self, event: &'a Event) -> &'a str {
        event
            .color
            .as_deref()
            .or_else(|| {
                event
                    .category_id
                    .and_then(|id| self.category(id))
                    .map(|c| c.color.as_str())
            })
            .unwrap_or(DEFAULT_EVENT_COLOR)
    }

    /// Each category with the number of events filed under it.
    pub fn category_counts(&self) -> Vec<(&Category, usize)> {
        self.categories
            .iter()
            .map(|c| {
                let count = self
                    .events
                    .iter()
                    .filter(|e| e.category_id == Some(c.id))
                    .count();
                (c, count)
            })
            .collect()
    }

    // EVENT MUTATIONS:

    /// Store a new event. A recurring draft is expanded into one stored
    /// event per occurrence.
    pub fn create(&mut self, draft: EventDraft) -> DaybookResult<Created> {
        draft.validate()?;

        let id = self.ids.next_event_id();
        let event = Event::from_draft(id, draft, Utc::now());
        let expansion = expand_recurring_event(&event, &mut self.ids);

        let ids: Vec<EventId> = expansion.events.iter().map(|e| e.id).collect();
        self.events.extend(expansion.events);

        tracing::debug!(id = %id, instances = ids.len(), "created event");
        self.persist()?;

        Ok(Created {
            ids,
            warning: expansion.warning,
        })
    }

    /// Replace the event `id` with the submitted fields. Keeps `id` and
    /// `created_at`; clears `notified`; does not expand recurrence.
    pub fn update(&mut self, id: EventId, draft: EventDraft) -> DaybookResult<&Event> {
        draft.validate()?;

        let index = self.index_of(id)?;
        let created_at = self.events[index].created_at;
        self.events[index] = Event::from_draft(id, draft, created_at);

        tracing::debug!(id = %id, "updated event");
        self.persist()?;

        Ok(&self.events[index])
    }

    pub fn delete(&mut self, id: EventId) -> DaybookResult<Event> {
        let index = self.index_of(id)?;
        let removed = self.events.remove(index);

        tracing::debug!(id = %id, "deleted event");
        self.persist()?;

        Ok(removed)
    }

    /// Copy an event under a new id with " (Copy)" appended to its title
    /// and a fresh creation time.
    pub fn duplicate(&mut self, id: EventId) -> DaybookResult<EventId> {
        let original = self.get(id).ok_or(DaybookError::NotFound(id))?.clone();
        let copy = Event {
            id: self.ids.next_event_id(),
            title: format!("{} (Copy)", original.title),
            created_at: Utc::now(),
            ..original
        };
        let copy_id = copy.id;
        self.events.push(copy);

        tracing::debug!(id = %id, copy = %copy_id, "duplicated event");
        self.persist()?;

        Ok(copy_id)
    }

    /// Remove every event. Categories stay. Returns how many were removed.
    pub fn clear_events(&mut self) -> DaybookResult<usize> {
        let removed = self.events.len();
        self.events.clear();
        self.persist()?;
        Ok(removed)
    }

    /// Flag events whose reminder has fired.
    pub(crate) fn mark_notified(&mut self, ids: &[EventId]) -> DaybookResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        for event in self.events.iter_mut().filter(|e| ids.contains(&e.id)) {
            event.notified = true;
        }
        self.persist()
    }

    /// Append imported records: events unconditionally, categories whose id
    /// is not already present. Returns (events added, categories added).
    pub(crate) fn append(
        &mut self,
        events: Vec<Event>,
        categories: Vec<Category>,
    ) -> DaybookResult<(usize, usize)> {
        let event_count = events.len();
        for event in &events {
            self.ids.observe(event.id.0);
        }
        self.events.extend(events);

        let mut category_count = 0;
        for category in categories {
            if self.category(category.id).is_none() {
                self.ids.observe(category.id.0);
                self.categories.push(category);
                category_count += 1;
            }
        }

        self.persist()?;
        Ok((event_count, category_count))
    }

    // CATEGORIES AND THEME:

    pub fn add_category(
        &mut self,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> DaybookResult<CategoryId> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DaybookError::Validation("Category name is required".into()));
        }

        let id = self.ids.next_category_id();
        self.categories.push(Category::new(id, name, color));
        self.persist()?;
        Ok(id)
    }

    /// Flip a category's visibility. Returns the new value.
    pub fn toggle_category(&mut self, id: CategoryId) -> DaybookResult<bool> {
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DaybookError::CategoryNotFound(id))?;
        category.visible = !category.visible;
        let visible = category.visible;

        self.persist()?;
        Ok(visible)
    }

    pub fn set_theme(&mut self, theme: Theme) -> DaybookResult<()> {
        self.theme = theme;
        self.persist()
    }

    pub fn toggle_theme(&mut self) -> DaybookResult<Theme> {
        self.set_theme(self.theme.toggled())?;
        Ok(self.theme)
    }

    // PERSISTENCE:

    /// Write the full snapshot: events, categories and theme.
    pub fn persist(&mut self) -> DaybookResult<()> {
        let events = serde_json::to_string(&self.events)
            .map_err(|e| DaybookError::Serialization(e.to_string()))?;
        let categories = serde_json::to_string(&self.categories)
            .map_err(|e| DaybookError::Serialization(e.to_string()))?;

        self.storage.write(StorageKey::Events, &events)?;
        self.storage.write(StorageKey::Categories, &categories)?;
        self.storage.write(StorageKey::Theme, &self.theme.to_string())
    }

    fn index_of(&self, id: EventId) -> DaybookResult<usize> {
        self.events
            .iter()
            .position(|e| e.id == id)
            .ok_or(DaybookError::NotFound(id))
    }
}

fn read_state(storage: &dyn SnapshotStorage) -> DaybookResult<(Vec<Event>, Vec<Category>, Theme)> {
    let events = match storage.read(StorageKey::Events)? {
        Some(json) => parse_snapshot(StorageKey::Events, &json)?,
        None => Vec::new(),
    };
    let categories = match storage.read(StorageKey::Categories)? {
        Some(json) => parse_snapshot(StorageKey::Categories, &json)?,
        None => default_categories(),
    };
    let theme = match storage.read(StorageKey::Theme)? {
        Some(token) => token.parse()?,
        None => Theme::default(),
    };
    Ok((events, categories, theme))
}

fn parse_snapshot<T: serde::de::DeserializeOwned>(key: StorageKey, json: &str) -> DaybookResult<T> {
    serde_json::from_str(json).map_err(|e| {
        DaybookError::Serialization(format!("Stored {} are unreadable: {}", key.as_str(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Recurrence, TimeOfDay};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn add(store: &mut EventStore, title: &str, on: NaiveDate) -> EventId {
        store.create(EventDraft::new(title, on)).unwrap().ids[0]
    }

    /// Storage that always refuses writes, like a full quota.
    struct FullStorage;

    impl SnapshotStorage for FullStorage {
        fn read(&self, _key: StorageKey) -> DaybookResult<Option<String>> {
            Ok(None)
        }

        fn write(&mut self, _key: StorageKey, _value: &str) -> DaybookResult<()> {
            Err(DaybookError::Persistence("quota exceeded".into()))
        }
    }

    #[test]
    fn load_from_empty_storage_uses_defaults() {
        let store = EventStore::load(MemoryStorage::new()).unwrap();
        assert!(store.events().is_empty());
        let names: Vec<_> = store.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Work", "Personal", "Meeting", "Holiday"]);
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn load_rejects_corrupt_snapshot() {
        let storage = MemoryStorage::new().with(StorageKey::Events, "{not json");
        assert!(matches!(
            EventStore::load(storage),
            Err(DaybookError::Serialization(_))
        ));
    }

    #[test]
    fn load_rejects_unknown_theme() {
        let storage = MemoryStorage::new().with(StorageKey::Theme, "blue");
        assert!(matches!(
            EventStore::load(storage),
            Err(DaybookError::Validation(_))
        ));
    }

    #[test]
    fn reload_keeps_state_when_storage_is_corrupt() {
        let storage = MemoryStorage::new().with(StorageKey::Events, "{not json");
        let mut store = EventStore::load(MemoryStorage::new()).unwrap();
        add(&mut store, "Dentist", date(2024, 3, 20));
        store.storage = Box::new(storage);

        assert!(store.reload().is_err());
        assert_eq!(store.events().len(), 1);
    }

    #[test]
    fn every_mutation_writes_a_snapshot() {
        let mut store = EventStore::in_memory();
        let id = add(&mut store, "Dentist", date(2024, 3, 20));

        let saved = store.storage().read(StorageKey::Events).unwrap().unwrap();
        let events: Vec<Event> = serde_json::from_str(&saved).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, id);

        store.toggle_theme().unwrap();
        assert_eq!(
            store.storage().read(StorageKey::Theme).unwrap().as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn create_rejects_blank_title() {
        let mut store = EventStore::in_memory();
        let result = store.create(EventDraft::new("", date(2024, 3, 20)));
        assert!(matches!(result, Err(DaybookError::Validation(_))));
        assert!(store.events().is_empty());
    }

    #[test]
    fn create_expands_recurring_events() {
        let mut store = EventStore::in_memory();
        let mut draft = EventDraft::new("Gym", date(2024, 3, 1));
        draft.recurrence = Recurrence::Weekly;
        draft.recurrence_end = Some(date(2024, 3, 29));

        let created = store.create(draft).unwrap();
        assert_eq!(created.ids.len(), 5);
        assert_eq!(store.events().len(), 5);
        assert!(created.warning.is_none());
    }

    #[test]
    fn create_with_inverted_recurrence_degrades_to_one_event() {
        let mut store = EventStore::in_memory();
        let mut draft = EventDraft::new("Gym", date(2024, 3, 10));
        draft.recurrence = Recurrence::Daily;
        draft.recurrence_end = Some(date(2024, 3, 1));

        let created = store.create(draft).unwrap();
        assert_eq!(created.ids.len(), 1);
        assert!(matches!(
            created.warning,
            Some(DaybookError::RecurrenceConfig { .. })
        ));
    }

    #[test]
    fn update_replaces_fields_and_keeps_identity() {
        let mut store = EventStore::in_memory();
        let id = add(&mut store, "Dentist", date(2024, 3, 20));
        let created_at = store.get(id).unwrap().created_at;
        store.mark_notified(&[id]).unwrap();

        let mut draft = store.get(id).unwrap().to_draft();
        draft.title = "Orthodontist".into();
        draft.start_time = TimeOfDay::new(15, 0);

        let updated = store.update(id, draft).unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.title, "Orthodontist");
        assert_eq!(updated.created_at, created_at);
        assert!(!updated.notified, "editing re-arms the reminder");
    }

    #[test]
    fn update_and_delete_unknown_id_fail_with_not_found() {
        let mut store = EventStore::in_memory();
        let missing = EventId(7);
        assert!(matches!(
            store.update(missing, EventDraft::new("x", date(2024, 1, 1))),
            Err(DaybookError::NotFound(id)) if id == missing
        ));
        assert!(matches!(store.delete(missing), Err(DaybookError::NotFound(_))));
    }

    #[test]
    fn delete_removes_only_that_event() {
        let mut store = EventStore::in_memory();
        let a = add(&mut store, "A", date(2024, 3, 20));
        let b = add(&mut store, "B", date(2024, 3, 20));

        let removed = store.delete(a).unwrap();
        assert_eq!(removed.title, "A");
        assert!(store.get(a).is_none());
        assert!(store.get(b).is_some());
    }

    #[test]
    fn duplicate_copies_everything_but_id_title_and_creation_time() {
        let mut store = EventStore::in_memory();
        let mut draft = EventDraft::new("Review", date(2024, 3, 20));
        draft.location = Some("Room 4".into());
        draft.category_id = Some(CategoryId(1));
        let id = store.create(draft).unwrap().ids[0];

        let copy_id = store.duplicate(id).unwrap();
        assert_ne!(copy_id, id);

        let original = store.get(id).unwrap();
        let copy = store.get(copy_id).unwrap();
        assert_eq!(copy.title, "Review (Copy)");
        assert_eq!(
            Event {
                id: original.id,
                title: original.title.clone(),
                created_at: original.created_at,
                ..copy.clone()
            },
            *original
        );
    }

    #[test]
    fn find_by_date_skips_hidden_categories() {
        let mut store = EventStore::in_memory();
        let day = date(2024, 3, 20);

        add(&mut store, "Uncategorized", day);
        let mut work = EventDraft::new("Work item", day);
        work.category_id = Some(CategoryId(1));
        store.create(work).unwrap();
        let mut personal = EventDraft::new("Personal item", day);
        personal.category_id = Some(CategoryId(2));
        store.create(personal).unwrap();
        add(&mut store, "Other day", date(2024, 3, 21));

        assert!(!store.toggle_category(CategoryId(2)).unwrap());

        let titles: Vec<_> = store.find_by_date(day).iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Uncategorized", "Work item"]);
        assert_eq!(store.events().len(), 4, "hidden events stay in the store");
    }

    #[test]
    fn find_by_range_is_inclusive() {
        let mut store = EventStore::in_memory();
        add(&mut store, "before", date(2024, 2, 29));
        add(&mut store, "first", date(2024, 3, 1));
        add(&mut store, "last", date(2024, 3, 31));
        add(&mut store, "after", date(2024, 4, 1));

        let titles: Vec<_> = store
            .find_by_range(date(2024, 3, 1), date(2024, 3, 31))
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["first", "last"]);
    }

    #[test]
    fn search_matches_any_field_ignoring_case() {
        let mut store = EventStore::in_memory();
        add(&mut store, "Team Lunch", date(2024, 3, 20));
        let mut draft = EventDraft::new("Offsite", date(2024, 3, 21));
        draft.description = Some("Bring LUNCH money".into());
        store.create(draft).unwrap();
        let mut draft = EventDraft::new("Walk", date(2024, 3, 22));
        draft.location = Some("Park".into());
        store.create(draft).unwrap();

        assert_eq!(store.search("lunch").len(), 2);
        assert_eq!(store.search("  PARK ").len(), 1);
        assert!(store.search("dinner").is_empty());
    }

    #[test]
    fn color_falls_back_to_category_then_default() {
        let mut store = EventStore::in_memory();
        let plain = add(&mut store, "plain", date(2024, 3, 20));

        let mut draft = EventDraft::new("personal", date(2024, 3, 20));
        draft.category_id = Some(CategoryId(2));
        let categorized = store.create(draft).unwrap().ids[0];

        let mut draft = EventDraft::new("custom", date(2024, 3, 20));
        draft.category_id = Some(CategoryId(2));
        draft.color = Some("#123456".into());
        let custom = store.create(draft).unwrap().ids[0];

        assert_eq!(store.color_of(store.get(plain).unwrap()), DEFAULT_EVENT_COLOR);
        assert_eq!(store.color_of(store.get(categorized).unwrap()), "#ea4335");
        assert_eq!(store.color_of(store.get(custom).unwrap()), "#123456");
    }

    #[test]
    fn categories_only_accumulate() {
        let mut store = EventStore::in_memory();
        let id = store.add_category("Gym", "#000000").unwrap();
        assert_eq!(store.categories().len(), 5);
        assert!(store.category(id).unwrap().visible);
        assert!(store.add_category(" ", "#000000").is_err());
        assert!(matches!(
            store.toggle_category(CategoryId(99)),
            Err(DaybookError::CategoryNotFound(_))
        ));
    }

    #[test]
    fn category_counts_tally_events() {
        let mut store = EventStore::in_memory();
        for _ in 0..2 {
            let mut draft = EventDraft::new("w", date(2024, 3, 20));
            draft.category_id = Some(CategoryId(1));
            store.create(draft).unwrap();
        }
        let counts = store.category_counts();
        assert_eq!(counts[0].1, 2);
        assert_eq!(counts[1].1, 0);
    }

    #[test]
    fn clear_events_keeps_categories() {
        let mut store = EventStore::in_memory();
        add(&mut store, "a", date(2024, 3, 20));
        add(&mut store, "b", date(2024, 3, 21));
        assert_eq!(store.clear_events().unwrap(), 2);
        assert!(store.events().is_empty());
        assert_eq!(store.categories().len(), 4);
    }

    #[test]
    fn failed_snapshot_surfaces_persistence_error() {
        let mut store = EventStore::load(FullStorage).unwrap();
        let result = store.create(EventDraft::new("Dentist", date(2024, 3, 20)));
        assert!(matches!(result, Err(DaybookError::Persistence(_))));
        assert_eq!(store.events().len(), 1, "in-memory state is not lost");
    }
}
