//! Agenda listing and search results.

use chrono::NaiveDate;

use crate::date_key::month_bounds;
use crate::event::Event;
use crate::store::EventStore;

#[derive(Debug, Clone)]
pub struct AgendaSection<'a> {
    pub date: NaiveDate,
    pub events: Vec<&'a Event>,
}

#[derive(Debug, Clone)]
pub struct Agenda<'a> {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub sections: Vec<AgendaSection<'a>>,
}

impl Agenda<'_> {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Visible events of the month containing `anchor`, one section per date.
pub fn agenda(store: &EventStore, anchor: NaiveDate) -> Agenda<'_> {
    let (start, end) = month_bounds(anchor);
    let mut events = store.find_by_range(start, end);
    sort_for_agenda(&mut events);

    let mut sections: Vec<AgendaSection> = Vec::new();
    for event in events {
        match sections.last_mut() {
            Some(section) if section.date == event.date => section.events.push(event),
            _ => sections.push(AgendaSection {
                date: event.date,
                events: vec![event],
            }),
        }
    }

    Agenda {
        start,
        end,
        sections,
    }
}

/// Order by date, then by start time among events that have one.
///
/// Events without a start time keep their position within the day; the
/// timed events of that day are sorted into the remaining positions.
pub fn sort_for_agenda(events: &mut [&Event]) {
    events.sort_by_key(|e| e.date);

    for day in events.chunk_by_mut(|a, b| a.date == b.date) {
        let positions: Vec<usize> = day
            .iter()
            .enumerate()
            .filter(|(_, e)| e.start_time.is_some())
            .map(|(i, _)| i)
            .collect();

        let mut timed: Vec<&Event> = positions.iter().map(|&i| day[i]).collect();
        timed.sort_by_key(|e| e.start_time);

        for (position, event) in positions.into_iter().zip(timed) {
            day[position] = event;
        }
    }
}

/// Every event matching `query`, by date, ignoring the active view's range.
/// `None` when the query is blank, meaning the regular view applies.
pub fn search_results<'a>(store: &'a EventStore, query: &str) -> Option<Vec<&'a Event>> {
    if query.trim().is_empty() {
        return None;
    }
    let mut results = store.search(query);
    results.sort_by_key(|e| e.date);
    Some(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{CategoryId, EventDraft};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn add(store: &mut EventStore, title: &str, on: NaiveDate, start: Option<&str>) {
        let mut draft = EventDraft::new(title, on);
        draft.start_time = start.map(|s| s.parse().unwrap());
        store.create(draft).unwrap();
    }

    fn titles<'a>(events: &[&'a Event]) -> Vec<&'a str> {
        events.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn agenda_groups_by_date_in_order() {
        let mut store = EventStore::in_memory();
        add(&mut store, "late", date(2024, 3, 21), Some("18:00"));
        add(&mut store, "early", date(2024, 3, 21), Some("08:00"));
        add(&mut store, "first", date(2024, 3, 2), None);
        add(&mut store, "next month", date(2024, 4, 1), None);

        let agenda = agenda(&store, date(2024, 3, 15));
        assert_eq!((agenda.start, agenda.end), (date(2024, 3, 1), date(2024, 3, 31)));
        assert_eq!(agenda.sections.len(), 2);
        assert_eq!(agenda.sections[0].date, date(2024, 3, 2));
        assert_eq!(titles(&agenda.sections[1].events), vec!["early", "late"]);
    }

    #[test]
    fn untimed_events_hold_their_place_within_a_day() {
        let mut store = EventStore::in_memory();
        add(&mut store, "b", date(2024, 3, 5), Some("10:00"));
        add(&mut store, "untimed", date(2024, 3, 5), None);
        add(&mut store, "a", date(2024, 3, 5), Some("09:00"));

        let mut events = store.find_by_date(date(2024, 3, 5));
        sort_for_agenda(&mut events);
        assert_eq!(titles(&events), vec!["a", "untimed", "b"]);
    }

    #[test]
    fn agenda_skips_hidden_categories() {
        let mut store = EventStore::in_memory();
        let mut draft = EventDraft::new("work", date(2024, 3, 5));
        draft.category_id = Some(CategoryId(1));
        store.create(draft).unwrap();
        store.toggle_category(CategoryId(1)).unwrap();

        assert!(agenda(&store, date(2024, 3, 5)).is_empty());
    }

    #[test]
    fn search_ignores_month_and_sorts_by_date() {
        let mut store = EventStore::in_memory();
        add(&mut store, "Lunch with Sam", date(2025, 1, 10), None);
        add(&mut store, "Team Lunch", date(2023, 6, 1), None);
        add(&mut store, "Dinner", date(2024, 1, 1), None);

        let results = search_results(&store, "lunch").unwrap();
        assert_eq!(titles(&results), vec!["Team Lunch", "Lunch with Sam"]);
        assert!(search_results(&store, "   ").is_none());
    }
}
