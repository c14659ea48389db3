use std::sync::OnceLock;

use crate::model::TimelineEvent;

const BUNDLED_TIMELINE: &str = include_str!("../data/timeline.json");

static DATASET: OnceLock<Vec<TimelineEvent>> = OnceLock::new();

/// Parse a list of events from its JSON form.
pub fn parse_events(text: &str) -> Result<Vec<TimelineEvent>, serde_json::Error> {
    serde_json::from_str::<Vec<TimelineEvent>>(text)
}

/// A malformed bundle yields an empty timeline rather than a fault.
fn load(text: &str) -> Vec<TimelineEvent> {
    parse_events(text).unwrap_or_default()
}

/// The compiled-in history, parsed on first access.
pub fn dataset() -> &'static [TimelineEvent] {
    DATASET.get_or_init(|| load(BUNDLED_TIMELINE))
}

/// Look an event up by its stable id.
pub fn find_event(id: &str) -> Option<&'static TimelineEvent> {
    dataset().iter().find(|e| e.id == id)
}

/// Events ordered by `year`; ties keep dataset order.
pub fn sorted_by_year(events: &[TimelineEvent]) -> Vec<&TimelineEvent> {
    let mut out: Vec<&TimelineEvent> = events.iter().collect();
    out.sort_by(|a, b| a.year.total_cmp(&b.year));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventType;

    #[test]
    fn bundled_dataset_parses() {
        // parse directly so a broken bundle fails here instead of silently emptying
        let events = parse_events(BUNDLED_TIMELINE).unwrap();
        assert_eq!(events.len(), 11);
        assert_eq!(dataset().len(), 11);
    }

    #[test]
    fn malformed_bundle_loads_empty() {
        assert!(parse_events("{").is_err());
        assert!(load("not json").is_empty());
        assert!(load("[{\"id\": 1}]").is_empty());
        assert_eq!(load(BUNDLED_TIMELINE).len(), 11);
    }

    #[test]
    fn ids_are_unique() {
        let ids: std::collections::HashSet<&str> = dataset().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), dataset().len());
    }

    #[test]
    fn lookup_and_optional_technologies() {
        let work = find_event("work-2016").unwrap();
        assert_eq!(work.type_, EventType::Work);
        assert!(work.technologies.is_none());
        let cert = find_event("cert-2025-2").unwrap();
        assert_eq!(cert.year, 2025.6);
        assert!(find_event("missing").is_none());
    }

    #[test]
    fn sort_is_stable_for_equal_years() {
        let sorted = sorted_by_year(dataset());
        let ids: Vec<&str> = sorted.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids[0], "base-1");
        assert_eq!(&ids[1..3], &["ase-2016", "work-2016"]);
        assert_eq!(ids[ids.len() - 1], "cert-2025-2");
    }
}
