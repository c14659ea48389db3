use serde::{Deserialize, Serialize};

/// Category of a timeline entry. Decides the lane (2D) or zone (3D) and the
/// colour used by the view layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Education,
    Work,
    Cert,
    /// Anything the dataset spells differently. Placed on the work lane.
    #[serde(other)]
    Unknown,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Education => "education",
            EventType::Work => "work",
            EventType::Cert => "cert",
            EventType::Unknown => "unknown",
        }
    }

    /// Badge text shown in the detail panel.
    pub fn stream_label(self) -> &'static str {
        match self {
            EventType::Education => "Learning_Stream",
            EventType::Cert => "Cert_Verification",
            EventType::Work | EventType::Unknown => "Experience_Log",
        }
    }
}

/// One entry of the portfolio history. Loaded once, never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    /// Position on the time axis; fractional values order events inside a year.
    pub year: f64,
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(rename = "type")]
    pub type_: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    pub location: String,
    pub date_range: String,
}

impl TimelineEvent {
    /// Compact label: the part of `title` before the first `|`.
    pub fn short_title(&self) -> &str {
        match self.title.split_once('|') {
            Some((head, _)) => head,
            None => &self.title,
        }
    }

    /// Technologies in display order with repeats removed.
    pub fn unique_technologies(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for t in self.technologies.iter().flatten() {
            if !out.contains(&t.as_str()) {
                out.push(t);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: &str) -> TimelineEvent {
        TimelineEvent {
            id: "x".into(),
            year: 2020.0,
            title: title.into(),
            subtitle: String::new(),
            description: Vec::new(),
            type_: EventType::Work,
            technologies: None,
            location: String::new(),
            date_range: String::new(),
        }
    }

    #[test]
    fn short_title_splits_on_first_pipe() {
        assert_eq!(event("Engineer|Long role name|x").short_title(), "Engineer");
        assert_eq!(event("Plain title").short_title(), "Plain title");
    }

    #[test]
    fn unknown_category_deserializes() {
        let t: EventType = serde_json::from_str("\"volunteer\"").unwrap();
        assert_eq!(t, EventType::Unknown);
    }

    #[test]
    fn technologies_are_deduplicated_in_order() {
        let mut e = event("t");
        e.technologies = Some(vec!["Python".into(), "Java".into(), "Python".into()]);
        assert_eq!(e.unique_technologies(), vec!["Python", "Java"]);
        assert!(event("t").unique_technologies().is_empty());
    }
}
