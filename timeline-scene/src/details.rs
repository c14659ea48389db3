use std::fmt::Write as _;

use serde::Serialize;

use timeline_core::palette;
use timeline_core::{EventType, TimelineEvent};

use crate::svg::svg_escape;

pub const CLOSE_LABEL: &str = "Return to Timeline";

/// Flattened content of the detail panel for one event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventDetails {
    pub id: String,
    pub kind: EventType,
    pub badge: &'static str,
    pub stamp: String,
    pub title: String,
    pub subtitle: String,
    /// `(ordinal, line)` pairs, ordinals two digits wide.
    pub items: Vec<(String, String)>,
    pub technologies: Vec<String>,
    pub location: String,
    pub date_range: String,
    pub accent: &'static str,
}

impl EventDetails {
    pub fn from_event(e: &TimelineEvent) -> Self {
        EventDetails {
            id: e.id.clone(),
            kind: e.type_,
            badge: e.type_.stream_label(),
            stamp: format!("STAMP://{}", e.date_range),
            title: e.title.clone(),
            subtitle: e.subtitle.clone(),
            items: e
                .description
                .iter()
                .enumerate()
                .map(|(i, line)| (format!("{:02}", i + 1), line.clone()))
                .collect(),
            technologies: e
                .unique_technologies()
                .into_iter()
                .map(str::to_string)
                .collect(),
            location: e.location.clone(),
            date_range: e.date_range.clone(),
            accent: palette::lane_color(e.type_),
        }
    }

    /// Markup for the panel body. The close button carries
    /// `data-action="close"` so the host can wire it.
    pub fn to_html(&self) -> String {
        let mut s = String::new();
        let _ = write!(
            s,
            "<div class=\"modal-accent\" style=\"background:{}\"></div>",
            self.accent
        );
        s.push_str("<div class=\"modal-body\"><header>");
        let _ = write!(
            s,
            "<span class=\"badge\">{}</span><span class=\"stamp\">{}</span>",
            self.badge,
            svg_escape(&self.stamp)
        );
        let _ = write!(
            s,
            "<h2>{}</h2><p class=\"subtitle\">{}</p>",
            svg_escape(&self.title),
            svg_escape(&self.subtitle)
        );
        let _ = write!(
            s,
            "<button type=\"button\" data-action=\"close\">{}</button></header>",
            CLOSE_LABEL
        );

        s.push_str("<section><h3>Entry Description</h3><ul>");
        for (n, line) in &self.items {
            let _ = write!(
                s,
                "<li><span class=\"ordinal\">{}</span><p>{}</p></li>",
                n,
                svg_escape(line)
            );
        }
        s.push_str("</ul></section>");

        if !self.technologies.is_empty() {
            s.push_str("<section><h3>Core Technologies</h3><div class=\"tags\">");
            for t in &self.technologies {
                let _ = write!(s, "<span class=\"tag\">{}</span>", svg_escape(t));
            }
            s.push_str("</div></section>");
        }

        let _ = write!(
            s,
            "<aside><p>Location Coordinates</p><strong>{}</strong><p>Temporal Window</p><strong>{}</strong></aside></div>",
            svg_escape(&self.location),
            svg_escape(&self.date_range)
        );
        s
    }
}

/// Hover card of the orbital view: date range, title, location.
pub fn tooltip_lines(e: &TimelineEvent) -> [String; 3] {
    [
        e.date_range.clone(),
        e.title.to_uppercase(),
        e.location.to_uppercase(),
    ]
}

/// The open detail panel, if any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    current: Option<String>,
}

impl Selection {
    /// Select `id` if it names a known event; unknown ids leave the
    /// selection unchanged.
    pub fn open(&mut self, id: &str, events: &[TimelineEvent]) -> Option<EventDetails> {
        let e = events.iter().find(|e| e.id == id)?;
        self.current = Some(e.id.clone());
        Some(EventDetails::from_event(e))
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use timeline_core::dataset;
    use timeline_core::data::find_event;

    #[test]
    fn work_entry_details() {
        let e = find_event("work-2020").unwrap();
        let d = EventDetails::from_event(e);
        assert_eq!(d.badge, "Experience_Log");
        assert_eq!(d.stamp, "STAMP://06/2020 - 12/2020");
        assert_eq!(d.items[0].0, "01");
        assert_eq!(d.items[1].0, "02");
        assert_eq!(
            d.technologies,
            vec![
                "Python",
                "Java",
                "Javascript",
                "SQL",
                "OpenCV",
                "Raspberry Pi",
                "Arduino"
            ]
        );
        assert_eq!(d.accent, palette::BLUE);
    }

    #[test]
    fn badges_by_category() {
        let edu = EventDetails::from_event(find_event("edu-2020").unwrap());
        assert_eq!(edu.badge, "Learning_Stream");
        let cert = EventDetails::from_event(find_event("cert-2025-1").unwrap());
        assert_eq!(cert.badge, "Cert_Verification");
    }

    #[test]
    fn ordinals_stay_two_digits() {
        let mut e = find_event("base-1").unwrap().clone();
        e.description = (0..12).map(|i| format!("line {i}")).collect();
        let d = EventDetails::from_event(&e);
        assert_eq!(d.items[8].0, "09");
        assert_eq!(d.items[11].0, "12");
    }

    #[test]
    fn html_omits_empty_technologies() {
        let e = find_event("edu-2020").unwrap();
        let html = EventDetails::from_event(e).to_html();
        assert!(!html.contains("Core Technologies"));
        assert!(html.contains("data-action=\"close\">Return to Timeline</button>"));
        let w = EventDetails::from_event(find_event("work-2024").unwrap()).to_html();
        assert!(w.contains("<span class=\"tag\">PL/SQL</span>"));
    }

    #[test]
    fn tooltip_carries_location() {
        let e = find_event("work-2020").unwrap();
        assert_eq!(
            tooltip_lines(e),
            [
                "06/2020 - 12/2020".to_string(),
                "SOFTWARE DEVELOPER".to_string(),
                "ONTINYENT".to_string(),
            ]
        );
    }

    #[test]
    fn selection_round_trip() {
        let mut sel = Selection::default();
        assert!(sel.open("missing", dataset()).is_none());
        assert_eq!(sel.current(), None);
        let d = sel.open("work-2021", dataset()).unwrap();
        assert_eq!(d.id, "work-2021");
        assert_eq!(sel.current(), Some("work-2021"));
        assert!(sel.open("nope", dataset()).is_none());
        assert_eq!(sel.current(), Some("work-2021"));
        sel.close();
        assert_eq!(sel.current(), None);
    }
}
