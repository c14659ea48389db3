//! Page furniture around the timeline: header, summary panel, orientation
//! hint and the view switch.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use timeline_core::{Viewport, palette};

/// Below this width a portrait screen is asked to rotate.
pub const ROTATE_BELOW_WIDTH: f64 = 640.0;
/// The summary starts expanded above this width.
pub const SUMMARY_OPEN_ABOVE_WIDTH: f64 = 1024.0;

pub const TAGLINE: &str = "For all time. Always.";
pub const OWNER: &str = "RAFA ESPARZA";
pub const ROLE: &str = "Software Engineer";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Lane,
    Sphere,
}

impl ViewMode {
    /// Value of the `?view=` query parameter; anything unknown is the lane view.
    pub fn from_query(v: Option<&str>) -> ViewMode {
        match v.map(|s| s.trim().to_ascii_lowercase()) {
            Some(s) if s == "sphere" || s == "3d" => ViewMode::Sphere,
            _ => ViewMode::Lane,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Lane => "lane",
            ViewMode::Sphere => "sphere",
        }
    }

    pub fn toggled(self) -> ViewMode {
        match self {
            ViewMode::Lane => ViewMode::Sphere,
            ViewMode::Sphere => ViewMode::Lane,
        }
    }
}

pub fn needs_rotation(vp: Viewport) -> bool {
    vp.width < ROTATE_BELOW_WIDTH && vp.height >= vp.width
}

pub fn summary_open_initially(width: f64) -> bool {
    width > SUMMARY_OPEN_ABOVE_WIDTH
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Stat {
    pub label: &'static str,
    pub value: &'static str,
    pub color: &'static str,
}

pub const STATS: [Stat; 3] = [
    Stat {
        label: "Coding Languages",
        value: "+3",
        color: palette::PURPLE,
    },
    Stat {
        label: "Years",
        value: "5+",
        color: palette::BLUE,
    },
    Stat {
        label: "Degrees",
        value: "2",
        color: palette::CYAN,
    },
];

pub fn summary_html() -> String {
    let mut s = String::new();
    let _ = write!(s, "<h2 class=\"tagline\">\"{TAGLINE}\"</h2><div class=\"stats\">");
    for st in &STATS {
        let _ = write!(
            s,
            "<div class=\"stat\"><h4 style=\"color:{}\">{}</h4><p>{}</p></div>",
            st.color, st.value, st.label
        );
    }
    s.push_str("</div>");
    s
}

pub fn header_html() -> String {
    format!(
        "<div class=\"mark\" style=\"border-color:{gold};color:{gold}\">R</div><div><h1>{OWNER}</h1><p class=\"role\">{ROLE}</p></div>",
        gold = palette::GOLD
    )
}

/// Collapsible state of the summary panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummaryPanel {
    pub open: bool,
}

impl SummaryPanel {
    pub fn for_width(width: f64) -> Self {
        SummaryPanel {
            open: summary_open_initially(width),
        }
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn button_label(&self) -> &'static str {
        if self.open { "Hide Record" } else { "View Record" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_from_query() {
        assert_eq!(ViewMode::from_query(None), ViewMode::Lane);
        assert_eq!(ViewMode::from_query(Some("sphere")), ViewMode::Sphere);
        assert_eq!(ViewMode::from_query(Some(" Sphere ")), ViewMode::Sphere);
        assert_eq!(ViewMode::from_query(Some("lane")), ViewMode::Lane);
        assert_eq!(ViewMode::from_query(Some("cube")), ViewMode::Lane);
        assert_eq!(ViewMode::Lane.toggled().as_str(), "sphere");
    }

    #[test]
    fn rotation_hint_only_on_narrow_portrait() {
        assert!(needs_rotation(Viewport::new(375.0, 812.0)));
        assert!(!needs_rotation(Viewport::new(812.0, 375.0)));
        assert!(!needs_rotation(Viewport::new(700.0, 1000.0)));
        // square counts as portrait
        assert!(needs_rotation(Viewport::new(500.0, 500.0)));
        assert!(!needs_rotation(Viewport::new(640.0, 640.0)));
    }

    #[test]
    fn summary_visibility() {
        assert!(!summary_open_initially(1024.0));
        assert!(summary_open_initially(1025.0));
        let mut p = SummaryPanel::for_width(800.0);
        assert!(!p.open);
        assert_eq!(p.button_label(), "View Record");
        assert!(p.toggle());
        assert_eq!(p.button_label(), "Hide Record");
        assert!(!p.toggle());
    }

    #[test]
    fn summary_markup() {
        let html = summary_html();
        assert!(html.contains("\"For all time. Always.\""));
        assert!(html.contains("<h4 style=\"color:#8b5cf6\">+3</h4><p>Coding Languages</p>"));
        assert_eq!(html.matches("class=\"stat\"").count(), 3);
        assert!(header_html().contains("RAFA ESPARZA"));
    }
}
