use serde::{Deserialize, Serialize};

/// Authored layout defaults, used before the first viewport measurement.
pub const START_YEAR: i32 = 2014;
pub const END_YEAR: i32 = 2026;
pub const YEAR_WIDTH: f64 = 330.0;
pub const TIMELINE_Y: f64 = 280.0;
pub const EDU_Y: f64 = 140.0;
pub const CERT_Y: f64 = 190.0;
pub const WORK_Y: f64 = 380.0;
pub const PADDING: f64 = 200.0;

/// Extra scrollable room to the right of the last year (px).
pub const TRAILING_SPACE: f64 = 400.0;

/// One complete set of geometry parameters.
///
/// A snapshot is never edited in place: the resolver builds a new value and
/// consumers swap the whole thing, so every derived position comes from a
/// single consistent set of numbers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub start_year: i32,
    pub end_year: i32,
    pub year_width: f64,
    pub padding: f64,
    pub timeline_y: f64,
    pub edu_y: f64,
    pub cert_y: f64,
    pub work_y: f64,
    /// Set by the resolver for small viewports.
    #[serde(default)]
    pub compact: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            start_year: START_YEAR,
            end_year: END_YEAR,
            year_width: YEAR_WIDTH,
            padding: PADDING,
            timeline_y: TIMELINE_Y,
            edu_y: EDU_Y,
            cert_y: CERT_Y,
            work_y: WORK_Y,
            compact: false,
        }
    }
}

impl LayoutConfig {
    /// Number of year slots on the axis, both ends included.
    pub fn year_count(&self) -> i32 {
        (self.end_year - self.start_year + 1).max(0)
    }

    pub fn timeline_width(&self) -> f64 {
        self.year_count() as f64 * self.year_width
    }

    /// Width of the scrollable content (axis plus trailing room).
    pub fn content_width(&self) -> f64 {
        self.timeline_width() + TRAILING_SPACE
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start_year..=self.end_year
    }
}

/// Year spacing used while the viewport is narrower than `max_width`.
/// `None` closes the table and matches every width.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidthBucket {
    pub max_width: Option<f64>,
    pub year_width: f64,
}

/// Knobs of the responsive resolver. The host page may override any of them
/// with a JSON object; missing fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverSettings {
    /// Viewports narrower than this are compact.
    pub compact_below_width: f64,
    /// Viewports shorter than this are compact.
    pub compact_below_height: f64,
    pub year_width_buckets: Vec<WidthBucket>,
    /// Smallest year spacing handed out, keeps the axis from collapsing.
    pub min_year_width: f64,
    /// Header plus footer allowance subtracted from the window height.
    pub chrome_height: f64,
    /// Height of the header alone; the compact centre line sits below it.
    pub header_height: f64,
    pub compact_spread: f64,
    pub wide_spread: f64,
    /// Trunk position as a fraction of window height on wide viewports.
    pub wide_center_fraction: f64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        ResolverSettings {
            compact_below_width: 768.0,
            compact_below_height: 600.0,
            year_width_buckets: vec![
                WidthBucket {
                    max_width: Some(1024.0),
                    year_width: 280.0,
                },
                WidthBucket {
                    max_width: None,
                    year_width: 360.0,
                },
            ],
            min_year_width: 1.0,
            chrome_height: 200.0,
            header_height: 100.0,
            compact_spread: 0.35,
            wide_spread: 0.22,
            wide_center_fraction: 0.35,
        }
    }
}

impl ResolverSettings {
    pub fn from_json(text: &str) -> Result<ResolverSettings, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Look the year spacing up in the bucket table.
    pub fn year_width_for(&self, width: f64) -> f64 {
        let picked = self
            .year_width_buckets
            .iter()
            .find(|b| b.max_width.is_none_or(|max| width < max))
            .map(|b| b.year_width)
            .unwrap_or(YEAR_WIDTH);
        picked.max(self.min_year_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_dimensions() {
        let cfg = LayoutConfig::default();
        assert_eq!(cfg.year_count(), 13);
        assert_eq!(cfg.timeline_width(), 13.0 * 330.0);
        assert_eq!(cfg.content_width(), 13.0 * 330.0 + 400.0);
        assert_eq!(cfg.years().count(), 13);
    }

    #[test]
    fn bucket_table_lookup() {
        let s = ResolverSettings::default();
        assert_eq!(s.year_width_for(375.0), 280.0);
        assert_eq!(s.year_width_for(1023.9), 280.0);
        assert_eq!(s.year_width_for(1024.0), 360.0);
        assert_eq!(s.year_width_for(2560.0), 360.0);
    }

    #[test]
    fn empty_table_falls_back_to_authored_spacing() {
        let s = ResolverSettings {
            year_width_buckets: Vec::new(),
            ..Default::default()
        };
        assert_eq!(s.year_width_for(800.0), YEAR_WIDTH);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let s = ResolverSettings::from_json(r#"{"wideSpread": 0.3}"#).unwrap();
        assert_eq!(s.wide_spread, 0.3);
        assert_eq!(s.compact_below_width, 768.0);
        assert_eq!(s.year_width_buckets.len(), 2);
        assert!(ResolverSettings::from_json("not json").is_err());
    }
}
