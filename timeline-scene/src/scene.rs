use serde::Serialize;

use timeline_core::geometry::{PathSpec, timeline_paths};
use timeline_core::palette;
use timeline_core::{EventType, LaneProjection, LayoutConfig, Point, Projection, TimelineEvent};

/// Half the node diamond's extent; connectors start past it.
pub const NODE_CLEARANCE: f64 = 15.0;
pub const STRAND_COUNT: usize = 10;

/// One node of the flat view with everything needed to draw it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodePlacement {
    pub id: String,
    pub kind: EventType,
    pub at: Point,
    /// Labels go above nodes sitting on or over the trunk, below otherwise.
    pub above: bool,
    /// Length of the guide line from the node edge to the trunk.
    pub connector: f64,
    pub date_label: String,
    pub title: String,
    pub color: &'static str,
}

impl NodePlacement {
    /// Endpoints of the connector, from the node edge toward the trunk.
    pub fn connector_span(&self) -> (Point, Point) {
        let dir = if self.above { 1.0 } else { -1.0 };
        let start = Point {
            x: self.at.x,
            y: self.at.y + dir * NODE_CLEARANCE,
        };
        let end = Point {
            x: self.at.x,
            y: start.y + dir * self.connector,
        };
        (start, end)
    }
}

/// Faint background line drawn behind the trunk on wide screens.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Strand {
    pub from: Point,
    pub to: Point,
    pub color: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct YearMarker {
    pub year: i32,
    pub x: f64,
}

/// Everything the flat view draws for one layout snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LaneScene {
    pub config: LayoutConfig,
    pub width: f64,
    pub strands: Vec<Strand>,
    pub paths: Vec<PathSpec>,
    pub nodes: Vec<NodePlacement>,
    pub years: Vec<YearMarker>,
}

pub fn place_node(event: &TimelineEvent, at: Point, cfg: &LayoutConfig) -> NodePlacement {
    let above = at.y <= cfg.timeline_y;
    NodePlacement {
        id: event.id.clone(),
        kind: event.type_,
        at,
        above,
        connector: ((at.y - cfg.timeline_y).abs() - NODE_CLEARANCE).max(0.0),
        date_label: event.date_range.clone(),
        title: event.short_title().to_string(),
        color: palette::lane_color(event.type_),
    }
}

fn strands(cfg: &LayoutConfig, width: f64) -> Vec<Strand> {
    (0..STRAND_COUNT)
        .map(|i| {
            let k = i as f64 - 5.0;
            Strand {
                from: Point {
                    x: 0.0,
                    y: cfg.timeline_y + k * 4.0,
                },
                to: Point {
                    x: width,
                    y: cfg.timeline_y + k * 2.0,
                },
                color: if i % 2 == 0 {
                    palette::PURPLE
                } else {
                    palette::BLUE
                },
            }
        })
        .collect()
}

/// Assemble the flat scene. Every number comes from `cfg`, so a scene
/// never mixes two snapshots.
pub fn build_lane_scene(events: &[TimelineEvent], cfg: &LayoutConfig) -> LaneScene {
    let width = cfg.content_width();
    let nodes = LaneProjection { config: *cfg }
        .place(events)
        .into_iter()
        .map(|p| place_node(p.event, p.position, cfg))
        .collect();
    let years = cfg
        .years()
        .map(|year| YearMarker {
            year,
            x: timeline_core::position_x(year as f64, cfg),
        })
        .collect();
    LaneScene {
        config: *cfg,
        width,
        strands: if cfg.compact {
            Vec::new()
        } else {
            strands(cfg, width)
        },
        paths: timeline_paths(cfg),
        nodes,
        years,
    }
}

/// Pointer-drag horizontal panning. The content moves twice as far as the
/// pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragScroll {
    origin: Option<(f64, f64)>,
}

pub const DRAG_GAIN: f64 = 2.0;
/// Distance covered by the arrow buttons.
pub const ARROW_STEP: f64 = 400.0;

impl DragScroll {
    pub fn begin(&mut self, pointer_x: f64, scroll_left: f64) {
        self.origin = Some((pointer_x, scroll_left));
    }

    pub fn is_dragging(&self) -> bool {
        self.origin.is_some()
    }

    /// New scroll offset for the pointer at `pointer_x`, if a drag is active.
    pub fn drag_to(&self, pointer_x: f64) -> Option<f64> {
        let (start_x, start_left) = self.origin?;
        Some(start_left - (pointer_x - start_x) * DRAG_GAIN)
    }

    pub fn end(&mut self) {
        self.origin = None;
    }
}

/// Pixels a press may travel and still count as a click.
pub const CLICK_SLOP: f64 = 4.0;

/// Whether a press from `from` released at `to` is a click rather than a drag.
pub fn is_click(from: (f64, f64), to: (f64, f64)) -> bool {
    (to.0 - from.0).hypot(to.1 - from.1) <= CLICK_SLOP
}

/// Fraction of the horizontal scroll range already travelled, in `[0, 1]`.
pub fn scroll_progress(scroll_left: f64, scroll_width: f64, client_width: f64) -> f64 {
    let range = scroll_width - client_width;
    if range <= 0.0 {
        return 0.0;
    }
    (scroll_left / range).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use timeline_core::{Viewport, dataset, resolve_layout};

    #[test]
    fn scene_covers_every_event_and_year() {
        let cfg = LayoutConfig::default();
        let scene = build_lane_scene(dataset(), &cfg);
        assert_eq!(scene.nodes.len(), dataset().len());
        assert_eq!(scene.years.len(), 13);
        assert_eq!(scene.years[0].x, cfg.padding);
        assert_eq!(scene.width, cfg.timeline_width() + 400.0);
        assert_eq!(scene.paths.len(), 4);
        assert_eq!(scene.strands.len(), STRAND_COUNT);
    }

    #[test]
    fn work_departure_node() {
        let cfg = LayoutConfig::default();
        let scene = build_lane_scene(dataset(), &cfg);
        let n = scene.nodes.iter().find(|n| n.id == "work-2016").unwrap();
        assert_eq!(n.at, Point { x: 860.0, y: 330.0 });
        assert!(!n.above);
        assert_eq!(n.connector, 35.0);
        let (start, end) = n.connector_span();
        assert_eq!(start.y, 315.0);
        assert_eq!(end.y, cfg.timeline_y);
    }

    #[test]
    fn trunk_nodes_have_no_connector() {
        let cfg = LayoutConfig::default();
        let scene = build_lane_scene(dataset(), &cfg);
        let origin = scene.nodes.iter().find(|n| n.id == "base-1").unwrap();
        assert!(origin.above);
        assert_eq!(origin.connector, 0.0);
        let edu = scene.nodes.iter().find(|n| n.id == "edu-2020").unwrap();
        assert!(edu.above);
        assert_eq!(edu.connector, 140.0 - 15.0);
        assert_eq!(edu.color, palette::PURPLE);
    }

    #[test]
    fn compact_scene_drops_strands() {
        let cfg = resolve_layout(Viewport::new(375.0, 700.0), &Default::default());
        let scene = build_lane_scene(dataset(), &cfg);
        assert!(scene.strands.is_empty());
        assert_eq!(scene.config, cfg);
    }

    #[test]
    fn strands_fan_around_trunk() {
        let cfg = LayoutConfig::default();
        let scene = build_lane_scene(&[], &cfg);
        assert_eq!(scene.strands[0].from.y, 280.0 - 20.0);
        assert_eq!(scene.strands[0].to.y, 280.0 - 10.0);
        assert_eq!(scene.strands[9].from.y, 280.0 + 16.0);
        assert_eq!(scene.strands[1].color, palette::BLUE);
        assert!(scene.nodes.is_empty());
    }

    #[test]
    fn scene_serializes_for_the_host() {
        let scene = build_lane_scene(dataset(), &LayoutConfig::default());
        let v = serde_json::to_value(&scene).unwrap();
        assert_eq!(v["nodes"].as_array().map(Vec::len), Some(dataset().len()));
        assert_eq!(v["nodes"][2]["kind"], "work");
        assert_eq!(v["config"]["yearWidth"], 330.0);
    }

    #[test]
    fn drag_scroll_moves_twice_the_pointer() {
        let mut d = DragScroll::default();
        assert_eq!(d.drag_to(10.0), None);
        d.begin(100.0, 500.0);
        assert!(d.is_dragging());
        assert_eq!(d.drag_to(60.0), Some(580.0));
        assert_eq!(d.drag_to(150.0), Some(400.0));
        d.end();
        assert_eq!(d.drag_to(150.0), None);
    }

    #[test]
    fn small_jitter_is_still_a_click() {
        assert!(is_click((10.0, 10.0), (10.0, 10.0)));
        assert!(is_click((10.0, 10.0), (11.0, 9.0)));
        assert!(is_click((0.0, 0.0), (CLICK_SLOP, 0.0)));
        assert!(!is_click((0.0, 0.0), (3.0, 3.0)));
        assert!(!is_click((0.0, 0.0), (-10.0, 0.0)));
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(scroll_progress(0.0, 5000.0, 1000.0), 0.0);
        assert_eq!(scroll_progress(2000.0, 5000.0, 1000.0), 0.5);
        assert_eq!(scroll_progress(9000.0, 5000.0, 1000.0), 1.0);
        assert_eq!(scroll_progress(10.0, 800.0, 1000.0), 0.0);
    }
}
