use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::model::EventType;

/// Number of quadratic pieces in the trunk.
pub const TRUNK_SEGMENTS: usize = 24;
/// Vertical wobble of the trunk in layout units.
pub const TRUNK_AMPLITUDE: f64 = 3.0;
/// Offset below the trunk where the work branch leaves it.
pub const WORK_DEPARTURE_DROP: f64 = 50.0;

/// Basic two dimensional point in layout space (y grows downwards).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

/// Horizontal position of a (possibly fractional) year. Not clamped to the
/// configured range; decorations outside the axis rely on extrapolation.
pub fn position_x(year: f64, cfg: &LayoutConfig) -> f64 {
    (year - cfg.start_year as f64) * cfg.year_width + cfg.padding
}

/// Where an override puts a node, relative to the snapshot's lines.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Anchor {
    Trunk,
    BelowTrunk(f64),
    TrunkWorkMidpoint,
}

// Hand-placed handoff points where a branch leaves or rejoins the trunk.
// Design content: these years are tied to the bundled history.
const LANE_OVERRIDES: &[(EventType, f64, Anchor)] = &[
    (EventType::Education, 1995.0, Anchor::Trunk),
    (EventType::Education, 2023.0, Anchor::Trunk),
    (EventType::Work, 2016.0, Anchor::BelowTrunk(WORK_DEPARTURE_DROP)),
    (EventType::Work, 2017.0, Anchor::TrunkWorkMidpoint),
];

/// Resting line of a category when no override applies.
pub fn lane_y(kind: EventType, cfg: &LayoutConfig) -> f64 {
    match kind {
        EventType::Education => cfg.edu_y,
        EventType::Cert => cfg.cert_y,
        EventType::Work | EventType::Unknown => cfg.work_y,
    }
}

/// Vertical position of an event of `kind` placed at `year`.
pub fn position_y(kind: EventType, year: f64, cfg: &LayoutConfig) -> f64 {
    let hit = LANE_OVERRIDES
        .iter()
        .find(|(k, y, _)| *k == kind && *y == year)
        .map(|(_, _, a)| *a);
    match hit {
        Some(Anchor::Trunk) => cfg.timeline_y,
        Some(Anchor::BelowTrunk(d)) => cfg.timeline_y + d,
        Some(Anchor::TrunkWorkMidpoint) => (cfg.timeline_y + cfg.work_y) / 2.0,
        None => lane_y(kind, cfg),
    }
}

pub fn position(kind: EventType, year: f64, cfg: &LayoutConfig) -> Point {
    Point {
        x: position_x(year, cfg),
        y: position_y(kind, year, cfg),
    }
}

/// Wavy horizontal trunk spanning `width`, as an SVG path.
///
/// Starts at `(0, timeline_y)` and is made of exactly [`TRUNK_SEGMENTS`]
/// quadratic pieces. The sine wobble is decorative; the control point of
/// piece `i` sits halfway along it at the previous boundary's offset.
pub fn main_trunk_path(width: f64, cfg: &LayoutConfig) -> String {
    let ty = cfg.timeline_y;
    let mut d = format!("M 0 {}", ty);
    let seg = width / TRUNK_SEGMENTS as f64;
    for i in 1..=TRUNK_SEGMENTS {
        let x = i as f64 * seg;
        let y = ty + (i as f64).sin() * TRUNK_AMPLITUDE;
        let cx = x - seg / 2.0;
        let cy = ty + ((i - 1) as f64).sin() * TRUNK_AMPLITUDE;
        let _ = write!(d, " Q {} {}, {} {}", cx, cy, x, y);
    }
    d
}

/// Horizontal positions in a branch are given as years.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BranchYear {
    At(f64),
    /// The snapshot's `end_year`.
    End,
}

/// Vertical level a branch step refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Trunk,
    Edu,
    Cert,
    Work,
}

impl Level {
    fn resolve(self, cfg: &LayoutConfig) -> f64 {
        match self {
            Level::Trunk => cfg.timeline_y,
            Level::Edu => cfg.edu_y,
            Level::Cert => cfg.cert_y,
            Level::Work => cfg.work_y,
        }
    }
}

impl BranchYear {
    fn resolve(self, cfg: &LayoutConfig) -> f64 {
        match self {
            BranchYear::At(y) => y,
            BranchYear::End => cfg.end_year as f64,
        }
    }
}

pub type Knot = (BranchYear, Level);

/// One drawing command of an authored branch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BranchStep {
    Move(Knot),
    Line(Knot),
    /// Cubic curve: two control knots then the end knot.
    Curve(Knot, Knot, Knot),
}

/// Stroke settings for a connective line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f64,
    pub opacity: f64,
}

/// An authored category branch: breakpoints plus stroke.
#[derive(Clone, Copy, Debug)]
pub struct BranchSpec {
    pub kind: EventType,
    pub stroke: Stroke,
    pub steps: &'static [BranchStep],
}

pub const TRUNK_STROKE: Stroke = Stroke {
    color: "#8b5cf6",
    width: 6.0,
    opacity: 0.8,
};

const fn at(year: f64, level: Level) -> Knot {
    (BranchYear::At(year), level)
}

/// Branch breakpoints, in drawing order. These are authored curves rather
/// than anything derived from the dataset.
pub const BRANCHES: &[BranchSpec] = &[
    BranchSpec {
        kind: EventType::Education,
        stroke: Stroke {
            color: "#a78bfa",
            width: 2.0,
            opacity: 0.5,
        },
        steps: &[
            BranchStep::Move(at(2014.0, Level::Trunk)),
            BranchStep::Curve(
                at(2015.0, Level::Trunk),
                at(2015.0, Level::Edu),
                at(2016.0, Level::Edu),
            ),
            BranchStep::Line(at(2023.0, Level::Edu)),
            BranchStep::Curve(
                at(2023.5, Level::Edu),
                at(2023.8, Level::Trunk),
                at(2024.0, Level::Trunk),
            ),
        ],
    },
    BranchSpec {
        kind: EventType::Cert,
        stroke: Stroke {
            color: "#06b6d4",
            width: 2.0,
            opacity: 0.4,
        },
        steps: &[
            BranchStep::Move(at(2024.5, Level::Trunk)),
            BranchStep::Curve(
                at(2024.7, Level::Trunk),
                at(2024.8, Level::Cert),
                at(2025.0, Level::Cert),
            ),
            BranchStep::Line(at(2026.0, Level::Cert)),
        ],
    },
    BranchSpec {
        kind: EventType::Work,
        stroke: Stroke {
            color: "#3b82f6",
            width: 2.0,
            opacity: 0.5,
        },
        steps: &[
            BranchStep::Move(at(2016.0, Level::Trunk)),
            BranchStep::Curve(
                at(2017.0, Level::Trunk),
                at(2017.0, Level::Work),
                at(2018.0, Level::Work),
            ),
            BranchStep::Line((BranchYear::End, Level::Work)),
        ],
    },
];

fn knot_xy(k: Knot, cfg: &LayoutConfig) -> (f64, f64) {
    (position_x(k.0.resolve(cfg), cfg), k.1.resolve(cfg))
}

/// Render a branch's breakpoints against a snapshot as an SVG path.
pub fn branch_path(spec: &BranchSpec, cfg: &LayoutConfig) -> String {
    let mut d = String::new();
    for step in spec.steps {
        if !d.is_empty() {
            d.push(' ');
        }
        match *step {
            BranchStep::Move(k) => {
                let (x, y) = knot_xy(k, cfg);
                let _ = write!(d, "M {} {}", x, y);
            }
            BranchStep::Line(k) => {
                let (x, y) = knot_xy(k, cfg);
                let _ = write!(d, "L {} {}", x, y);
            }
            BranchStep::Curve(c1, c2, k) => {
                let (x1, y1) = knot_xy(c1, cfg);
                let (x2, y2) = knot_xy(c2, cfg);
                let (x, y) = knot_xy(k, cfg);
                let _ = write!(d, "C {} {}, {} {}, {} {}", x1, y1, x2, y2, x, y);
            }
        }
    }
    d
}

/// A finished connective line ready for the view layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathSpec {
    pub d: String,
    pub stroke: Stroke,
}

/// Trunk first, then every branch, all from one snapshot.
pub fn timeline_paths(cfg: &LayoutConfig) -> Vec<PathSpec> {
    let mut out = Vec::with_capacity(BRANCHES.len() + 1);
    out.push(PathSpec {
        d: main_trunk_path(cfg.timeline_width(), cfg),
        stroke: TRUNK_STROKE,
    });
    for b in BRANCHES {
        out.push(PathSpec {
            d: branch_path(b, cfg),
            stroke: b.stroke,
        });
    }
    out
}
