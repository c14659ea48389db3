//! Event placement strategies.
//!
//! The flat view uses lanes with authored breakpoints, the orbital view
//! spreads events over spherical zones along a spiral. They deliberately do
//! not share math; they only share the [`Projection`] interface.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::data::sorted_by_year;
use crate::geometry::{self, Point};
use crate::model::{EventType, TimelineEvent};

/// An event together with where a projection put it.
#[derive(Clone, Debug, PartialEq)]
pub struct Placed<'a, P> {
    pub event: &'a TimelineEvent,
    pub position: P,
}

/// Maps a whole event list to positions in the projection's space.
///
/// Takes the full list because some strategies depend on an event's rank,
/// not only on its own fields.
pub trait Projection {
    type Position;

    fn place<'a>(&self, events: &'a [TimelineEvent]) -> Vec<Placed<'a, Self::Position>>;
}

/// Flat lanes driven by one layout snapshot.
#[derive(Clone, Copy, Debug)]
pub struct LaneProjection {
    pub config: LayoutConfig,
}

impl Projection for LaneProjection {
    type Position = Point;

    /// Keeps dataset order.
    fn place<'a>(&self, events: &'a [TimelineEvent]) -> Vec<Placed<'a, Point>> {
        events
            .iter()
            .map(|e| Placed {
                event: e,
                position: geometry::position(e.type_, e.year, &self.config),
            })
            .collect()
    }
}

/// Point in world space of the orbital view (y up).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn lerp(self, to: Vec3, t: f64) -> Vec3 {
        Vec3 {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
            z: self.z + (to.z - self.z) * t,
        }
    }

    /// Same direction at length `len`; the zero vector stays zero.
    pub fn with_length(self, len: f64) -> Vec3 {
        let l = self.length();
        if l == 0.0 {
            return self;
        }
        let k = len / l;
        Vec3::new(self.x * k, self.y * k, self.z * k)
    }
}

pub const SPHERE_RADIUS: f64 = 8.0;
/// Gap between the globe surface and the nodes/beads laid on it.
pub const SURFACE_LIFT: f64 = 0.1;
pub const SPHERE_START_YEAR: i32 = 1995;
pub const SPHERE_END_YEAR: i32 = 2026;
/// Subdivisions of each step between two branch points; a step yields one
/// more sample than this, both ends included.
pub const BEADS_PER_STEP: usize = 15;

/// Latitude band of a category: education north, certs on the equator,
/// work south.
pub fn zone_offset(kind: EventType) -> f64 {
    match kind {
        EventType::Education => 0.5,
        EventType::Work => -0.5,
        EventType::Cert | EventType::Unknown => 0.0,
    }
}

/// Spiral placement on a globe. Events are ranked by year and each one's
/// longitude advances with both time and rank.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereProjection {
    pub radius: f64,
    pub start_year: i32,
    pub end_year: i32,
}

impl Default for SphereProjection {
    fn default() -> Self {
        SphereProjection {
            radius: SPHERE_RADIUS,
            start_year: SPHERE_START_YEAR,
            end_year: SPHERE_END_YEAR,
        }
    }
}

impl SphereProjection {
    fn total_years(&self) -> f64 {
        (self.end_year - self.start_year + 1) as f64
    }

    /// Position of the event ranked `rank` (0-based, by year).
    pub fn point_for(&self, kind: EventType, year: f64, rank: usize) -> Vec3 {
        let t = (year - self.start_year as f64) / self.total_years();
        let phi = t * PI * 4.0 + rank as f64 * 0.2;
        // the time drift can push the argument past the poles
        let theta = (zone_offset(kind) + (t * PI).sin() * 0.3).clamp(-1.0, 1.0).acos();
        let rho = self.radius + SURFACE_LIFT;
        Vec3::new(
            rho * theta.sin() * phi.cos(),
            rho * theta.cos(),
            rho * theta.sin() * phi.sin(),
        )
    }
}

impl Projection for SphereProjection {
    type Position = Vec3;

    /// Output is in year order, not dataset order.
    fn place<'a>(&self, events: &'a [TimelineEvent]) -> Vec<Placed<'a, Vec3>> {
        sorted_by_year(events)
            .into_iter()
            .enumerate()
            .map(|(i, e)| Placed {
                event: e,
                position: self.point_for(e.type_, e.year, i),
            })
            .collect()
    }
}

/// Drawing order of the orbital strands.
pub const STRAND_ORDER: [EventType; 3] = [EventType::Education, EventType::Work, EventType::Cert];

/// One category strand on the globe: its knots and the beads between them.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereBranch {
    pub kind: EventType,
    pub knots: Vec<Vec3>,
    pub beads: Vec<Vec3>,
}

/// Walk consecutive knots, sampling each step and pushing the samples back
/// onto the surface at `radius + SURFACE_LIFT`.
pub fn surface_beads(knots: &[Vec3], radius: f64) -> Vec<Vec3> {
    if knots.len() < 2 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity((knots.len() - 1) * (BEADS_PER_STEP + 1));
    for pair in knots.windows(2) {
        for j in 0..=BEADS_PER_STEP {
            let t = j as f64 / BEADS_PER_STEP as f64;
            out.push(pair[0].lerp(pair[1], t).with_length(radius + SURFACE_LIFT));
        }
    }
    out
}

/// Strands rooted at the earliest event. Categories with nothing to connect
/// are left out.
pub fn sphere_branches(placed: &[Placed<'_, Vec3>], radius: f64) -> Vec<SphereBranch> {
    let root = placed
        .iter()
        .min_by(|a, b| a.event.year.total_cmp(&b.event.year))
        .map(|p| p.position);
    let mut out = Vec::new();
    for kind in STRAND_ORDER {
        let mut members: Vec<&Placed<'_, Vec3>> =
            placed.iter().filter(|p| p.event.type_ == kind).collect();
        members.sort_by(|a, b| a.event.year.total_cmp(&b.event.year));
        let mut knots: Vec<Vec3> = Vec::with_capacity(members.len() + 1);
        knots.extend(root);
        knots.extend(members.iter().map(|p| p.position));
        if knots.len() > 1 {
            let beads = surface_beads(&knots, radius);
            out.push(SphereBranch { kind, knots, beads });
        }
    }
    out
}

/// A circle on the globe used as a visual guide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GuideRing {
    /// Horizontal ring at height `y` with radius `r`.
    Latitude { y: f64, r: f64 },
    /// Great circle through the poles rotated by `angle` around the y axis.
    Meridian { angle: f64 },
}

/// Zone rings plus four meridian ribs.
pub fn guide_rings(radius: f64) -> Vec<GuideRing> {
    let mut out: Vec<GuideRing> = [-0.5f64, 0.0, 0.5]
        .iter()
        .map(|&k| GuideRing::Latitude {
            y: radius * k,
            r: radius * (1.0 - k * k).sqrt(),
        })
        .collect();
    for angle in [0.0, PI / 4.0, PI / 2.0, PI * 0.75] {
        out.push(GuideRing::Meridian { angle });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn lane_projection_uses_geometry_engine() {
        let cfg = LayoutConfig::default();
        let placed = LaneProjection { config: cfg }.place(dataset());
        assert_eq!(placed.len(), dataset().len());
        let work = placed.iter().find(|p| p.event.id == "work-2016").unwrap();
        assert_eq!(work.position, Point { x: 860.0, y: 330.0 });
        let origin = placed.iter().find(|p| p.event.id == "base-1").unwrap();
        assert_eq!(origin.position.y, cfg.timeline_y);
    }

    #[test]
    fn sphere_points_sit_on_lifted_surface() {
        let proj = SphereProjection::default();
        for p in proj.place(dataset()) {
            assert!(close(p.position.length(), SPHERE_RADIUS + SURFACE_LIFT));
        }
    }

    #[test]
    fn sphere_origin_event() {
        // t = 0, rank 0: phi = 0, theta = acos(0.5)
        let p = SphereProjection::default().point_for(EventType::Education, 1995.0, 0);
        let rho = SPHERE_RADIUS + SURFACE_LIFT;
        assert!(close(p.y, rho * 0.5));
        assert!(close(p.z, 0.0));
        assert!(close(p.x, rho * (0.5f64).acos().sin()));
    }

    #[test]
    fn zones_split_hemispheres() {
        let proj = SphereProjection::default();
        let placed = proj.place(dataset());
        for p in &placed {
            match p.event.type_ {
                EventType::Education => assert!(p.position.y > 0.0),
                EventType::Work => assert!(p.position.y < 0.0),
                _ => assert!(p.position.y >= 0.0),
            }
        }
    }

    #[test]
    fn sphere_ranks_follow_year() {
        let placed = SphereProjection::default().place(dataset());
        for w in placed.windows(2) {
            assert!(w[0].event.year <= w[1].event.year);
        }
    }

    #[test]
    fn branches_share_the_root() {
        let proj = SphereProjection::default();
        let placed = proj.place(dataset());
        let branches = sphere_branches(&placed, proj.radius);
        assert_eq!(branches.len(), 3);
        let root = placed[0].position;
        for b in &branches {
            assert_eq!(b.knots[0], root);
            assert_eq!(b.beads.len(), (b.knots.len() - 1) * (BEADS_PER_STEP + 1));
        }
        // education: root + 5 education events (origin included twice)
        assert_eq!(branches[0].kind, EventType::Education);
        assert_eq!(branches[0].knots.len(), 6);
        assert_eq!(branches[2].kind, EventType::Cert);
        assert_eq!(branches[2].knots.len(), 3);
    }

    #[test]
    fn single_event_has_no_strands() {
        let events = &dataset()[..1];
        let placed = SphereProjection::default().place(events);
        let branches = sphere_branches(&placed, SPHERE_RADIUS);
        // only education has a member, and root + itself still makes two knots
        assert_eq!(branches.len(), 1);
        assert!(sphere_branches(&[], SPHERE_RADIUS).is_empty());
    }

    #[test]
    fn beads_are_on_surface() {
        let a = Vec3::new(8.1, 0.0, 0.0);
        let b = Vec3::new(0.0, 0.0, 8.1);
        let beads = surface_beads(&[a, b], SPHERE_RADIUS);
        assert_eq!(beads.len(), BEADS_PER_STEP + 1);
        assert_eq!(beads[0], a);
        for p in beads {
            assert!(close(p.length(), 8.1));
        }
        assert!(surface_beads(&[a], SPHERE_RADIUS).is_empty());
    }

    #[test]
    fn guide_ring_layout() {
        let rings = guide_rings(8.0);
        assert_eq!(rings.len(), 7);
        assert_eq!(rings[1], GuideRing::Latitude { y: 0.0, r: 8.0 });
        match rings[2] {
            GuideRing::Latitude { y, r } => {
                assert_eq!(y, 4.0);
                assert!(close(r, 8.0 * 0.75f64.sqrt()));
            }
            _ => panic!("expected latitude ring"),
        }
    }
}
