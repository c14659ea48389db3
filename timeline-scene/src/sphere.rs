use std::f64::consts::{FRAC_PI_2, TAU};

use timeline_core::palette;
use timeline_core::projection::{GuideRing, guide_rings, sphere_branches};
use timeline_core::{EventType, Projection, SphereProjection, TimelineEvent, Vec3};

#[derive(Clone, Debug, PartialEq)]
pub struct SphereNode {
    pub id: String,
    pub kind: EventType,
    pub position: Vec3,
    pub color: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bead {
    pub position: Vec3,
    /// Every third bead glows brighter.
    pub bright: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SphereStrand {
    pub kind: EventType,
    pub color: &'static str,
    pub beads: Vec<Bead>,
}

/// Everything the orbital view draws; independent of the camera.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereScene {
    pub radius: f64,
    pub nodes: Vec<SphereNode>,
    pub strands: Vec<SphereStrand>,
    pub guides: Vec<GuideRing>,
}

pub fn build_sphere_scene(events: &[TimelineEvent], proj: &SphereProjection) -> SphereScene {
    let placed = proj.place(events);
    let nodes = placed
        .iter()
        .map(|p| SphereNode {
            id: p.event.id.clone(),
            kind: p.event.type_,
            position: p.position,
            color: palette::orbital_color(p.event.type_),
        })
        .collect();
    let strands = sphere_branches(&placed, proj.radius)
        .into_iter()
        .map(|b| SphereStrand {
            kind: b.kind,
            color: palette::orbital_color(b.kind),
            beads: b
                .beads
                .into_iter()
                .enumerate()
                .map(|(i, position)| Bead {
                    position,
                    bright: i % 3 == 0,
                })
                .collect(),
        })
        .collect();
    SphereScene {
        radius: proj.radius,
        nodes,
        strands,
        guides: guide_rings(proj.radius),
    }
}

/// Sample a guide ring as a closed polyline of `segments` points.
pub fn ring_points(ring: GuideRing, radius: f64, segments: usize) -> Vec<Vec3> {
    let n = segments.max(3);
    (0..n)
        .map(|i| {
            let a = TAU * i as f64 / n as f64;
            match ring {
                GuideRing::Latitude { y, r } => Vec3::new(r * a.cos(), y, r * a.sin()),
                GuideRing::Meridian { angle } => {
                    // circle in the xy plane turned about the y axis
                    let x = radius * a.cos();
                    let y = radius * a.sin();
                    Vec3::new(x * angle.cos(), y, -x * angle.sin())
                }
            }
        })
        .collect()
}

pub const MIN_DISTANCE: f64 = 12.0;
pub const MAX_DISTANCE: f64 = 35.0;
pub const AUTO_ROTATE_SPEED: f64 = 0.15;
const PITCH_LIMIT: f64 = FRAC_PI_2 - 0.05;
const NEAR: f64 = 0.1;
const DRAG_RADIANS_PER_PX: f64 = 0.005;

/// Where a world point landed on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    /// Distance along the view axis; larger is further away.
    pub depth: f64,
    /// Pixels per world unit at this depth.
    pub scale: f64,
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x - b.x, a.y - b.y, a.z - b.z)
}

/// Perspective camera orbiting the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f64,
    pub pitch: f64,
    pub distance: f64,
    /// Vertical field of view in degrees.
    pub fov: f64,
    pub auto_rotate: bool,
}

impl Default for OrbitCamera {
    /// Looking at the origin from (18, 18, 18).
    fn default() -> Self {
        OrbitCamera::looking_from(Vec3::new(18.0, 18.0, 18.0), 40.0)
    }
}

impl OrbitCamera {
    pub fn looking_from(eye: Vec3, fov: f64) -> Self {
        let distance = eye.length();
        let pitch = if distance > 0.0 {
            (eye.y / distance).clamp(-1.0, 1.0).asin()
        } else {
            0.0
        };
        OrbitCamera {
            yaw: eye.x.atan2(eye.z),
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
            fov,
            auto_rotate: true,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let horiz = self.distance * self.pitch.cos();
        Vec3::new(
            horiz * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            horiz * self.yaw.cos(),
        )
    }

    /// Idle spin; `dt` in seconds.
    pub fn advance(&mut self, dt: f64) {
        if self.auto_rotate {
            self.yaw = (self.yaw + TAU / 60.0 * AUTO_ROTATE_SPEED * dt).rem_euclid(TAU);
        }
    }

    /// Orbit by a pointer drag of (`dx`, `dy`) pixels.
    pub fn rotate_by(&mut self, dx: f64, dy: f64) {
        self.yaw = (self.yaw - dx * DRAG_RADIANS_PER_PX).rem_euclid(TAU);
        self.pitch = (self.pitch + dy * DRAG_RADIANS_PER_PX).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Scale the orbit distance; `factor > 1` moves away.
    pub fn zoom_by(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        }
    }

    /// Project `p` onto a `width`×`height` surface. `None` behind the camera.
    pub fn project(&self, p: Vec3, width: f64, height: f64) -> Option<ScreenPoint> {
        let eye = self.eye();
        let forward = sub(Vec3::default(), eye).with_length(1.0);
        let right = cross(forward, Vec3::new(0.0, 1.0, 0.0)).with_length(1.0);
        let up = cross(right, forward);
        let v = sub(p, eye);
        let depth = dot(v, forward);
        if depth <= NEAR {
            return None;
        }
        let focal = (height / 2.0) / (self.fov.to_radians() / 2.0).tan();
        let scale = focal / depth;
        Some(ScreenPoint {
            x: width / 2.0 + dot(v, right) * scale,
            y: height / 2.0 - dot(v, up) * scale,
            depth,
            scale,
        })
    }

    /// Node under the pointer, if any lies within `radius` pixels.
    pub fn pick<'a>(
        &self,
        nodes: &'a [SphereNode],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
    ) -> Option<&'a SphereNode> {
        nodes
            .iter()
            .filter_map(|n| {
                let sp = self.project(n.position, width, height)?;
                let d = ((sp.x - x).powi(2) + (sp.y - y).powi(2)).sqrt();
                (d <= radius).then_some((n, d, sp.depth))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.2.total_cmp(&b.2)))
            .map(|(n, _, _)| n)
    }
}

/// Size multiplier of a node's idle pulse, phase-shifted by its year.
pub fn pulse(elapsed: f64, year: f64) -> f64 {
    1.1 + (elapsed * 1.5 + year).sin() * 0.1
}
