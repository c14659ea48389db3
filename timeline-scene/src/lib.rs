pub mod chrome;
pub mod details;
pub mod scene;
pub mod sphere;
pub mod svg;

pub use chrome::{SummaryPanel, ViewMode, needs_rotation};
pub use details::{EventDetails, Selection, tooltip_lines};
pub use scene::{
    DragScroll, LaneScene, NodePlacement, build_lane_scene, is_click, scroll_progress,
};
pub use sphere::{OrbitCamera, SphereScene, build_sphere_scene};
pub use svg::{build_timeline_svg, svg_escape};
