//! Dataset, layout snapshots and the pure geometry behind the timeline views.

pub mod config;
pub mod data;
pub mod geometry;
pub mod model;
pub mod palette;
pub mod projection;
pub mod responsive;

pub use config::{LayoutConfig, ResolverSettings};
pub use data::dataset;
pub use geometry::{Point, main_trunk_path, position_x, position_y};
pub use model::{EventType, TimelineEvent};
pub use projection::{LaneProjection, Placed, Projection, SphereProjection, Vec3};
pub use responsive::{LayoutPublisher, SubscriptionId, Viewport, resolve_layout};
