pub mod analysis;
pub mod palette;
pub mod splitter;

pub use analysis::{analyze_steps, determine_tracking_mode, RouteAnalysis, TrackingMode};
pub use palette::{ColorKey, RoutePalette, StrokeStyle};
pub use splitter::{
    fallback_ranges, PolylineSegment, RenderPlan, RenderStrategy, RouteGeometrySplitter,
};
