pub mod allocation;
pub mod tracker;

pub use allocation::allocate_by_duration;
pub use tracker::{ModeSegmentTracker, SegmentChange};
