//! User-facing strings: mode labels, progress and milestone notices, route cards.
//!
//! Everything here is a pure lookup or format over values produced elsewhere.

pub mod labels;
pub mod messages;
pub mod route_info;

pub use labels::{describe_detection, mode_icon, mode_text, DetectionDisplay};
pub use messages::{
    completion_message, encouragement_message, format_elapsed, is_valid_trip_id,
    milestone_message,
};
pub use route_info::{RouteInfoFormatter, RouteInfoTexts};
