pub mod mode;
pub mod route;
pub mod segment;
pub mod trip;

pub use mode::{is_green_dict_mode, normalize_dict_mode, TransportMode};
pub use route::{GeoPoint, RecommendedRoute, RouteAlternative, RouteStep, TransitDetails};
pub use segment::{ModeSegment, TransportModeSegment};
pub use trip::{LocationUpdate, ModePrediction, TripCompletionData};
