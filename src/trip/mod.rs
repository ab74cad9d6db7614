pub mod completion;
pub mod controller;
pub mod events;
pub mod state;

pub use completion::assemble_completion;
pub use controller::TripController;
pub use events::{
    MilestoneEvent, ModeDetectedEvent, ProgressEvent, RoutePlan, StateChangedEvent,
    TripCompletedEvent, TripEvent, TripStarted,
};
pub use state::{LocationOutcome, TripSession, TripSnapshot, TripStatus, DEFAULT_USER_MODE};
