pub mod types;
pub mod registry;

pub use types::{is_known_room, status_options, RoomStatus, StatusCode, OCCUPANCY_BOUNDS, ROOMS};
pub use registry::RoomRegistry;
