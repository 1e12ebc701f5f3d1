pub mod error;
pub mod structs;
pub mod time;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use structs::{SensorReading, Zone};
pub use time::{TimeRange, parse_timestamp, resolve_window};
