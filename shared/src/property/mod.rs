mod error;
mod property_group;
mod property_tracker;

pub use error::PropertyError;
pub use property_group::{ArrayPropertyGroup, PropertyGroup, SharedPropertyGroup};
pub use property_tracker::{PropertyHandle, PropertyTracker};
