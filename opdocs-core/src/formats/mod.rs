//! Table format implementations

pub mod json;
pub mod kotlin;

pub use json::JsonTable;
pub use kotlin::KotlinScatterMap;
