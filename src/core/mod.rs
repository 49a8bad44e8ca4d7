pub mod profile;
pub mod stats;
pub mod transform;
