pub mod correlate;
pub mod mass;
pub mod normalize;
pub mod select;
