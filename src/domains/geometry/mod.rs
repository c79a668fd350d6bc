pub mod geo_shape;
pub mod shape;

pub use geo_shape::*;
pub use shape::*;
