pub mod bbox;
pub mod features;
pub mod geo_space;
pub mod ports;

pub use bbox::*;
pub use features::*;
pub use geo_space::*;
pub use ports::*;
