pub mod entity;
pub mod geometry;
pub mod logger;
pub mod model;
pub mod schedule;
pub mod schelling;
pub mod space;

pub use entity::*;
pub use geometry::*;
pub use logger::*;
pub use model::*;
pub use schedule::*;
pub use schelling::*;
pub use space::*;
