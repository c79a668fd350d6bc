pub mod collector;
pub mod lifecycle;

pub use collector::*;
pub use lifecycle::*;
