pub mod agent;
pub mod ids;
pub mod patch;
pub mod view;

pub use agent::*;
pub use ids::*;
pub use patch::*;
pub use view::*;
