pub mod error;
pub mod snapshot;

pub use error::*;
pub use snapshot::*;
