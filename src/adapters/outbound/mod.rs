pub mod feature_data;
pub mod loggers;

pub use feature_data::*;
pub use loggers::*;
