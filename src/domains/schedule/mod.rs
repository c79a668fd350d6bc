pub mod context;
pub mod random_activation;

pub use context::*;
pub use random_activation::*;
