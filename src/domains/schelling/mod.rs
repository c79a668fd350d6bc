pub mod segregation_agent;
pub mod segregation_model;

pub use segregation_agent::*;
pub use segregation_model::*;
