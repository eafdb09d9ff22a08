//! Domain models for the cultivation planner

mod crop;
mod plan;
mod projection;

pub use crop::*;
pub use plan::*;
pub use projection::*;
