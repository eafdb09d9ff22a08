//! HTTP handlers

pub mod crop;
pub mod health;
pub mod plan;

pub use crop::*;
pub use health::*;
pub use plan::*;
