//! Shared types and calculators for the Cultivation Planner
//!
//! This crate contains the crop catalog, the planning calculators and the
//! models shared between the backend, the frontend (via WASM) and tests.

pub mod catalog;
pub mod error;
pub mod models;
pub mod planning;
pub mod types;
pub mod validation;

pub use catalog::*;
pub use error::*;
pub use models::*;
pub use planning::*;
pub use types::*;
pub use validation::*;
