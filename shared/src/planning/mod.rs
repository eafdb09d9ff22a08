//! Planning calculators
//!
//! Pure, deterministic functions over a [`CropCatalog`](crate::CropCatalog).
//! They hold no state and are safe to call concurrently.

mod nutrition;
mod schedule;
mod yield_estimate;

pub use nutrition::*;
pub use schedule::*;
pub use yield_estimate::*;
