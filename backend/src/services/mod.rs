//! Business logic services for the Cultivation Planner

pub mod catalog;
pub mod plan;

pub use catalog::{load_catalog, CatalogService, SharedCatalog};
pub use plan::PlanService;
