//! Yield estimation

use rust_decimal::Decimal;

use crate::catalog::CropCatalog;
use crate::error::{PlanningError, PlanningResult};

/// Expected harvest mass in kg: `quantity x yield_per_plant_kg`.
///
/// Not rounded; presentation layers round for display. A product beyond
/// the range of `Decimal` is reported as `Overflow`.
pub fn estimate_yield(
    catalog: &CropCatalog,
    crop_id: &str,
    quantity: Decimal,
) -> PlanningResult<Decimal> {
    if quantity <= Decimal::ZERO {
        return Err(PlanningError::InvalidQuantity(quantity));
    }
    let crop = catalog.get(crop_id)?;
    quantity
        .checked_mul(crop.yield_per_plant_kg)
        .ok_or(PlanningError::Overflow("Estimated yield"))
}
