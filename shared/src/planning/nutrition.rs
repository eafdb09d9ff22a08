//! Nutrition aggregation

use rust_decimal::{Decimal, RoundingStrategy};

use crate::catalog::CropCatalog;
use crate::error::{PlanningError, PlanningResult};
use crate::models::{CropNutrition, NutritionSummary, PlanCropEntry};
use crate::types::DAILY_KCAL_PER_PERSON;

/// Total caloric output of a plan's crops and its share of what the
/// household needs over `period_days`.
///
/// Uses the yield stored on each entry, not a fresh estimate. The
/// percentage is rounded half away from zero and never clamped. Totals
/// beyond the range of `Decimal` are reported as `Overflow`.
pub fn summarize_nutrition(
    catalog: &CropCatalog,
    crops: &[PlanCropEntry],
    household_size: i32,
    period_days: i32,
) -> PlanningResult<NutritionSummary> {
    if household_size <= 0 {
        return Err(PlanningError::InvalidHouseholdSize(household_size));
    }
    if period_days <= 0 {
        return Err(PlanningError::InvalidPeriod(period_days));
    }

    let per_crop = crops
        .iter()
        .map(|entry| {
            let crop = catalog.get(&entry.crop_id)?;
            let kcal = crop
                .kcal_per_kg
                .checked_mul(entry.estimated_yield_kg)
                .ok_or(PlanningError::Overflow("Crop calories"))?;
            Ok(CropNutrition {
                crop_id: entry.crop_id.clone(),
                estimated_yield_kg: entry.estimated_yield_kg,
                kcal,
            })
        })
        .collect::<PlanningResult<Vec<_>>>()?;

    let total_kcal = per_crop
        .iter()
        .try_fold(Decimal::ZERO, |total, c| total.checked_add(c.kcal))
        .ok_or(PlanningError::Overflow("Total calories"))?;
    let target_kcal_per_day = Decimal::from(household_size)
        .checked_mul(Decimal::from(DAILY_KCAL_PER_PERSON))
        .ok_or(PlanningError::Overflow("Daily target"))?;
    let period_target = target_kcal_per_day
        .checked_mul(Decimal::from(period_days))
        .ok_or(PlanningError::Overflow("Period target"))?;

    let percent_of_target = total_kcal
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(period_target))
        .ok_or(PlanningError::Overflow("Percent of target"))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let days_covered = total_kcal
        .checked_div(target_kcal_per_day)
        .ok_or(PlanningError::Overflow("Days covered"))?
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

    Ok(NutritionSummary {
        total_kcal,
        target_kcal_per_day,
        percent_of_target,
        days_covered,
        household_size,
        period_days,
        per_crop,
    })
}
