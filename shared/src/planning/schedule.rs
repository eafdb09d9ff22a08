//! Monthly sowing and harvest schedule

use crate::catalog::CropCatalog;
use crate::models::{MonthlyActivity, PlanCropEntry};
use crate::types::MONTHS;

/// Bucket a plan's crops into the months they are sown and harvested.
///
/// Always returns twelve entries, January first. Within a month crops keep
/// the order of their first appearance in `crops`. Entries whose crop is
/// not in the catalog contribute nothing. Empty months are kept; hiding
/// them is up to the caller.
pub fn generate_monthly_activities(
    catalog: &CropCatalog,
    crops: &[PlanCropEntry],
) -> Vec<MonthlyActivity> {
    let mut activities: Vec<MonthlyActivity> =
        MONTHS.iter().map(|month| MonthlyActivity::new(*month)).collect();

    for entry in crops {
        let Ok(crop) = catalog.get(&entry.crop_id) else {
            continue;
        };
        for activity in activities.iter_mut() {
            if crop.sows_in(activity.month) && !activity.sowing_crops.contains(&entry.crop_id) {
                activity.sowing_crops.push(entry.crop_id.clone());
            }
            if crop.harvests_in(activity.month)
                && !activity.harvesting_crops.contains(&entry.crop_id)
            {
                activity.harvesting_crops.push(entry.crop_id.clone());
            }
        }
    }

    activities
}

/// Months with something to sow or harvest
pub fn active_months(activities: &[MonthlyActivity]) -> Vec<&MonthlyActivity> {
    activities.iter().filter(|activity| !activity.is_empty()).collect()
}
