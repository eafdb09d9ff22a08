//! Derived plan projections. Never persisted, recomputed on read.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::month_name;

/// Caloric output of a plan against a household's need
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutritionSummary {
    pub total_kcal: Decimal,
    pub target_kcal_per_day: Decimal,
    /// Rounded to whole percent, not clamped
    pub percent_of_target: Decimal,
    /// Days the harvest would feed the household, one decimal
    pub days_covered: Decimal,
    pub household_size: i32,
    pub period_days: i32,
    pub per_crop: Vec<CropNutrition>,
}

/// Contribution of one plan entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropNutrition {
    pub crop_id: String,
    pub estimated_yield_kg: Decimal,
    pub kcal: Decimal,
}

/// Sowing and harvesting crops for one calendar month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyActivity {
    /// 1 = January
    pub month: u32,
    pub sowing_crops: Vec<String>,
    pub harvesting_crops: Vec<String>,
}

impl MonthlyActivity {
    pub fn new(month: u32) -> Self {
        Self {
            month,
            sowing_crops: Vec::new(),
            harvesting_crops: Vec::new(),
        }
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month).unwrap_or("Unknown")
    }

    /// Nothing to sow or harvest this month
    pub fn is_empty(&self) -> bool {
        self.sowing_crops.is_empty() && self.harvesting_crops.is_empty()
    }
}
