//! Error taxonomy for the planning calculators
//!
//! Every variant is an input validation failure. None of them is retryable:
//! the caller has to fix the input before recomputing.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the crop catalog and the planning calculators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanningError {
    #[error("Unknown crop: {0}")]
    UnknownCrop(String),

    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(Decimal),

    #[error("Household size must be positive, got {0}")]
    InvalidHouseholdSize(i32),

    #[error("Period must be at least one day, got {0}")]
    InvalidPeriod(i32),

    #[error("Crop {0} is already part of this plan")]
    DuplicateCrop(String),

    #[error("Crop {0} is not part of this plan")]
    CropNotInPlan(String),

    #[error("Invalid crop definition: {0}")]
    InvalidCrop(&'static str),

    #[error("{0} is too large to compute")]
    Overflow(&'static str),
}

impl PlanningError {
    /// Stable machine readable code, shared by the HTTP API and the WASM bindings
    pub fn code(&self) -> &'static str {
        match self {
            PlanningError::UnknownCrop(_) => "UNKNOWN_CROP",
            PlanningError::InvalidQuantity(_) => "INVALID_QUANTITY",
            PlanningError::InvalidHouseholdSize(_) => "INVALID_HOUSEHOLD_SIZE",
            PlanningError::InvalidPeriod(_) => "INVALID_PERIOD",
            PlanningError::DuplicateCrop(_) => "DUPLICATE_CROP",
            PlanningError::CropNotInPlan(_) => "CROP_NOT_IN_PLAN",
            PlanningError::InvalidCrop(_) => "INVALID_CROP",
            PlanningError::Overflow(_) => "CALCULATION_OVERFLOW",
        }
    }
}

/// Result alias for planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            PlanningError::UnknownCrop("x".to_string()),
            PlanningError::InvalidQuantity(Decimal::ZERO),
            PlanningError::InvalidHouseholdSize(0),
            PlanningError::InvalidPeriod(0),
            PlanningError::DuplicateCrop("x".to_string()),
            PlanningError::CropNotInPlan("x".to_string()),
            PlanningError::InvalidCrop("x"),
            PlanningError::Overflow("x"),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PlanningError::UnknownCrop("kiwi".to_string()).to_string(),
            "Unknown crop: kiwi"
        );
        assert_eq!(
            PlanningError::InvalidHouseholdSize(-1).to_string(),
            "Household size must be positive, got -1"
        );
    }
}
