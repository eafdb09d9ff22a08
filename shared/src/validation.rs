//! Validation utilities for plan and crop input

/// Longest accepted plan name, in characters
pub const MAX_PLAN_NAME_LEN: usize = 100;

/// Largest household the nutrition view accepts
pub const MAX_HOUSEHOLD_SIZE: i32 = 100;

/// Longest nutrition period, ten years
pub const MAX_PERIOD_DAYS: i32 = 3650;

// ============================================================================
// Plan Validations
// ============================================================================

/// Validate a plan name: non-blank and reasonably short
pub fn validate_plan_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Plan name cannot be empty");
    }
    if trimmed.chars().count() > MAX_PLAN_NAME_LEN {
        return Err("Plan name must be at most 100 characters");
    }
    Ok(())
}

/// Validate household parameters for the nutrition view
pub fn validate_household(size: i32, period_days: i32) -> Result<(), &'static str> {
    if size <= 0 {
        return Err("Household size must be positive");
    }
    if size > MAX_HOUSEHOLD_SIZE {
        return Err("Household size must be at most 100");
    }
    if period_days <= 0 {
        return Err("Period must be at least one day");
    }
    if period_days > MAX_PERIOD_DAYS {
        return Err("Period must be at most 3650 days");
    }
    Ok(())
}

// ============================================================================
// Crop Validations
// ============================================================================

/// Validate a crop name typed into the custom crop lookup
pub fn validate_crop_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Crop name cannot be empty");
    }
    if trimmed.chars().count() > 60 {
        return Err("Crop name must be at most 60 characters");
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '\'' | '(' | ')'))
    {
        return Err("Crop name contains unsupported characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_plan_name() {
        assert!(validate_plan_name("Summer 2025").is_ok());
        assert!(validate_plan_name("   ").is_err());
        assert!(validate_plan_name("").is_err());
        assert!(validate_plan_name(&"x".repeat(101)).is_err());
        assert!(validate_plan_name(&"å".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_household() {
        assert!(validate_household(4, 365).is_ok());
        assert!(validate_household(0, 365).is_err());
        assert!(validate_household(101, 365).is_err());
        assert!(validate_household(2, 0).is_err());
        assert!(validate_household(2, 3651).is_err());
    }

    #[test]
    fn test_validate_crop_name() {
        assert!(validate_crop_name("Jerusalem artichoke").is_ok());
        assert!(validate_crop_name("Pak choi (baby)").is_ok());
        assert!(validate_crop_name("Rödbeta").is_ok());
        assert!(validate_crop_name("  ").is_err());
        assert!(validate_crop_name("<script>").is_err());
    }
}
