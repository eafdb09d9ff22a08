//! Common types and constants used across the planner

use serde::{Deserialize, Serialize};

/// Daily caloric need of one person, in kcal
pub const DAILY_KCAL_PER_PERSON: i32 = 2000;

/// Calendar months, January first
pub const MONTHS: [u32; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

/// English month names indexed by `month - 1`
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Name of a calendar month (1-12)
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
}

/// Check that a month number lies in 1..=12
pub fn is_valid_month(month: u32) -> bool {
    (1..=12).contains(&month)
}

/// Household parameters used as the nutrition denominator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Household {
    pub size: i32,
    pub period_days: i32,
}

impl Default for Household {
    fn default() -> Self {
        Self {
            size: 1,
            period_days: 365,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_is_valid_month() {
        assert!(MONTHS.iter().all(|m| is_valid_month(*m)));
        assert!(!is_valid_month(0));
        assert!(!is_valid_month(13));
    }
}
