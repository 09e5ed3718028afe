use chrono::{Months, NaiveDate};

use crate::errors::{DebtError, Result};

/// add whole calendar months to a date
///
/// the day of month is kept where the target month has it, otherwise it is
/// clamped to that month's last day (jan 31 + 1 month = feb 28/29). always
/// offset from the original date so a clamp never carries into later months.
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months)).ok_or_else(|| {
        DebtError::invalid_input(format!(
            "{date} plus {months} months is outside the supported calendar range"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_keeps_day_of_month() {
        assert_eq!(add_months(ymd(2024, 1, 15), 1).unwrap(), ymd(2024, 2, 15));
        assert_eq!(add_months(ymd(2024, 11, 15), 3).unwrap(), ymd(2025, 2, 15));
    }

    #[test]
    fn test_clamps_to_month_end() {
        assert_eq!(add_months(ymd(2024, 1, 31), 1).unwrap(), ymd(2024, 2, 29));
        assert_eq!(add_months(ymd(2023, 1, 31), 1).unwrap(), ymd(2023, 2, 28));
        assert_eq!(add_months(ymd(2024, 8, 31), 1).unwrap(), ymd(2024, 9, 30));
    }

    #[test]
    fn test_clamp_does_not_carry_forward() {
        // feb is clamped but march gets its 31st back
        assert_eq!(add_months(ymd(2024, 1, 31), 2).unwrap(), ymd(2024, 3, 31));
    }

    #[test]
    fn test_out_of_range() {
        let err = add_months(NaiveDate::MAX, 1).unwrap_err();
        assert!(matches!(err, DebtError::InvalidInput { .. }));
    }
}
