// src/utils/date.rs

use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;

use crate::error::AppError;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

/// Parses a `YYYY-MM-DD` date. Zero padding is required.
pub fn parse_quiz_date(input: &str) -> Result<NaiveDate, AppError> {
    if !DATE_PATTERN.is_match(input) {
        return Err(AppError::InvalidInput(format!("invalid date '{}'", input)));
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput(format!("invalid date '{}'", input)))
}

/// Display name of a quiz, e.g. "Friday, March 1".
pub fn quiz_name(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_quiz_after_weekday_month_and_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(quiz_name(date), "Friday, March 1");

        let date = NaiveDate::from_ymd_opt(2022, 12, 25).unwrap();
        assert_eq!(quiz_name(date), "Sunday, December 25");
    }

    #[test]
    fn parses_padded_dates_only() {
        assert_eq!(
            parse_quiz_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );

        for bad in ["not-a-date", "2024-3-1", "2024-02-30", "", "2024-03-01T00:00"] {
            assert!(
                matches!(parse_quiz_date(bad), Err(AppError::InvalidInput(_))),
                "{bad} should be rejected"
            );
        }
    }
}
