//! Age Derivation
//! Years between a birth date and a reference day.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

pub const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgeError {
    #[error("Invalid date of birth: '{0}'")]
    InvalidDate(String),
    #[error("Date of birth {0} is after the reference date")]
    FutureDate(NaiveDate),
}

/// Parse a birth date as written in the players file.
///
/// Accepts `YYYY-MM-DD` with or without a trailing time component.
pub fn parse_birth_date(raw: &str) -> Result<NaiveDate, AgeError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
        })
        .or_else(|_| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date())
        })
        .map_err(|_| AgeError::InvalidDate(raw.to_string()))
}

/// Age in fractional years: days between the dates divided by 365.25.
pub fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> Result<f64, AgeError> {
    if date_of_birth > today {
        return Err(AgeError::FutureDate(date_of_birth));
    }
    let days = (today - date_of_birth).num_days();
    Ok(days as f64 / DAYS_PER_YEAR)
}

/// Parse and derive in one step.
pub fn age_from_text(raw: &str, today: NaiveDate) -> Result<f64, AgeError> {
    age_in_years(parse_birth_date(raw)?, today)
}

/// Ages for every parseable, non-future birth date, plus the number excluded.
pub fn derive_ages<'a>(
    birth_dates: impl Iterator<Item = &'a str>,
    today: NaiveDate,
) -> (Vec<f64>, usize) {
    let mut excluded = 0;
    let ages = birth_dates
        .filter_map(|raw| match age_from_text(raw, today) {
            Ok(age) => Some(age),
            Err(e) => {
                log::debug!("Excluding record from age analysis: {}", e);
                excluded += 1;
                None
            }
        })
        .collect();
    (ages, excluded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_is_days_over_julian_year() {
        let age = age_in_years(day(2000, 1, 1), day(2024, 1, 1)).unwrap();
        let expected = 8766.0 / 365.25;
        assert!((age - expected).abs() < 1e-12);
        assert!((age - 24.0).abs() < 0.01);
    }

    #[test]
    fn accepts_date_and_datetime_text() {
        assert_eq!(parse_birth_date("1992-02-05").unwrap(), day(1992, 2, 5));
        assert_eq!(parse_birth_date("1992-02-05 00:00:00").unwrap(), day(1992, 2, 5));
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert_eq!(
            parse_birth_date("not a date"),
            Err(AgeError::InvalidDate("not a date".to_string()))
        );
        assert!(parse_birth_date("1990-02-30").is_err());
    }

    #[test]
    fn future_birth_date_is_an_error() {
        let today = day(2024, 6, 1);
        assert_eq!(
            age_in_years(day(2030, 1, 1), today),
            Err(AgeError::FutureDate(day(2030, 1, 1)))
        );
    }

    #[test]
    fn derive_ages_counts_exclusions() {
        let today = day(2024, 6, 1);
        let raw = ["2000-06-01", "bogus", "2099-01-01", "1990-06-01 00:00:00"];
        let (ages, excluded) = derive_ages(raw.iter().copied(), today);
        assert_eq!(ages.len(), 2);
        assert_eq!(excluded, 2);
    }
}
