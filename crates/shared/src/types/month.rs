//! Month-bucket keys for the monthly-expense ledger.
//!
//! Ledger entries are grouped into `YYYY-MM` buckets derived from their due
//! date. The bucket is stored denormalized next to the due date so reporting
//! queries can filter on a plain equality.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month bucket in `YYYY-MM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Derives the bucket from a due date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parses a `YYYY-MM` string.
    ///
    /// # Errors
    ///
    /// Returns an error for anything that is not a 4-digit year, a dash, and
    /// a month in `01..=12`.
    pub fn parse(s: &str) -> Result<Self, String> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid month key: {s}"))?;
        if year.len() != 4 || month.len() != 2 {
            return Err(format!("invalid month key: {s}"));
        }
        let year: i32 = year.parse().map_err(|_| format!("invalid month key: {s}"))?;
        let month: u32 = month.parse().map_err(|_| format!("invalid month key: {s}"))?;
        if !(1..=12).contains(&month) {
            return Err(format!("month out of range: {s}"));
        }
        Ok(Self { year, month })
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for MonthKey {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_from_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        assert_eq!(MonthKey::from_date(date).to_string(), "2026-03");
    }

    #[rstest]
    #[case("2026-01")]
    #[case("1999-12")]
    #[case("2026-07")]
    fn test_parse_roundtrip(#[case] s: &str) {
        assert_eq!(MonthKey::parse(s).unwrap().to_string(), s);
    }

    #[rstest]
    #[case("2026-13")]
    #[case("2026-00")]
    #[case("26-01")]
    #[case("2026/01")]
    #[case("garbage")]
    fn test_parse_rejects(#[case] s: &str) {
        assert!(MonthKey::parse(s).is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let key = MonthKey::from_date(NaiveDate::from_ymd_opt(2026, 8, 7).unwrap());
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2026-08\"");
        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_ordering_follows_calendar() {
        let a = MonthKey::parse("2025-12").unwrap();
        let b = MonthKey::parse("2026-01").unwrap();
        assert!(a < b);
    }
}
