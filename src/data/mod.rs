//! Record sets and the loaded data context.
//! Shared value types: year-month buckets and the four-level risk scale.

mod loader;
pub mod quality;
mod records;

pub use loader::{load_all, DataFiles};
pub use quality::{QualityIssue, QualityReport};
pub use records::{Component, Incident, Metric, Risk};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Calendar month bucket, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Shift by `n` months (negative goes back).
    pub fn add_months(&self, n: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + n;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid year-month bucket {0:?}, expected YYYY-MM")]
pub struct ParseYearMonthError(String);

impl FromStr for YearMonth {
    type Err = ParseYearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseYearMonthError(s.to_string());
        let (y, m) = s.trim().split_once('-').ok_or_else(err)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(err());
        }
        let year = y.parse().map_err(|_| err())?;
        let month = m.parse().map_err(|_| err())?;
        YearMonth::new(year, month).ok_or_else(err)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Inherent / residual risk scale, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Extreme,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Extreme,
    ];

    /// Parse an English or Portuguese level label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" | "baixo" => Some(RiskLevel::Low),
            "medium" | "médio" | "medio" => Some(RiskLevel::Medium),
            "high" | "alto" => Some(RiskLevel::High),
            "extreme" | "extremo" => Some(RiskLevel::Extreme),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Extreme => "Extreme",
        };
        f.write_str(s)
    }
}

/// The four record sets, loaded once and passed down read-only.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub incidents: Vec<Incident>,
    pub risks: Vec<Risk>,
    pub metrics: Vec<Metric>,
    pub components: Vec<Component>,
}

impl Dataset {
    pub fn quality_report(&self) -> QualityReport {
        QualityReport::check(self)
    }
}

/// Serde adapters for the date-like CSV columns.
pub(crate) mod datetime {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        DATETIME_FORMATS
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(OUTPUT_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("unparseable timestamp {s:?}")))
    }

    /// Date-only columns: accepts any timestamp format and keeps the date.
    pub mod date {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(&value.format("%Y-%m-%d"))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
            let s = String::deserialize(deserializer)?;
            super::parse(&s)
                .map(|dt| dt.date())
                .ok_or_else(|| serde::de::Error::custom(format!("unparseable date {s:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_month_parses_and_orders() {
        let a: YearMonth = "2023-12".parse().unwrap();
        let b: YearMonth = "2024-01".parse().unwrap();
        assert!(a < b);
        assert_eq!(b.to_string(), "2024-01");
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("2024/01".parse::<YearMonth>().is_err());
        assert!("24-01".parse::<YearMonth>().is_err());
    }

    #[test]
    fn year_month_arithmetic_crosses_years() {
        let m = YearMonth::new(2023, 11).unwrap();
        assert_eq!(m.add_months(2), YearMonth::new(2024, 1).unwrap());
        assert_eq!(m.add_months(-11), YearMonth::new(2022, 12).unwrap());
        assert_eq!(m.add_months(0), m);
    }

    #[test]
    fn risk_level_labels() {
        assert_eq!(RiskLevel::from_label("Alto"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::from_label("Médio"), Some(RiskLevel::Medium));
        assert_eq!(RiskLevel::from_label(" extreme "), Some(RiskLevel::Extreme));
        assert_eq!(RiskLevel::from_label("Critical"), None);
        assert!(RiskLevel::Low < RiskLevel::Extreme);
    }

    #[test]
    fn timestamp_formats() {
        assert!(datetime::parse("2024-03-01 14:05:00").is_some());
        assert!(datetime::parse("2024-03-01T14:05:00").is_some());
        assert!(datetime::parse("2024-03-01").is_some());
        assert!(datetime::parse("01/03/2024").is_none());
    }
}
