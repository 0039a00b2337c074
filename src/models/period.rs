use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FaithError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Daily,
    Weekly,
    Monthly,
}

impl PeriodKind {
    pub fn all() -> [PeriodKind; 3] {
        [PeriodKind::Daily, PeriodKind::Weekly, PeriodKind::Monthly]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Daily => "daily",
            PeriodKind::Weekly => "weekly",
            PeriodKind::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PeriodKind {
    type Err = FaithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Ok(PeriodKind::Daily),
            "weekly" | "week" => Ok(PeriodKind::Weekly),
            "monthly" | "month" => Ok(PeriodKind::Monthly),
            _ => Err(FaithError::UnknownPeriod(s.to_string())),
        }
    }
}

/// The period a goal record belongs to. A new key means a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PeriodKey {
    Day { date: NaiveDate },
    /// Weeks start on Sunday.
    Week { start: NaiveDate },
    Month { year: i32, month: u32 },
}

impl PeriodKey {
    pub fn for_date(kind: PeriodKind, date: NaiveDate) -> Self {
        match kind {
            PeriodKind::Daily => PeriodKey::Day { date },
            PeriodKind::Weekly => PeriodKey::Week {
                start: week_start(date),
            },
            PeriodKind::Monthly => PeriodKey::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }

    pub fn kind(&self) -> PeriodKind {
        match self {
            PeriodKey::Day { .. } => PeriodKind::Daily,
            PeriodKey::Week { .. } => PeriodKind::Weekly,
            PeriodKey::Month { .. } => PeriodKind::Monthly,
        }
    }

    /// Value half of the composite key: `YYYY-MM-DD` for days and weeks,
    /// `YYYY-MM` for months.
    pub fn value(&self) -> String {
        match self {
            PeriodKey::Day { date } => date.format("%Y-%m-%d").to_string(),
            PeriodKey::Week { start } => start.format("%Y-%m-%d").to_string(),
            PeriodKey::Month { year, month } => format!("{:04}-{:02}", year, month),
        }
    }

    pub fn parse(kind: PeriodKind, value: &str) -> Result<Self, FaithError> {
        let bad = || FaithError::BadPeriodKey {
            kind: kind.as_str(),
            value: value.to_string(),
        };
        match kind {
            PeriodKind::Daily => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|date| PeriodKey::Day { date })
                .map_err(|_| bad()),
            PeriodKind::Weekly => {
                let start = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| bad())?;
                if week_start(start) != start {
                    return Err(bad());
                }
                Ok(PeriodKey::Week { start })
            }
            PeriodKind::Monthly => {
                let (y, m) = value.split_once('-').ok_or_else(bad)?;
                let year: i32 = y.parse().map_err(|_| bad())?;
                let month: u32 = m.parse().map_err(|_| bad())?;
                if !(1..=12).contains(&month) {
                    return Err(bad());
                }
                Ok(PeriodKey::Month { year, month })
            }
        }
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.value())
    }
}

/// Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_sunday() as i64;
    date - Duration::days(back)
}

/// Opaque identity from the identity provider. Not validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Composite document key: one goal record per user per period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreKey {
    pub user: UserId,
    pub period: PeriodKey,
}

impl StoreKey {
    pub fn new(user: UserId, period: PeriodKey) -> Self {
        Self { user, period }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2026-10-19 is a Monday
        assert_eq!(week_start(d(2026, 10, 19)), d(2026, 10, 18));
        assert_eq!(week_start(d(2026, 10, 18)), d(2026, 10, 18));
        assert_eq!(week_start(d(2026, 10, 24)), d(2026, 10, 18));
    }

    #[test]
    fn keys_render_and_parse_back() {
        let date = d(2026, 3, 7);
        for kind in PeriodKind::all() {
            let key = PeriodKey::for_date(kind, date);
            assert_eq!(PeriodKey::parse(kind, &key.value()).unwrap(), key);
        }
        assert_eq!(PeriodKey::for_date(PeriodKind::Monthly, date).value(), "2026-03");
    }

    #[test]
    fn week_key_must_be_a_sunday() {
        assert!(PeriodKey::parse(PeriodKind::Weekly, "2026-10-19").is_err());
        assert!(PeriodKey::parse(PeriodKind::Monthly, "2026-13").is_err());
    }
}
