use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FaithError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub fn all() -> [PrayerName; 5] {
        [
            PrayerName::Fajr,
            PrayerName::Dhuhr,
            PrayerName::Asr,
            PrayerName::Maghrib,
            PrayerName::Isha,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "fajr",
            PrayerName::Dhuhr => "dhuhr",
            PrayerName::Asr => "asr",
            PrayerName::Maghrib => "maghrib",
            PrayerName::Isha => "isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }

    pub fn arabic(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "الفجر",
            PrayerName::Dhuhr => "الظهر",
            PrayerName::Asr => "العصر",
            PrayerName::Maghrib => "المغرب",
            PrayerName::Isha => "العشاء",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "🌙",
            PrayerName::Dhuhr => "☀️",
            PrayerName::Asr => "🌤️",
            PrayerName::Maghrib => "🌅",
            PrayerName::Isha => "🌃",
        }
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.display_name())
    }
}

impl FromStr for PrayerName {
    type Err = FaithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerName::Fajr),
            "dhuhr" | "zuhr" | "dhuhur" => Ok(PrayerName::Dhuhr),
            "asr" => Ok(PrayerName::Asr),
            "maghrib" => Ok(PrayerName::Maghrib),
            "isha" => Ok(PrayerName::Isha),
            _ => Err(FaithError::UnknownPrayer(s.to_string())),
        }
    }
}

/// Wall-clock time of day at minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    pub const fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    pub fn is_valid(&self) -> bool {
        self.hour < 24 && self.minute < 60
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    pub fn from_minutes(minutes: u32) -> Self {
        let m = minutes % MINUTES_PER_DAY;
        Self::new(m / 60, m % 60)
    }

    /// Parse a 24h "HH:MM" string.
    pub fn parse(s: &str) -> Result<Self, FaithError> {
        let bad = || FaithError::BadTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(bad)?;
        let hour: u32 = h.parse().map_err(|_| bad())?;
        let minute: u32 = m.parse().map_err(|_| bad())?;
        let t = Self::new(hour, minute);
        if t.is_valid() { Ok(t) } else { Err(bad()) }
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(t: NaiveTime) -> Self {
        Self::new(t.hour(), t.minute())
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// The five daily prayer times for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerDefinition {
    pub fajr: TimeOfDay,
    pub dhuhr: TimeOfDay,
    pub asr: TimeOfDay,
    pub maghrib: TimeOfDay,
    pub isha: TimeOfDay,
}

impl PrayerDefinition {
    pub fn times(&self) -> [(PrayerName, TimeOfDay); 5] {
        [
            (PrayerName::Fajr, self.fajr),
            (PrayerName::Dhuhr, self.dhuhr),
            (PrayerName::Asr, self.asr),
            (PrayerName::Maghrib, self.maghrib),
            (PrayerName::Isha, self.isha),
        ]
    }

    /// All times in range and strictly increasing Fajr through Isha.
    pub fn is_valid(&self) -> bool {
        let times = self.times();
        times.iter().all(|(_, t)| t.is_valid())
            && times.windows(2).all(|w| w[0].1 < w[1].1)
    }
}

/// One prayer annotated for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrayerEntry {
    pub name: PrayerName,
    pub arabic: &'static str,
    pub hour: u32,
    pub minute: u32,
    /// 12-hour display string, e.g. "5:10 AM"
    pub display: String,
    pub icon: &'static str,
}

impl PrayerEntry {
    pub fn minutes(&self) -> u32 {
        self.hour * 60 + self.minute
    }
}

/// Five prayers for "now", in fixed Fajr..Isha order. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrayerSnapshot {
    pub month: u32,
    pub entries: [PrayerEntry; 5],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentNext {
    /// None before Fajr.
    pub current: Option<PrayerEntry>,
    pub next: PrayerEntry,
    pub countdown_minutes: u32,
    pub countdown: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prayer_aliases() {
        assert_eq!("Zuhr".parse::<PrayerName>().unwrap(), PrayerName::Dhuhr);
        assert_eq!("ISHA".parse::<PrayerName>().unwrap(), PrayerName::Isha);
        assert!("witr".parse::<PrayerName>().is_err());
    }

    #[test]
    fn time_of_day_parse_rejects_out_of_range() {
        assert_eq!(TimeOfDay::parse("05:10").unwrap(), TimeOfDay::new(5, 10));
        assert!(TimeOfDay::parse("24:00").is_err());
        assert!(TimeOfDay::parse("12:60").is_err());
        assert!(TimeOfDay::parse("noon").is_err());
    }

    #[test]
    fn from_minutes_wraps_past_midnight() {
        assert_eq!(TimeOfDay::from_minutes(MINUTES_PER_DAY + 61), TimeOfDay::new(1, 1));
    }

    #[test]
    fn definition_rejects_out_of_order_times() {
        let def = PrayerDefinition {
            fajr: TimeOfDay::new(5, 0),
            dhuhr: TimeOfDay::new(12, 0),
            asr: TimeOfDay::new(11, 0),
            maghrib: TimeOfDay::new(18, 0),
            isha: TimeOfDay::new(19, 0),
        };
        assert!(!def.is_valid());
    }
}
