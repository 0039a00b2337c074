use anyhow::{Result, anyhow};
use chrono::{Datelike, FixedOffset, NaiveDate};
use salah::prelude::*;

use crate::config::ScheduleConfig;
use crate::models::{PrayerDefinition, PrayerSnapshot, TimeOfDay};
use crate::prayer_times::schedule::{definition_for_month, snapshot_from};

/// Where the five daily times come from.
pub trait ScheduleSource {
    fn definition_for(&self, date: NaiveDate) -> PrayerDefinition;

    fn snapshot_for(&self, date: NaiveDate) -> PrayerSnapshot {
        snapshot_from(date.month(), &self.definition_for(date))
    }
}

/// The compiled-in monthly table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableSource;

impl ScheduleSource for TableSource {
    fn definition_for(&self, date: NaiveDate) -> PrayerDefinition {
        definition_for_month(date.month())
    }
}

/// Astronomical times for a fixed location, falling back to the table when
/// the calculation fails or produces an unusable row.
pub struct CalculatedSource {
    pub lat: f64,
    pub lng: f64,
    pub method_str: String,
    pub madhab_str: String,
    pub tz_offset_minutes: i32,
}

impl CalculatedSource {
    pub fn new(
        lat: f64,
        lng: f64,
        method: &str,
        madhab: &str,
        tz_offset_minutes: i32,
    ) -> Result<Self> {
        // Validate method + madhab early
        parse_method(method)?;
        parse_madhab(madhab)?;
        FixedOffset::east_opt(tz_offset_minutes * 60)
            .ok_or_else(|| anyhow!("Invalid timezone offset: {}", tz_offset_minutes))?;
        Ok(Self {
            lat,
            lng,
            method_str: method.to_string(),
            madhab_str: madhab.to_string(),
            tz_offset_minutes,
        })
    }

    pub fn compute(&self, date: NaiveDate) -> Result<PrayerDefinition> {
        let coords = Coordinates::new(self.lat, self.lng);
        let method = parse_method(&self.method_str)?;
        let madhab = parse_madhab(&self.madhab_str)?;
        let params = Configuration::with(method, madhab);

        let times = PrayerSchedule::new()
            .on(date)
            .for_location(coords)
            .with_configuration(params)
            .calculate()
            .map_err(|e| anyhow!("Prayer calculation failed: {}", e))?;

        let offset = FixedOffset::east_opt(self.tz_offset_minutes * 60)
            .ok_or_else(|| anyhow!("Invalid timezone offset: {}", self.tz_offset_minutes))?;

        let to_local = |utc: chrono::DateTime<chrono::Utc>| -> TimeOfDay {
            TimeOfDay::from(utc.with_timezone(&offset).time())
        };

        let def = PrayerDefinition {
            fajr: to_local(times.time(Prayer::Fajr)),
            dhuhr: to_local(times.time(Prayer::Dhuhr)),
            asr: to_local(times.time(Prayer::Asr)),
            maghrib: to_local(times.time(Prayer::Maghrib)),
            isha: to_local(times.time(Prayer::Isha)),
        };
        if !def.is_valid() {
            return Err(anyhow!("Calculated times for {} are not in prayer order", date));
        }
        Ok(def)
    }
}

impl ScheduleSource for CalculatedSource {
    fn definition_for(&self, date: NaiveDate) -> PrayerDefinition {
        match self.compute(date) {
            Ok(def) => def,
            Err(e) => {
                log::warn!("{}; using the monthly table", e);
                definition_for_month(date.month())
            }
        }
    }
}

/// Build the source named by `[schedule]` in the config.
pub fn source_from_config(cfg: &ScheduleConfig) -> Result<Box<dyn ScheduleSource>> {
    match cfg.source.as_str() {
        "table" => Ok(Box::new(TableSource)),
        "calculated" => Ok(Box::new(CalculatedSource::new(
            cfg.latitude,
            cfg.longitude,
            &cfg.calc_method,
            &cfg.madhab,
            cfg.timezone_offset,
        )?)),
        other => Err(anyhow!("Unknown schedule source: '{}' (expected table or calculated)", other)),
    }
}

fn parse_method(s: &str) -> Result<Method> {
    match s {
        "MuslimWorldLeague" => Ok(Method::MuslimWorldLeague),
        "Egyptian" => Ok(Method::Egyptian),
        "Karachi" => Ok(Method::Karachi),
        "UmmAlQura" => Ok(Method::UmmAlQura),
        "Dubai" => Ok(Method::Dubai),
        "MoonsightingCommittee" => Ok(Method::MoonsightingCommittee),
        "NorthAmerica" => Ok(Method::NorthAmerica),
        "Kuwait" => Ok(Method::Kuwait),
        "Qatar" => Ok(Method::Qatar),
        "Singapore" => Ok(Method::Singapore),
        "Tehran" => Ok(Method::Tehran),
        "Turkey" => Ok(Method::Turkey),
        "Other" => Ok(Method::Other),
        _ => Err(anyhow!("Unknown calculation method: '{}'", s)),
    }
}

fn parse_madhab(s: &str) -> Result<Madhab> {
    match s {
        "Hanafi" => Ok(Madhab::Hanafi),
        "Shafi" | "Shafi'i" => Ok(Madhab::Shafi),
        _ => Err(anyhow!("Unknown madhab: '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_source_uses_month_row() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        assert_eq!(TableSource.definition_for(date), definition_for_month(6));
        assert_eq!(TableSource.snapshot_for(date).month, 6);
    }

    #[test]
    fn rejects_unknown_method_and_madhab() {
        assert!(CalculatedSource::new(9.03, 38.74, "Nowhere", "Hanafi", 180).is_err());
        assert!(CalculatedSource::new(9.03, 38.74, "Egyptian", "Maliki", 180).is_err());
    }

    #[test]
    fn unknown_source_name_is_an_error() {
        let cfg = ScheduleConfig {
            source: "lunar".into(),
            ..ScheduleConfig::default()
        };
        assert!(source_from_config(&cfg).is_err());
    }
}
