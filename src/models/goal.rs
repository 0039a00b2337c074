use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FaithError;
use crate::models::{PeriodKey, PeriodKind, PrayerName};

pub const QURAN_PAGES: u32 = 604;
pub const QURAN_JUZ: u32 = 30;
pub const QURAN_SURAHS: u32 = 114;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalUnit {
    Pages,
    Juz,
    Surah,
    /// Full readings of the Quran; used by monthly goals.
    Completions,
}

impl GoalUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalUnit::Pages => "pages",
            GoalUnit::Juz => "juz",
            GoalUnit::Surah => "surah",
            GoalUnit::Completions => "completions",
        }
    }

    /// Upper bound for a target of this unit, if any.
    pub fn max_target(&self) -> Option<u32> {
        match self {
            GoalUnit::Pages => Some(QURAN_PAGES),
            GoalUnit::Juz => Some(QURAN_JUZ),
            GoalUnit::Surah => Some(QURAN_SURAHS),
            GoalUnit::Completions => None,
        }
    }

    /// Quick-add increment.
    pub fn step(&self) -> u32 {
        match self {
            GoalUnit::Pages => 5,
            _ => 1,
        }
    }

    pub fn clamp_target(&self, target: u32) -> u32 {
        let floor = target.max(1);
        match self.max_target() {
            Some(max) => floor.min(max),
            None => floor,
        }
    }

    pub fn label(&self, n: u32) -> &'static str {
        match (self, n) {
            (GoalUnit::Pages, 1) => "page",
            (GoalUnit::Pages, _) => "pages",
            (GoalUnit::Juz, _) => "Juz",
            (GoalUnit::Surah, 1) => "Surah",
            (GoalUnit::Surah, _) => "Surahs",
            (GoalUnit::Completions, 1) => "completion",
            (GoalUnit::Completions, _) => "completions",
        }
    }

    /// Monthly goals count completions; daily and weekly goals count text.
    pub fn allowed_for(&self, kind: PeriodKind) -> bool {
        match kind {
            PeriodKind::Monthly => *self == GoalUnit::Completions,
            PeriodKind::Daily | PeriodKind::Weekly => *self != GoalUnit::Completions,
        }
    }
}

impl std::fmt::Display for GoalUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for GoalUnit {
    type Err = FaithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pages" | "page" => Ok(GoalUnit::Pages),
            "juz" => Ok(GoalUnit::Juz),
            "surah" | "surahs" => Ok(GoalUnit::Surah),
            "completions" | "completion" => Ok(GoalUnit::Completions),
            _ => Err(FaithError::UnknownUnit(s.to_string())),
        }
    }
}

/// Progress toward a reading target within one period.
///
/// `progress` stays in `[0, target]`. Once `completed` is set it stays set for
/// the life of the record, even if progress is later undone below target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRecord {
    pub unit: GoalUnit,
    pub target: u32,
    pub progress: u32,
    pub completed: bool,
    pub period: PeriodKey,
}

impl GoalRecord {
    pub fn remaining(&self) -> u32 {
        self.target.saturating_sub(self.progress)
    }

    pub fn percent(&self) -> u32 {
        if self.target == 0 {
            return 0;
        }
        ((self.progress as f64 / self.target as f64) * 100.0).round().min(100.0) as u32
    }

    /// Splits a daily target across the five prayers; the first
    /// `target % 5` prayers carry one extra unit.
    pub fn prayer_distribution(&self) -> [(PrayerName, u32); 5] {
        let prayers = PrayerName::all();
        let per = self.target / prayers.len() as u32;
        let extra = (self.target % prayers.len() as u32) as usize;
        let mut out = [(PrayerName::Fajr, 0); 5];
        for (i, p) in prayers.into_iter().enumerate() {
            out[i] = (p, if i < extra { per + 1 } else { per });
        }
        out
    }

    /// Units per day needed to hit the target: weekly goals over seven days,
    /// monthly completions as pages over thirty days.
    pub fn daily_pace(&self) -> Option<(u32, GoalUnit)> {
        match self.period.kind() {
            PeriodKind::Daily => None,
            PeriodKind::Weekly => Some((self.target.div_ceil(7), self.unit)),
            PeriodKind::Monthly => {
                let pages = (u64::from(self.target) * u64::from(QURAN_PAGES)).div_ceil(30);
                Some((u32::try_from(pages).unwrap_or(u32::MAX), GoalUnit::Pages))
            }
        }
    }
}
