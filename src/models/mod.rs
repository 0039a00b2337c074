pub mod goal;
pub mod period;
pub mod prayer;
pub mod profile;

pub use goal::{GoalRecord, GoalUnit, QURAN_JUZ, QURAN_PAGES, QURAN_SURAHS};
pub use period::{PeriodKey, PeriodKind, StoreKey, UserId, week_start};
pub use prayer::{
    CurrentNext, MINUTES_PER_DAY, PrayerDefinition, PrayerEntry, PrayerName, PrayerSnapshot,
    TimeOfDay,
};
pub use profile::{Badge, ProfileScore, StreakData, StreakKind};
