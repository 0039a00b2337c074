use crate::error::FaithError;
use crate::models::{PrayerDefinition, PrayerEntry, PrayerSnapshot, TimeOfDay};
use crate::utils::format::to_12h;

const fn row(f: (u32, u32), d: (u32, u32), a: (u32, u32), m: (u32, u32), i: (u32, u32)) -> PrayerDefinition {
    PrayerDefinition {
        fajr: TimeOfDay::new(f.0, f.1),
        dhuhr: TimeOfDay::new(d.0, d.1),
        asr: TimeOfDay::new(a.0, a.1),
        maghrib: TimeOfDay::new(m.0, m.1),
        isha: TimeOfDay::new(i.0, i.1),
    }
}

/// Monthly prayer times for Addis Ababa, index 0 = January.
pub const MONTHLY_TIMES: [PrayerDefinition; 12] = [
    row((5, 10), (12, 25), (15, 45), (18, 22), (19, 38)),
    row((5, 5), (12, 22), (15, 42), (18, 20), (19, 35)),
    row((4, 58), (12, 18), (15, 42), (18, 20), (19, 35)),
    row((4, 48), (12, 13), (15, 38), (18, 15), (19, 28)),
    row((4, 40), (12, 10), (15, 35), (18, 12), (19, 25)),
    row((4, 38), (12, 9), (15, 33), (18, 10), (19, 22)),
    row((4, 42), (12, 11), (15, 35), (18, 12), (19, 25)),
    row((4, 50), (12, 14), (15, 38), (18, 15), (19, 28)),
    row((4, 57), (12, 16), (15, 40), (18, 16), (19, 29)),
    row((5, 3), (12, 19), (15, 42), (18, 19), (19, 33)),
    row((5, 8), (12, 23), (15, 44), (18, 22), (19, 37)),
    row((5, 12), (12, 26), (15, 46), (18, 24), (19, 40)),
];

/// Row for `month` (1..=12). Anything else falls back to January.
pub fn definition_for_month(month: u32) -> PrayerDefinition {
    match month {
        1..=12 => MONTHLY_TIMES[(month - 1) as usize],
        _ => {
            log::warn!("No prayer table row for month {}, using month 1", month);
            MONTHLY_TIMES[0]
        }
    }
}

/// Annotate a definition with display strings and icons.
pub fn snapshot_from(month: u32, def: &PrayerDefinition) -> PrayerSnapshot {
    let entries = def.times().map(|(name, t)| PrayerEntry {
        name,
        arabic: name.arabic(),
        hour: t.hour,
        minute: t.minute,
        display: to_12h(t.hour, t.minute),
        icon: name.icon(),
    });
    PrayerSnapshot { month, entries }
}

pub fn resolve_month_schedule(month: u32) -> PrayerSnapshot {
    snapshot_from(month, &definition_for_month(month))
}

/// Same as [`resolve_month_schedule`] but rejects months outside 1..=12
/// instead of falling back.
pub fn try_resolve_month_schedule(month: u32) -> Result<PrayerSnapshot, FaithError> {
    if !(1..=12).contains(&month) {
        return Err(FaithError::BadMonth(month));
    }
    Ok(resolve_month_schedule(month))
}

pub fn full_year() -> Vec<PrayerSnapshot> {
    (1..=12).map(resolve_month_schedule).collect()
}
