use crate::models::{CurrentNext, MINUTES_PER_DAY, PrayerEntry, PrayerSnapshot, TimeOfDay};
use crate::utils::format::format_countdown;

/// Circular minutes from `now` until `entry` starts, in `[0, 1440)`.
pub fn minutes_until(entry: &PrayerEntry, now: TimeOfDay) -> u32 {
    (entry.minutes() + MINUTES_PER_DAY - now.minutes() % MINUTES_PER_DAY) % MINUTES_PER_DAY
}

/// Work out which prayer window `now` falls in and how long until the next.
///
/// A prayer is current from its start minute (inclusive) until the next
/// prayer's start (exclusive); Isha runs until midnight. Before Fajr no
/// prayer is current and Fajr is next.
pub fn resolve_current_and_next(snapshot: &PrayerSnapshot, now: TimeOfDay) -> CurrentNext {
    let entries = &snapshot.entries;
    let now_minutes = now.minutes() % MINUTES_PER_DAY;
    let last = entries.len() - 1;

    let mut current = None;
    let mut next_idx = None;

    for (i, entry) in entries.iter().enumerate() {
        let following = (i + 1) % entries.len();
        if now_minutes >= entry.minutes()
            && (i == last || now_minutes < entries[following].minutes())
        {
            current = Some(i);
            next_idx = Some(following);
        }
    }

    let next_idx = next_idx
        .or_else(|| entries.iter().position(|e| e.minutes() > now_minutes))
        .unwrap_or(0);
    let next = entries[next_idx].clone();
    let countdown_minutes = minutes_until(&next, now);

    CurrentNext {
        current: current.map(|i| entries[i].clone()),
        next,
        countdown_minutes,
        countdown: format_countdown(countdown_minutes),
    }
}
