use ramadan_faith::models::{PrayerName, TimeOfDay};
use ramadan_faith::prayer_times::{
    ScheduleSource, TableSource, full_year, minutes_until, resolve_current_and_next,
    resolve_month_schedule, to_12h,
};

#[test]
fn twelve_hour_display() {
    assert_eq!(to_12h(0, 0), "12:00 AM");
    assert_eq!(to_12h(12, 0), "12:00 PM");
    assert_eq!(to_12h(15, 45), "3:45 PM");
}

#[test]
fn full_year_is_ordered() {
    let year = full_year();
    assert_eq!(year.len(), 12);
    for snap in &year {
        let mins: Vec<u32> = snap.entries.iter().map(|e| e.minutes()).collect();
        assert!(mins.windows(2).all(|w| w[0] < w[1]), "month {}", snap.month);
    }
}

#[test]
fn january_afternoon_and_night() {
    let snap = resolve_month_schedule(1);

    let r = resolve_current_and_next(&snap, TimeOfDay::new(16, 0));
    assert_eq!(r.current.as_ref().map(|e| e.name), Some(PrayerName::Asr));
    assert_eq!(r.next.name, PrayerName::Maghrib);
    assert_eq!(r.countdown, "2h 22m");

    let r = resolve_current_and_next(&snap, TimeOfDay::new(3, 0));
    assert_eq!(r.current, None);
    assert_eq!(r.next.name, PrayerName::Fajr);
    assert_eq!(r.countdown, "2h 10m");
}

#[test]
fn countdown_matches_minutes_until_next() {
    let snap = resolve_month_schedule(9);
    for minute in (0..24 * 60).step_by(7) {
        let now = TimeOfDay::from_minutes(minute);
        let r = resolve_current_and_next(&snap, now);
        assert_eq!(r.countdown_minutes, minutes_until(&r.next, now));
        if let Some(cur) = &r.current {
            let idx = PrayerName::all().iter().position(|p| *p == cur.name).unwrap();
            assert_eq!(r.next.name, PrayerName::all()[(idx + 1) % 5]);
        }
    }
}

#[test]
fn table_source_snapshot_matches_month() {
    let date = chrono::NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
    assert_eq!(TableSource.snapshot_for(date), resolve_month_schedule(12));
}
