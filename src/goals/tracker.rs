//! Goal progress state machine: `Unset -> Active -> Completed`.
//!
//! Everything here is pure. Callers persist the returned record and, when a
//! call reports that the reward fired, apply the reward exactly once.

use crate::models::{GoalRecord, GoalUnit, PeriodKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalState {
    Unset,
    Active,
    Completed,
}

pub fn state_of(record: Option<&GoalRecord>) -> GoalState {
    match record {
        None => GoalState::Unset,
        Some(r) if r.completed => GoalState::Completed,
        Some(_) => GoalState::Active,
    }
}

/// True when going from `before` to `after` completes the goal.
pub fn completion_transition(before: Option<&GoalRecord>, after: &GoalRecord) -> bool {
    after.completed && !before.is_some_and(|b| b.completed && b.period == after.period)
}

/// Set up a goal for `period`.
///
/// The target is clamped into the unit's range. Progress starts at zero,
/// unless `existing` belongs to the same period: then it is an in-place edit
/// and the earlier progress (clamped to the new target) and completion are
/// kept.
pub fn create_or_replace_goal(
    period: PeriodKey,
    unit: GoalUnit,
    target: u32,
    existing: Option<&GoalRecord>,
) -> GoalRecord {
    let target = unit.clamp_target(target);
    match existing.filter(|r| r.period == period) {
        Some(prev) => {
            let progress = prev.progress.min(target);
            GoalRecord {
                unit,
                target,
                progress,
                completed: prev.completed || progress >= target,
                period,
            }
        }
        None => GoalRecord {
            unit,
            target,
            progress: 0,
            completed: false,
            period,
        },
    }
}

/// Add `delta` (possibly negative) to the progress, clamped into
/// `[0, target]`. Returns the new record and whether this call completed it.
///
/// Completion is one-way: taking progress back below target keeps
/// `completed` set and does not fire again.
pub fn apply_progress_delta(record: &GoalRecord, delta: i64) -> (GoalRecord, bool) {
    let target = record.target as i64;
    let progress = (record.progress as i64).saturating_add(delta).clamp(0, target) as u32;
    let reached = progress >= record.target;
    let fired = reached && !record.completed;
    if fired {
        log::debug!("goal {} reached {}/{}", record.period, progress, record.target);
    }
    let next = GoalRecord {
        progress,
        completed: record.completed || reached,
        ..record.clone()
    };
    (next, fired)
}

/// Absolute form of [`apply_progress_delta`].
pub fn set_progress(record: &GoalRecord, value: u32) -> (GoalRecord, bool) {
    apply_progress_delta(record, value as i64 - record.progress as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PeriodKind;
    use chrono::NaiveDate;

    fn day(d: u32) -> PeriodKey {
        PeriodKey::for_date(PeriodKind::Daily, NaiveDate::from_ymd_opt(2026, 3, d).unwrap())
    }

    fn record(target: u32, progress: u32, completed: bool) -> GoalRecord {
        GoalRecord {
            unit: GoalUnit::Pages,
            target,
            progress,
            completed,
            period: day(1),
        }
    }

    #[test]
    fn overshoot_clamps_and_fires() {
        let (r, fired) = apply_progress_delta(&record(10, 8, false), 5);
        assert_eq!(r.progress, 10);
        assert!(r.completed);
        assert!(fired);
    }

    #[test]
    fn undo_after_completion_keeps_flag_and_does_not_fire() {
        // Completion is one-way within a period.
        let (r, fired) = apply_progress_delta(&record(10, 10, true), -1);
        assert_eq!(r.progress, 9);
        assert!(r.completed);
        assert!(!fired);

        let (r, fired) = apply_progress_delta(&r, 1);
        assert_eq!(r.progress, 10);
        assert!(!fired);
    }

    #[test]
    fn never_leaves_bounds() {
        let mut r = record(7, 0, false);
        let deltas = [-3, 4, 100, -50, 2, -1, 9, -9, 0, 6, 1];
        for d in deltas {
            r = apply_progress_delta(&r, d).0;
            assert!(r.progress <= r.target, "{:?}", r);
        }
        assert_eq!(apply_progress_delta(&record(7, 0, false), i64::MIN / 2).0.progress, 0);
    }

    #[test]
    fn fires_once_across_a_sequence_touching_the_boundary() {
        let mut r = record(3, 0, false);
        let mut fired_count = 0;
        for d in [1, 1, 1, 0, 1, -1, 1, 5, -3, 3] {
            let (next, fired) = apply_progress_delta(&r, d);
            if fired {
                fired_count += 1;
            }
            r = next;
        }
        assert_eq!(fired_count, 1);
    }

    #[test]
    fn extreme_deltas_saturate() {
        let (r, fired) = apply_progress_delta(&record(10, 3, false), i64::MAX);
        assert_eq!(r.progress, 10);
        assert!(r.completed);
        assert!(fired);

        let (r, fired) = apply_progress_delta(&r, i64::MIN);
        assert_eq!(r.progress, 0);
        assert!(r.completed);
        assert!(!fired);
    }

    #[test]
    fn zero_delta_at_target_completes_an_unflagged_record() {
        let (r, fired) = apply_progress_delta(&record(4, 4, false), 0);
        assert!(r.completed);
        assert!(fired);
    }

    #[test]
    fn create_clamps_and_starts_at_zero() {
        let r = create_or_replace_goal(day(1), GoalUnit::Juz, 50, None);
        assert_eq!(r.target, 30);
        assert_eq!(r.progress, 0);
        assert!(!r.completed);
        assert_eq!(state_of(Some(&r)), GoalState::Active);
        assert_eq!(state_of(None), GoalState::Unset);
    }

    #[test]
    fn editing_same_period_keeps_progress() {
        let prev = record(10, 6, false);
        let r = create_or_replace_goal(day(1), GoalUnit::Surah, 20, Some(&prev));
        assert_eq!(r.progress, 6);
        assert_eq!(r.unit, GoalUnit::Surah);
        assert!(!completion_transition(Some(&prev), &r));

        let lowered = create_or_replace_goal(day(1), GoalUnit::Pages, 5, Some(&prev));
        assert_eq!(lowered.progress, 5);
        assert!(lowered.completed);
        assert!(completion_transition(Some(&prev), &lowered));
    }

    #[test]
    fn new_period_resets_progress() {
        let prev = record(10, 10, true);
        let r = create_or_replace_goal(day(2), GoalUnit::Pages, 10, Some(&prev));
        assert_eq!(r.progress, 0);
        assert!(!r.completed);
    }

    #[test]
    fn set_progress_uses_same_rules() {
        let (r, fired) = set_progress(&record(3, 1, false), 3);
        assert!(fired);
        let (r, fired) = set_progress(&r, 0);
        assert_eq!(r.progress, 0);
        assert!(r.completed);
        assert!(!fired);
    }
}
