//! One user interaction at a time: read the stored record, compute the next
//! state with the pure tracker, persist it, then apply any reward.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::config::PointsConfig;
use crate::db::{AzkarRepo, GoalRepo, MetaRepo, ProfileRepo};
use crate::error::FaithError;
use crate::goals::azkar::{self, AzkarDay, TapOutcome};
use crate::goals::rewards::{RewardSource, rule_for};
use crate::goals::tracker::{apply_progress_delta, completion_transition, create_or_replace_goal, set_progress};
use crate::models::{GoalRecord, GoalUnit, PeriodKey, PeriodKind, StoreKey, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalOutcome {
    pub record: GoalRecord,
    /// This interaction completed the goal.
    pub reward_fired: bool,
    /// Points were written to the profile on this call.
    pub reward_applied: bool,
    /// The reward write failed after the record was saved.
    pub reward_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzkarOutcome {
    pub tap: TapOutcome,
    pub reward_applied: bool,
    pub reward_error: Option<String>,
}

pub fn load_goal(conn: &Connection, key: &StoreKey) -> Result<Option<GoalRecord>> {
    GoalRepo::get(conn, key)
}

/// Create the goal for `key`, or edit it in place. With `reset` the earlier
/// progress is dropped even within the same period.
///
/// Fails with [`FaithError::UnitNotAllowed`] when `unit` does not fit the
/// period (monthly goals count completions, the others count text).
pub fn set_goal(
    conn: &Connection,
    key: &StoreKey,
    unit: GoalUnit,
    target: u32,
    reset: bool,
    points: &PointsConfig,
) -> Result<GoalOutcome> {
    let kind = key.period.kind();
    if !unit.allowed_for(kind) {
        return Err(FaithError::UnitNotAllowed {
            unit: unit.as_str(),
            period: kind.as_str(),
        }
        .into());
    }
    let existing = GoalRepo::get(conn, key)?;
    let carried = if reset { None } else { existing.as_ref() };
    let record = create_or_replace_goal(key.period, unit, target, carried);
    GoalRepo::put(conn, key, &record)?;
    log::info!("{} goal set for {}: {} {}", key.period.kind(), key.user, record.target, record.unit);

    let fired = completion_transition(existing.as_ref(), &record);
    Ok(finish_goal(conn, key, record, fired, points))
}

/// Add `delta` to the goal for `key`. `None` when no goal is set yet.
pub fn record_progress(
    conn: &Connection,
    key: &StoreKey,
    delta: i64,
    points: &PointsConfig,
) -> Result<Option<GoalOutcome>> {
    let Some(current) = GoalRepo::get(conn, key)? else {
        return Ok(None);
    };
    let (record, fired) = apply_progress_delta(&current, delta);
    GoalRepo::put(conn, key, &record)?;
    Ok(Some(finish_goal(conn, key, record, fired, points)))
}

/// Set the goal's progress to an absolute value.
pub fn record_absolute_progress(
    conn: &Connection,
    key: &StoreKey,
    value: u32,
    points: &PointsConfig,
) -> Result<Option<GoalOutcome>> {
    let Some(current) = GoalRepo::get(conn, key)? else {
        return Ok(None);
    };
    let (record, fired) = set_progress(&current, value);
    GoalRepo::put(conn, key, &record)?;
    Ok(Some(finish_goal(conn, key, record, fired, points)))
}

fn finish_goal(
    conn: &Connection,
    key: &StoreKey,
    record: GoalRecord,
    fired: bool,
    points: &PointsConfig,
) -> GoalOutcome {
    let mut outcome = GoalOutcome {
        record,
        reward_fired: fired,
        reward_applied: false,
        reward_error: None,
    };
    if fired {
        let source = RewardSource::Quran(key.period.kind());
        match grant(conn, &key.user, &source, &key.period, points) {
            Ok(applied) => outcome.reward_applied = applied,
            Err(e) => outcome.reward_error = Some(e.to_string()),
        }
    }
    outcome
}

/// Best-effort reward: failures are logged and handed back, not raised.
fn grant(
    conn: &Connection,
    user: &UserId,
    source: &RewardSource,
    period: &PeriodKey,
    points: &PointsConfig,
) -> Result<bool> {
    let rule = rule_for(source, points);
    ProfileRepo::apply_reward(conn, user, &source.id(), period, &rule).inspect_err(|e| {
        log::warn!("Reward for {} {} not saved: {:#}", source.id(), period, e);
    })
}

pub fn load_azkar(conn: &Connection, user: &UserId, date: NaiveDate) -> Result<AzkarDay> {
    AzkarRepo::load_day(conn, user, date)
}

pub fn tap_azkar(
    conn: &Connection,
    user: &UserId,
    date: NaiveDate,
    category: &str,
    item: &str,
    times: u32,
    points: &PointsConfig,
) -> Result<AzkarOutcome> {
    let mut day = AzkarRepo::load_day(conn, user, date)?;
    let tap = day.tap(category, item, times)?;
    AzkarRepo::save_day(conn, user, date, &day)?;

    let mut outcome = AzkarOutcome {
        tap,
        reward_applied: false,
        reward_error: None,
    };
    if outcome.tap.category_completed {
        let cat = azkar::category(category)?;
        let source = RewardSource::Azkar(cat.id.to_string());
        let period = PeriodKey::for_date(PeriodKind::Daily, date);
        match grant(conn, user, &source, &period, points) {
            Ok(applied) => outcome.reward_applied = applied,
            Err(e) => outcome.reward_error = Some(e.to_string()),
        }
    }
    Ok(outcome)
}

/// Clear a category for the day. Points already awarded stay awarded, and
/// completing the category again the same day does not pay out again.
pub fn reset_azkar(conn: &Connection, user: &UserId, date: NaiveDate, category: &str) -> Result<()> {
    let mut day = AzkarRepo::load_day(conn, user, date)?;
    day.reset(category)?;
    AzkarRepo::save_day(conn, user, date, &day)
}

/// Re-apply rewards for completions in the current periods whose reward
/// never reached the profile. Returns how many were applied.
pub fn sync_rewards(
    conn: &Connection,
    user: &UserId,
    today: NaiveDate,
    points: &PointsConfig,
) -> Result<u32> {
    let mut applied = 0;

    for kind in PeriodKind::all() {
        let key = StoreKey::new(user.clone(), PeriodKey::for_date(kind, today));
        if let Some(record) = GoalRepo::get(conn, &key)? {
            if record.completed {
                let rule = rule_for(&RewardSource::Quran(kind), points);
                let source = RewardSource::Quran(kind).id();
                if ProfileRepo::apply_reward(conn, user, &source, &key.period, &rule)? {
                    applied += 1;
                }
            }
        }
    }

    let day = AzkarRepo::load_day(conn, user, today)?;
    let period = PeriodKey::for_date(PeriodKind::Daily, today);
    for category in &day.completed {
        let source = RewardSource::Azkar(category.clone());
        let rule = rule_for(&source, points);
        if ProfileRepo::apply_reward(conn, user, &source.id(), &period, &rule)? {
            applied += 1;
        }
    }

    if applied > 0 {
        log::info!("Synced {} missing reward(s) for {}", applied, user);
    }
    Ok(applied)
}

/// Zero the daily and weekly scores when their period has rolled over since
/// the last run.
pub fn roll_period_scores(conn: &Connection, user: &UserId, today: NaiveDate) -> Result<()> {
    for kind in [PeriodKind::Daily, PeriodKind::Weekly] {
        let meta_key = format!("score_period:{}:{}", kind, user);
        let current = PeriodKey::for_date(kind, today);
        let Some(stored) = MetaRepo::get(conn, &meta_key)? else {
            MetaRepo::set(conn, &meta_key, &current.value())?;
            continue;
        };
        let last = PeriodKey::parse(kind, &stored)
            .inspect_err(|e| log::warn!("Ignoring stored score period: {}", e))
            .ok();
        if last == Some(current) {
            continue;
        }
        match kind {
            PeriodKind::Daily => ProfileRepo::reset_daily(conn, user)?,
            _ => ProfileRepo::reset_weekly(conn, user)?,
        }
        log::debug!("{} score reset for {} ({})", kind, user, current);
        MetaRepo::set(conn, &meta_key, &current.value())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;

    fn setup() -> (Connection, UserId, NaiveDate) {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let user = UserId::new("u1");
        ProfileRepo::get_or_create(&conn, &user, "U").unwrap();
        (conn, user, NaiveDate::from_ymd_opt(2026, 3, 4).unwrap())
    }

    #[test]
    fn progress_without_goal_is_none() {
        let (conn, user, date) = setup();
        let key = StoreKey::new(user, PeriodKey::for_date(PeriodKind::Daily, date));
        let out = record_progress(&conn, &key, 5, &PointsConfig::default()).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn set_goal_rejects_unit_that_does_not_fit_period() {
        let (conn, user, date) = setup();
        let points = PointsConfig::default();
        let monthly = StoreKey::new(user.clone(), PeriodKey::for_date(PeriodKind::Monthly, date));
        let err = set_goal(&conn, &monthly, GoalUnit::Pages, 20, false, &points).unwrap_err();
        assert_eq!(
            err.downcast_ref::<FaithError>(),
            Some(&FaithError::UnitNotAllowed { unit: "pages", period: "monthly" })
        );
        assert!(load_goal(&conn, &monthly).unwrap().is_none());

        let daily = StoreKey::new(user, PeriodKey::for_date(PeriodKind::Daily, date));
        assert!(set_goal(&conn, &daily, GoalUnit::Completions, 1, false, &points).is_err());
        assert!(load_goal(&conn, &daily).unwrap().is_none());
    }

    #[test]
    fn lowering_target_below_progress_pays_out() {
        let (conn, user, date) = setup();
        let points = PointsConfig::default();
        let key = StoreKey::new(user.clone(), PeriodKey::for_date(PeriodKind::Daily, date));
        set_goal(&conn, &key, GoalUnit::Pages, 10, false, &points).unwrap();
        record_progress(&conn, &key, 6, &points).unwrap();

        let out = set_goal(&conn, &key, GoalUnit::Pages, 5, false, &points).unwrap();
        assert!(out.reward_fired);
        assert!(out.reward_applied);
        assert_eq!(ProfileRepo::get(&conn, &user).unwrap().unwrap().total_score, 50);
    }

    #[test]
    fn score_roll_over_resets_daily_only_on_new_day() {
        let (conn, user, date) = setup();
        roll_period_scores(&conn, &user, date).unwrap();
        conn.execute("UPDATE profiles SET daily_score = 40, weekly_score = 40", []).unwrap();

        roll_period_scores(&conn, &user, date).unwrap();
        assert_eq!(ProfileRepo::get(&conn, &user).unwrap().unwrap().daily_score, 40);

        // 2026-03-05 is a Thursday, same week
        let next = date.succ_opt().unwrap();
        roll_period_scores(&conn, &user, next).unwrap();
        let p = ProfileRepo::get(&conn, &user).unwrap().unwrap();
        assert_eq!((p.daily_score, p.weekly_score), (0, 40));
        assert_eq!(
            MetaRepo::get(&conn, "score_period:daily:u1").unwrap().as_deref(),
            Some("2026-03-05")
        );
    }

    #[test]
    fn unreadable_stored_period_counts_as_roll_over() {
        let (conn, user, date) = setup();
        MetaRepo::set(&conn, "score_period:weekly:u1", "2026-03-03").unwrap();
        MetaRepo::set(&conn, "score_period:daily:u1", "not-a-date").unwrap();
        conn.execute("UPDATE profiles SET daily_score = 15, weekly_score = 15", []).unwrap();

        // 2026-03-03 is a Tuesday, so it is not a valid week start.
        roll_period_scores(&conn, &user, date).unwrap();
        let p = ProfileRepo::get(&conn, &user).unwrap().unwrap();
        assert_eq!((p.daily_score, p.weekly_score), (0, 0));
        assert_eq!(
            MetaRepo::get(&conn, "score_period:weekly:u1").unwrap().as_deref(),
            Some("2026-03-01")
        );
    }
}
