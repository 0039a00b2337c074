use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use std::str::FromStr;

use crate::goals::azkar::AzkarDay;
use crate::goals::rewards::{RewardRule, ScoreBucket};
use crate::models::{
    GoalRecord, GoalUnit, PeriodKey, ProfileScore, StoreKey, StreakData, StreakKind, UserId,
};

// ─── Goals ───────────────────────────────────────────────────────────────────

pub struct GoalRepo;

impl GoalRepo {
    pub fn get(conn: &Connection, key: &StoreKey) -> Result<Option<GoalRecord>> {
        let row = conn
            .query_row(
                "SELECT unit, target, progress, completed FROM goals
                 WHERE user_id = ?1 AND period_kind = ?2 AND period_value = ?3",
                params![key.user.as_str(), key.period.kind().as_str(), key.period.value()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, u32>(2)?,
                        row.get::<_, i32>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((unit, target, progress, completed)) => Ok(Some(GoalRecord {
                unit: GoalUnit::from_str(&unit)
                    .with_context(|| format!("Stored goal {} has a bad unit", key.period))?,
                target,
                progress,
                completed: completed != 0,
                period: key.period,
            })),
        }
    }

    pub fn put(conn: &Connection, key: &StoreKey, record: &GoalRecord) -> Result<()> {
        conn.execute(
            "INSERT INTO goals (user_id, period_kind, period_value, unit, target, progress, completed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(user_id, period_kind, period_value) DO UPDATE SET
                unit = ?4, target = ?5, progress = ?6, completed = ?7,
                updated_at = datetime('now')",
            params![
                key.user.as_str(),
                key.period.kind().as_str(),
                key.period.value(),
                record.unit.as_str(),
                record.target,
                record.progress,
                record.completed as i32,
            ],
        )?;
        Ok(())
    }
}

// ─── Profiles ────────────────────────────────────────────────────────────────

pub struct ProfileRepo;

impl ProfileRepo {
    pub fn get(conn: &Connection, user: &UserId) -> Result<Option<ProfileScore>> {
        conn.query_row(
            "SELECT name, total_score, daily_score, weekly_score,
                    streak_quran, streak_azkar, streak_salah, streak_total
             FROM profiles WHERE user_id = ?1",
            params![user.as_str()],
            |row| {
                Ok(ProfileScore {
                    user: user.clone(),
                    name: row.get(0)?,
                    total_score: row.get(1)?,
                    daily_score: row.get(2)?,
                    weekly_score: row.get(3)?,
                    streaks: StreakData {
                        quran: row.get(4)?,
                        azkar: row.get(5)?,
                        salah: row.get(6)?,
                        total: row.get(7)?,
                    },
                })
            },
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn get_or_create(conn: &Connection, user: &UserId, name: &str) -> Result<ProfileScore> {
        conn.execute(
            "INSERT OR IGNORE INTO profiles (user_id, name) VALUES (?1, ?2)",
            params![user.as_str(), name],
        )?;
        Self::get(conn, user)?.with_context(|| format!("Profile for {} vanished", user))
    }

    /// Award a completion at most once per (user, source, period).
    ///
    /// The ledger insert and the score increments run in one transaction and
    /// the increments are done in SQL, so concurrent completions cannot lose
    /// each other's points. Returns false when the award was already given.
    /// The profile must exist (see [`ProfileRepo::get_or_create`]); otherwise
    /// nothing is written and an error is returned.
    pub fn apply_reward(
        conn: &Connection,
        user: &UserId,
        source: &str,
        period: &PeriodKey,
        rule: &RewardRule,
    ) -> Result<bool> {
        let tx = conn.unchecked_transaction()?;

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO reward_ledger (user_id, source, period_kind, period_value, points)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user.as_str(), source, period.kind().as_str(), period.value(), rule.points],
        )?;
        if inserted == 0 {
            log::debug!("{} already rewarded for {} {}", user, source, period);
            return Ok(false);
        }

        let (daily, weekly) = match rule.bucket {
            ScoreBucket::Daily => (rule.points, 0),
            ScoreBucket::Weekly => (0, rule.points),
            ScoreBucket::TotalOnly => (0, 0),
        };
        let streak = |kind: StreakKind| i64::from(rule.streak == Some(kind));

        let updated = tx.execute(
            "UPDATE profiles SET
                total_score  = total_score + ?2,
                daily_score  = daily_score + ?3,
                weekly_score = weekly_score + ?4,
                streak_quran = streak_quran + ?5,
                streak_azkar = streak_azkar + ?6,
                streak_salah = streak_salah + ?7,
                streak_total = streak_total + ?8
             WHERE user_id = ?1",
            params![
                user.as_str(),
                rule.points,
                daily,
                weekly,
                streak(StreakKind::Quran),
                streak(StreakKind::Azkar),
                streak(StreakKind::Salah),
                i64::from(rule.streak.is_some()),
            ],
        )?;
        if updated == 0 {
            // Dropping the transaction rolls the ledger row back.
            return Err(anyhow!("No profile for {}; {} not rewarded", user, source));
        }
        tx.commit()?;

        log::info!("{} +{} points for {} {}", user, rule.points, source, period);
        Ok(true)
    }

    pub fn reset_daily(conn: &Connection, user: &UserId) -> Result<()> {
        conn.execute(
            "UPDATE profiles SET daily_score = 0 WHERE user_id = ?1",
            params![user.as_str()],
        )?;
        Ok(())
    }

    pub fn reset_weekly(conn: &Connection, user: &UserId) -> Result<()> {
        conn.execute(
            "UPDATE profiles SET weekly_score = 0 WHERE user_id = ?1",
            params![user.as_str()],
        )?;
        Ok(())
    }
}

// ─── Azkar ───────────────────────────────────────────────────────────────────

pub struct AzkarRepo;

impl AzkarRepo {
    pub fn load_day(conn: &Connection, user: &UserId, date: NaiveDate) -> Result<AzkarDay> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let row = conn
            .query_row(
                "SELECT counts, completed FROM azkar_days WHERE user_id = ?1 AND date = ?2",
                params![user.as_str(), date_str],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            None => Ok(AzkarDay::new(date)),
            Some((counts, completed)) => Ok(AzkarDay {
                date: Some(date),
                counts: serde_json::from_str(&counts)
                    .with_context(|| format!("Parsing azkar counts for {}", date_str))?,
                completed: serde_json::from_str(&completed)
                    .with_context(|| format!("Parsing azkar completion for {}", date_str))?,
            }),
        }
    }

    pub fn save_day(conn: &Connection, user: &UserId, date: NaiveDate, day: &AzkarDay) -> Result<()> {
        let counts = serde_json::to_string(&day.counts)?;
        let completed = serde_json::to_string(&day.completed)?;
        conn.execute(
            "INSERT INTO azkar_days (user_id, date, counts, completed) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id, date) DO UPDATE SET
                counts = ?3, completed = ?4, updated_at = datetime('now')",
            params![user.as_str(), date.format("%Y-%m-%d").to_string(), counts, completed],
        )?;
        Ok(())
    }
}

// ─── App meta ────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::PeriodKind;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
    }

    #[test]
    fn goal_put_then_get() {
        let conn = conn();
        let key = StoreKey::new(UserId::new("u1"), PeriodKey::for_date(PeriodKind::Weekly, date()));
        assert!(GoalRepo::get(&conn, &key).unwrap().is_none());

        let record = GoalRecord {
            unit: GoalUnit::Juz,
            target: 3,
            progress: 1,
            completed: false,
            period: key.period,
        };
        GoalRepo::put(&conn, &key, &record).unwrap();
        assert_eq!(GoalRepo::get(&conn, &key).unwrap(), Some(record.clone()));

        let other_user = StoreKey::new(UserId::new("u2"), key.period);
        assert!(GoalRepo::get(&conn, &other_user).unwrap().is_none());
    }

    #[test]
    fn reward_is_applied_once_per_period() {
        let conn = conn();
        let user = UserId::new("u1");
        ProfileRepo::get_or_create(&conn, &user, "Amina").unwrap();
        let period = PeriodKey::for_date(PeriodKind::Daily, date());
        let rule = RewardRule {
            points: 50,
            bucket: ScoreBucket::Daily,
            streak: Some(StreakKind::Quran),
        };

        assert!(ProfileRepo::apply_reward(&conn, &user, "quran:daily", &period, &rule).unwrap());
        assert!(!ProfileRepo::apply_reward(&conn, &user, "quran:daily", &period, &rule).unwrap());

        let p = ProfileRepo::get(&conn, &user).unwrap().unwrap();
        assert_eq!(p.name, "Amina");
        assert_eq!((p.total_score, p.daily_score, p.weekly_score), (50, 50, 0));
        assert_eq!(p.streaks, StreakData { quran: 1, azkar: 0, salah: 0, total: 1 });
    }

    #[test]
    fn reward_without_profile_leaves_ledger_untouched() {
        let conn = conn();
        let user = UserId::new("ghost");
        let period = PeriodKey::for_date(PeriodKind::Monthly, date());
        let rule = RewardRule {
            points: 300,
            bucket: ScoreBucket::TotalOnly,
            streak: None,
        };
        assert!(ProfileRepo::apply_reward(&conn, &user, "quran:monthly", &period, &rule).is_err());
        assert!(ProfileRepo::get(&conn, &user).unwrap().is_none());

        // Once the profile exists the same award still goes through.
        ProfileRepo::get_or_create(&conn, &user, "Khadija").unwrap();
        assert!(ProfileRepo::apply_reward(&conn, &user, "quran:monthly", &period, &rule).unwrap());
        let p = ProfileRepo::get(&conn, &user).unwrap().unwrap();
        assert_eq!(p.name, "Khadija");
        assert_eq!((p.total_score, p.daily_score), (300, 0));
        assert_eq!(p.streaks.total, 0);
    }

    #[test]
    fn azkar_day_survives_a_round_trip() {
        let conn = conn();
        let user = UserId::new("u1");
        let mut day = AzkarRepo::load_day(&conn, &user, date()).unwrap();
        assert!(day.counts.is_empty());
        day.tap("sleep", "sl1", 1).unwrap();
        day.tap("sleep", "sl2", 33).unwrap();
        AzkarRepo::save_day(&conn, &user, date(), &day).unwrap();

        let loaded = AzkarRepo::load_day(&conn, &user, date()).unwrap();
        assert_eq!(loaded, day);
        assert!(loaded.is_completed("sleep"));
    }

    #[test]
    fn meta_set_overwrites() {
        let conn = conn();
        MetaRepo::set(&conn, "k", "1").unwrap();
        MetaRepo::set(&conn, "k", "2").unwrap();
        assert_eq!(MetaRepo::get(&conn, "k").unwrap().as_deref(), Some("2"));
        assert!(MetaRepo::get(&conn, "missing").unwrap().is_none());
    }
}
