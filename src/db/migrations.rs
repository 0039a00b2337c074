use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS goals (
            user_id       TEXT NOT NULL,
            period_kind   TEXT NOT NULL CHECK(period_kind IN ('daily','weekly','monthly')),
            period_value  TEXT NOT NULL,
            unit          TEXT NOT NULL CHECK(unit IN ('pages','juz','surah','completions')),
            target        INTEGER NOT NULL CHECK(target >= 1),
            progress      INTEGER NOT NULL DEFAULT 0 CHECK(progress >= 0 AND progress <= target),
            completed     INTEGER NOT NULL DEFAULT 0,
            updated_at    TEXT DEFAULT (datetime('now')),
            PRIMARY KEY (user_id, period_kind, period_value)
        );

        CREATE TABLE IF NOT EXISTS profiles (
            user_id       TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            total_score   INTEGER NOT NULL DEFAULT 0,
            daily_score   INTEGER NOT NULL DEFAULT 0,
            weekly_score  INTEGER NOT NULL DEFAULT 0,
            streak_quran  INTEGER NOT NULL DEFAULT 0,
            streak_azkar  INTEGER NOT NULL DEFAULT 0,
            streak_salah  INTEGER NOT NULL DEFAULT 0,
            streak_total  INTEGER NOT NULL DEFAULT 0,
            created_at    TEXT DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS azkar_days (
            user_id    TEXT NOT NULL,
            date       TEXT NOT NULL,
            counts     TEXT NOT NULL DEFAULT '{}',
            completed  TEXT NOT NULL DEFAULT '[]',
            updated_at TEXT DEFAULT (datetime('now')),
            PRIMARY KEY (user_id, date)
        );

        CREATE TABLE IF NOT EXISTS reward_ledger (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id       TEXT NOT NULL,
            source        TEXT NOT NULL,
            period_kind   TEXT NOT NULL,
            period_value  TEXT NOT NULL,
            points        INTEGER NOT NULL,
            awarded_at    TEXT DEFAULT (datetime('now')),
            UNIQUE(user_id, source, period_kind, period_value)
        );

        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );
    ")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        let n: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                 ('goals','profiles','azkar_days','reward_ledger','app_meta')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(n, 5);
    }
}
