use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use std::str::FromStr;

use ramadan_faith::config::AppConfig;
use ramadan_faith::goals::azkar::{self, CATALOGUE};
use ramadan_faith::db::ProfileRepo;
use ramadan_faith::goals::service::{self, GoalOutcome};
use ramadan_faith::models::{GoalUnit, PeriodKey, PeriodKind, StoreKey, TimeOfDay, UserId};
use ramadan_faith::prayer_times::{
    ScheduleSource, full_year, resolve_current_and_next, source_from_config,
    try_resolve_month_schedule,
};
use ramadan_faith::utils::format::progress_bar;

use crate::cli::args::{AzkarCommands, ProfileCommands, QuranCommands};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(config: &AppConfig, at: Option<&str>, month: Option<u32>) -> Result<()> {
    let now = match at {
        Some(s) => TimeOfDay::parse(s)?,
        None => TimeOfDay::from(Local::now().time()),
    };
    let snapshot = match month {
        Some(m) => try_resolve_month_schedule(m)?,
        None => source_from_config(&config.schedule)?.snapshot_for(today()),
    };
    let info = resolve_current_and_next(&snapshot, now);

    println!();
    println_colored!(GOLD, "  Prayer Times — month {} ({})", snapshot.month, now);
    println!();
    for entry in &snapshot.entries {
        let is_current = info.current.as_ref().is_some_and(|c| c.name == entry.name);
        let line = format!(
            "  {} {:<8} {:<7} {:>8}",
            entry.icon, entry.name, entry.arabic, entry.display
        );
        if is_current {
            println_colored!(GREEN, "{}  ← now", line);
        } else if entry.name == info.next.name {
            println_colored!(BOLD, "{}", line);
        } else {
            println_colored!(DIM, "{}", line);
        }
    }
    println!();
    println_colored!(AMBER, "  Next: {} in {}", info.next.name, info.countdown);
    println!();
    Ok(())
}

pub fn handle_schedule() -> Result<()> {
    println!();
    println_colored!(GOLD, "  Month   Fajr      Dhuhr     Asr       Maghrib   Isha");
    for snap in full_year() {
        let cols: Vec<String> = snap.entries.iter().map(|e| format!("{:<9}", e.display)).collect();
        println!("  {:>5}   {}", snap.month, cols.join(" "));
    }
    println!();
    Ok(())
}

// ─── Quran ───────────────────────────────────────────────────────────────────

pub fn handle_quran(
    conn: &Connection,
    config: &AppConfig,
    user: &UserId,
    action: &QuranCommands,
) -> Result<()> {
    let today = today();
    let key_for = |kind: PeriodKind| StoreKey::new(user.clone(), PeriodKey::for_date(kind, today));

    match action {
        QuranCommands::Show => {
            println!();
            println_colored!(GOLD, "  Quran Challenge");
            for kind in PeriodKind::all() {
                println!();
                print_goal(conn, &key_for(kind))?;
            }
            println!();
        }
        QuranCommands::Set {
            period,
            unit,
            target,
            reset,
        } => {
            let kind = PeriodKind::from_str(period)?;
            let unit = match (kind, unit) {
                (_, Some(u)) => GoalUnit::from_str(u)?,
                (PeriodKind::Monthly, None) => GoalUnit::Completions,
                (_, None) => GoalUnit::Pages,
            };
            let target = target.unwrap_or(match kind {
                PeriodKind::Daily => config.defaults.daily_target,
                PeriodKind::Weekly => config.defaults.weekly_target,
                PeriodKind::Monthly => config.defaults.monthly_target,
            });
            let out = service::set_goal(conn, &key_for(kind), unit, target, *reset, &config.points)?;
            println_colored!(
                GREEN,
                "  ✓ {} goal: {} {}",
                kind,
                out.record.target,
                out.record.unit.label(out.record.target)
            );
            report_reward(config, kind, &out);
        }
        QuranCommands::Add { period, amount } => {
            let kind = PeriodKind::from_str(period)?;
            progress(conn, config, &key_for(kind), |unit| amount.unwrap_or(unit.step() as i64))?;
        }
        QuranCommands::Undo { period } => {
            let kind = PeriodKind::from_str(period)?;
            progress(conn, config, &key_for(kind), |_| -1)?;
        }
        QuranCommands::Completions { count } => {
            let key = key_for(PeriodKind::Monthly);
            match service::record_absolute_progress(conn, &key, *count, &config.points)? {
                None => println_colored!(AMBER, "  No monthly goal yet. Use `quran set monthly`."),
                Some(out) => {
                    println_colored!(
                        GREEN,
                        "  ✓ {}/{} completions this month",
                        out.record.progress,
                        out.record.target
                    );
                    report_reward(config, PeriodKind::Monthly, &out);
                }
            }
        }
    }
    Ok(())
}

fn progress(
    conn: &Connection,
    config: &AppConfig,
    key: &StoreKey,
    delta_for: impl Fn(GoalUnit) -> i64,
) -> Result<()> {
    let kind = key.period.kind();
    let Some(current) = service::load_goal(conn, key)? else {
        println_colored!(AMBER, "  No {} goal yet. Use `quran set {}`.", kind, kind);
        return Ok(());
    };
    let delta = delta_for(current.unit);
    let out = service::record_progress(conn, key, delta, &config.points)?
        .ok_or_else(|| anyhow!("{} goal disappeared while updating", kind))?;
    let r = &out.record;
    println_colored!(
        BOLD,
        "  {} {}/{} {}  {}",
        progress_bar(r.progress, r.target, 12),
        r.progress,
        r.target,
        r.unit.label(r.target),
        if r.completed { "✓" } else { "" }
    );
    report_reward(config, kind, &out);
    Ok(())
}

fn report_reward(config: &AppConfig, kind: PeriodKind, out: &GoalOutcome) {
    if !out.reward_fired {
        return;
    }
    let points = match kind {
        PeriodKind::Daily => config.points.quran_daily,
        PeriodKind::Weekly => config.points.quran_weekly,
        PeriodKind::Monthly => config.points.quran_monthly,
    };
    if let Some(err) = &out.reward_error {
        println_colored!(RED, "  ✗ Goal complete, but points were not saved: {}", err);
        println_colored!(DIM, "    Run `profile sync` to retry.");
    } else if out.reward_applied {
        println_colored!(GOLD, "  🎉 {} goal complete! +{} SAS Points", kind, points);
    } else {
        println_colored!(GREEN, "  ✓ {} goal complete (already rewarded)", kind);
    }
}

fn print_goal(conn: &Connection, key: &StoreKey) -> Result<()> {
    let kind = key.period.kind();
    match service::load_goal(conn, key)? {
        None => println_colored!(DIM, "  {:<8} not set", kind),
        Some(r) => {
            let status = if r.completed {
                format!("{}✓ complete\x1b[0m", GREEN)
            } else {
                format!("{} {} remaining", r.remaining(), r.unit.label(r.remaining()))
            };
            println!(
                "  {:<8} {} {}/{} {} ({}%)  {}",
                kind,
                progress_bar(r.progress, r.target, 12),
                r.progress,
                r.target,
                r.unit.label(r.target),
                r.percent(),
                status
            );
            if kind == PeriodKind::Daily {
                let split: Vec<String> = r
                    .prayer_distribution()
                    .iter()
                    .map(|(p, n)| format!("{} {}", p, n))
                    .collect();
                println_colored!(DIM, "           after each prayer: {}", split.join(" · "));
            }
            if let Some((n, unit)) = r.daily_pace() {
                println_colored!(DIM, "           pace: {} {} per day", n, unit.label(n));
            }
        }
    }
    Ok(())
}

// ─── Azkar ───────────────────────────────────────────────────────────────────

pub fn handle_azkar(
    conn: &Connection,
    config: &AppConfig,
    user: &UserId,
    action: &AzkarCommands,
) -> Result<()> {
    let today = today();

    match action {
        AzkarCommands::List { category: None } => {
            let day = service::load_azkar(conn, user, today)?;
            println!();
            println_colored!(GOLD, "  Azkar — {}", today.format("%Y-%m-%d"));
            println!();
            for cat in CATALOGUE {
                let (done, total) = day.category_progress(cat);
                let points = config.points.azkar.get(cat.id).copied().unwrap_or(0);
                let status = if day.is_completed(cat.id) {
                    format!("{}✓\x1b[0m", GREEN)
                } else {
                    format!("{}/{}", done, total)
                };
                println!(
                    "  {} {:<14} {:<12} +{:<3} {}",
                    cat.icon, cat.title, cat.id, points, status
                );
            }
            println!();
        }
        AzkarCommands::List {
            category: Some(name),
        } => {
            let cat = azkar::category(name)?;
            let day = service::load_azkar(conn, user, today)?;
            println!();
            println_colored!(GOLD, "  {} {} ({})", cat.icon, cat.title, cat.arabic);
            println!();
            for item in cat.items {
                let count = day.count(cat.id, item.id);
                let color = if count >= item.max_count { GREEN } else { BOLD };
                println_colored!(color, "  [{}] {}/{}  {}", item.id, count, item.max_count, item.arabic);
                println_colored!(DIM, "        {}", item.transliteration);
                println_colored!(DIM, "        {}", item.translation);
            }
            println!();
        }
        AzkarCommands::Tap {
            category,
            item,
            times,
        } => {
            let out = service::tap_azkar(conn, user, today, category, item, *times, &config.points)?;
            println_colored!(AMBER, "  ◑ {} — {}/{}", item, out.tap.count, out.tap.max_count);
            if out.tap.category_completed {
                let cat = azkar::category(category)?;
                let points = config.points.azkar.get(cat.id).copied().unwrap_or(0);
                if let Some(err) = &out.reward_error {
                    println_colored!(RED, "  ✗ {} completed, but points were not saved: {}", cat.title, err);
                } else if out.reward_applied {
                    println_colored!(GOLD, "  🔥 {} completed! +{} SAS Points • Streak extended!", cat.title, points);
                } else {
                    println_colored!(GREEN, "  ✓ {} completed (already rewarded today)", cat.title);
                }
            }
        }
        AzkarCommands::Reset { category } => {
            service::reset_azkar(conn, user, today, category)?;
            println_colored!(DIM, "  ○ {} reset", category);
        }
    }
    Ok(())
}

// ─── Profile ─────────────────────────────────────────────────────────────────

pub fn handle_profile(
    conn: &Connection,
    config: &AppConfig,
    user: &UserId,
    action: Option<&ProfileCommands>,
) -> Result<()> {
    if let Some(ProfileCommands::Sync) = action {
        let n = service::sync_rewards(conn, user, today(), &config.points)?;
        println_colored!(GREEN, "  ✓ {} reward(s) applied", n);
        return Ok(());
    }

    let p = ProfileRepo::get_or_create(conn, user, &config.user.name)?;
    println!();
    println_colored!(GOLD, "  {} — {} SAS Points", p.name, p.total_score);
    println!();
    println!("  Today:       {} pts", p.daily_score);
    println!("  This week:   {} pts", p.weekly_score);
    println!();
    println_colored!(BOLD, "  Streaks (days)");
    println!("  📖 Quran  {:>4}", p.streaks.quran);
    println!("  🤲 Azkar  {:>4}", p.streaks.azkar);
    println!("  🕌 Salah  {:>4}", p.streaks.salah);
    println!("  🔥 Total  {:>4}", p.streaks.total);
    println!();
    let badges = p.badges();
    if badges.is_empty() {
        println_colored!(DIM, "  No badges yet — first at a 7 day streak");
    } else {
        for b in badges {
            println!("  {} {}", b.icon(), b.label());
        }
    }
    println!();
    Ok(())
}
