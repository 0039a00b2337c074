use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ramadan-faith", version, author, about = "Prayer times, Quran goals and Azkar tracking")]
pub struct Cli {
    /// Act as this user instead of the configured one
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show today's prayer times, the current prayer and a countdown
    Times {
        /// Evaluate at this time (HH:MM) instead of now
        #[arg(long)]
        at: Option<String>,
        /// Use this month's table (1-12) instead of the current month
        #[arg(long)]
        month: Option<u32>,
    },
    /// Show the prayer table for every month
    Schedule,
    /// Quran reading goals
    Quran {
        #[command(subcommand)]
        action: QuranCommands,
    },
    /// Azkar counters
    Azkar {
        #[command(subcommand)]
        action: AzkarCommands,
    },
    /// Show scores, streaks and badges
    Profile {
        #[command(subcommand)]
        action: Option<ProfileCommands>,
    },
}

#[derive(Subcommand, Debug)]
pub enum QuranCommands {
    /// Show daily, weekly and monthly goals
    Show,
    /// Set (or edit) the goal for a period
    Set {
        /// daily, weekly or monthly
        period: String,
        /// pages, juz or surah (monthly goals always count completions)
        #[arg(long)]
        unit: Option<String>,
        /// Target amount
        #[arg(long)]
        target: Option<u32>,
        /// Drop progress already made this period
        #[arg(long)]
        reset: bool,
    },
    /// Add progress to a goal (negative to take back)
    Add {
        /// daily, weekly or monthly
        period: String,
        /// Amount; defaults to the unit's step
        #[arg(allow_hyphen_values = true)]
        amount: Option<i64>,
    },
    /// Take back one unit of progress
    Undo {
        /// daily, weekly or monthly
        period: String,
    },
    /// Mark how many Quran completions are done this month
    Completions {
        count: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum AzkarCommands {
    /// List categories, or the items of one category
    List {
        category: Option<String>,
    },
    /// Count a recitation
    Tap {
        category: String,
        item: String,
        /// Number of recitations to add
        #[arg(long, default_value = "1")]
        times: u32,
    },
    /// Clear a category's counters for today
    Reset {
        category: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Re-apply rewards for completed goals that never reached the profile
    Sync,
}
