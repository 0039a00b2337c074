use serde::{Deserialize, Serialize};

use crate::models::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    Quran,
    Azkar,
    Salah,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakData {
    pub quran: u32,
    pub azkar: u32,
    pub salah: u32,
    pub total: u32,
}

/// Points and streak counters for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileScore {
    pub user: UserId,
    pub name: String,
    pub total_score: i64,
    pub daily_score: i64,
    pub weekly_score: i64,
    pub streaks: StreakData,
}

impl ProfileScore {
    pub fn new(user: UserId, name: impl Into<String>) -> Self {
        Self {
            user,
            name: name.into(),
            total_score: 0,
            daily_score: 0,
            weekly_score: 0,
            streaks: StreakData::default(),
        }
    }

    pub fn badges(&self) -> Vec<Badge> {
        Badge::all()
            .into_iter()
            .filter(|b| self.streaks.total >= b.days())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Badge {
    Warrior7,
    Champion30,
    Legend100,
}

impl Badge {
    pub fn all() -> [Badge; 3] {
        [Badge::Warrior7, Badge::Champion30, Badge::Legend100]
    }

    pub fn days(&self) -> u32 {
        match self {
            Badge::Warrior7 => 7,
            Badge::Champion30 => 30,
            Badge::Legend100 => 100,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::Warrior7 => "7-Day Warrior",
            Badge::Champion30 => "30-Day Champion",
            Badge::Legend100 => "100-Day Legend",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Badge::Warrior7 => "🥉",
            Badge::Champion30 => "🥈",
            Badge::Legend100 => "🥇",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badges_follow_total_streak() {
        let mut p = ProfileScore::new(UserId::new("u1"), "Amina");
        assert!(p.badges().is_empty());
        p.streaks.total = 30;
        assert_eq!(p.badges(), vec![Badge::Warrior7, Badge::Champion30]);
    }
}
