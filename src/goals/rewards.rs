use crate::config::PointsConfig;
use crate::models::{PeriodKind, ProfileScore, StreakKind};

/// What completed: a Quran goal for a period, or an Azkar category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardSource {
    Quran(PeriodKind),
    Azkar(String),
}

impl RewardSource {
    /// Stable id stored in the reward ledger.
    pub fn id(&self) -> String {
        match self {
            RewardSource::Quran(kind) => format!("quran:{}", kind),
            RewardSource::Azkar(category) => format!("azkar:{}", category),
        }
    }
}

/// Which period score, besides the total, receives the points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBucket {
    Daily,
    Weekly,
    TotalOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardRule {
    pub points: i64,
    pub bucket: ScoreBucket,
    pub streak: Option<StreakKind>,
}

pub fn rule_for(source: &RewardSource, points: &PointsConfig) -> RewardRule {
    match source {
        RewardSource::Quran(PeriodKind::Daily) => RewardRule {
            points: points.quran_daily,
            bucket: ScoreBucket::Daily,
            streak: Some(StreakKind::Quran),
        },
        RewardSource::Quran(PeriodKind::Weekly) => RewardRule {
            points: points.quran_weekly,
            bucket: ScoreBucket::Weekly,
            streak: None,
        },
        RewardSource::Quran(PeriodKind::Monthly) => RewardRule {
            points: points.quran_monthly,
            bucket: ScoreBucket::TotalOnly,
            streak: None,
        },
        RewardSource::Azkar(category) => RewardRule {
            points: points.azkar.get(category).copied().unwrap_or(0),
            bucket: ScoreBucket::Daily,
            streak: Some(StreakKind::Azkar),
        },
    }
}

/// In-memory form of the reward; the store applies the same increments.
pub fn apply_to_profile(profile: &mut ProfileScore, rule: &RewardRule) {
    profile.total_score += rule.points;
    match rule.bucket {
        ScoreBucket::Daily => profile.daily_score += rule.points,
        ScoreBucket::Weekly => profile.weekly_score += rule.points,
        ScoreBucket::TotalOnly => {}
    }
    if let Some(kind) = rule.streak {
        match kind {
            StreakKind::Quran => profile.streaks.quran += 1,
            StreakKind::Azkar => profile.streaks.azkar += 1,
            StreakKind::Salah => profile.streaks.salah += 1,
        }
        profile.streaks.total += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;

    #[test]
    fn daily_quran_awards_fifty_and_quran_streak() {
        let points = PointsConfig::default();
        let rule = rule_for(&RewardSource::Quran(PeriodKind::Daily), &points);
        let mut p = ProfileScore::new(UserId::new("u"), "U");
        apply_to_profile(&mut p, &rule);
        assert_eq!(p.total_score, 50);
        assert_eq!(p.daily_score, 50);
        assert_eq!(p.streaks.quran, 1);
        assert_eq!(p.streaks.total, 1);
        assert_eq!(p.streaks.azkar, 0);
    }

    #[test]
    fn azkar_category_points_come_from_config() {
        let points = PointsConfig::default();
        let rule = rule_for(&RewardSource::Azkar("after_salah".into()), &points);
        assert_eq!(rule.points, 15);
        assert_eq!(rule.streak, Some(StreakKind::Azkar));
        assert_eq!(rule_for(&RewardSource::Azkar("unknown".into()), &points).points, 0);
    }

    #[test]
    fn weekly_points_go_to_weekly_score_without_streak() {
        let points = PointsConfig {
            quran_weekly: 100,
            ..PointsConfig::default()
        };
        let rule = rule_for(&RewardSource::Quran(PeriodKind::Weekly), &points);
        let mut p = ProfileScore::new(UserId::new("u"), "U");
        apply_to_profile(&mut p, &rule);
        assert_eq!((p.total_score, p.daily_score, p.weekly_score), (100, 0, 100));
        assert_eq!(p.streaks.total, 0);
    }

    #[test]
    fn source_ids() {
        assert_eq!(RewardSource::Quran(PeriodKind::Monthly).id(), "quran:monthly");
        assert_eq!(RewardSource::Azkar("sleep".into()).id(), "azkar:sleep");
    }
}
