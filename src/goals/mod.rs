pub mod azkar;
pub mod rewards;
pub mod service;
pub mod tracker;

pub use rewards::{RewardRule, RewardSource, ScoreBucket, apply_to_profile, rule_for};
pub use tracker::{
    GoalState, apply_progress_delta, completion_transition, create_or_replace_goal, set_progress,
    state_of,
};
