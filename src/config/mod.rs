pub mod settings;

pub use settings::{AppConfig, DefaultsConfig, PointsConfig, ScheduleConfig, UserConfig};
