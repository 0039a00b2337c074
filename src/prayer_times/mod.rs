pub mod calculator;
pub mod resolver;
pub mod schedule;

pub use calculator::{CalculatedSource, ScheduleSource, TableSource, source_from_config};
pub use resolver::{minutes_until, resolve_current_and_next};
pub use schedule::{full_year, resolve_month_schedule, try_resolve_month_schedule};
pub use crate::utils::format::{format_countdown, to_12h};
