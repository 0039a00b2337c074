use thiserror::Error;

/// Errors raised while parsing or looking up domain values.
///
/// Persistence and configuration failures stay in `anyhow`; these are the
/// cases where user input names something that does not exist.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FaithError {
    #[error("unknown prayer: '{0}'")]
    UnknownPrayer(String),

    #[error("unknown goal unit: '{0}' (expected pages, juz, surah or completions)")]
    UnknownUnit(String),

    #[error("unknown period: '{0}' (expected daily, weekly or monthly)")]
    UnknownPeriod(String),

    #[error("malformed {kind} period key: '{value}'")]
    BadPeriodKey { kind: &'static str, value: String },

    #[error("malformed time '{0}', expected HH:MM")]
    BadTime(String),

    #[error("month {0} is out of range 1..=12")]
    BadMonth(u32),

    #[error("unknown azkar category: '{0}'")]
    UnknownCategory(String),

    #[error("unknown azkar item '{item}' in category '{category}'")]
    UnknownItem { category: String, item: String },

    #[error("{unit} goal is not valid for a {period} period")]
    UnitNotAllowed {
        unit: &'static str,
        period: &'static str,
    },
}
