use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

fn default_user_id() -> String {
    "local".to_string()
}
fn default_user_name() -> String {
    "Believer".to_string()
}
fn default_source() -> String {
    "table".to_string()
}
fn default_latitude() -> f64 {
    9.03
}
fn default_longitude() -> f64 {
    38.74
}
fn default_calc_method() -> String {
    "Egyptian".to_string()
}
fn default_madhab() -> String {
    "Shafi".to_string()
}
fn default_timezone_offset() -> i32 {
    180
}
fn default_quran_daily() -> i64 {
    50
}
fn default_azkar_points() -> BTreeMap<String, i64> {
    [
        ("morning", 20),
        ("evening", 20),
        ("after_salah", 15),
        ("sleep", 10),
        ("general", 10),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}
fn default_daily_target() -> u32 {
    5
}
fn default_weekly_target() -> u32 {
    50
}
fn default_monthly_target() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Opaque identity key; every stored document is keyed by it.
    #[serde(default = "default_user_id")]
    pub id: String,
    #[serde(default = "default_user_name")]
    pub name: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            id: default_user_id(),
            name: default_user_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// "table" or "calculated"
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_calc_method")]
    pub calc_method: String,
    #[serde(default = "default_madhab")]
    pub madhab: String,
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset: i32, // minutes from UTC
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            calc_method: default_calc_method(),
            madhab: default_madhab(),
            timezone_offset: default_timezone_offset(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsConfig {
    #[serde(default = "default_quran_daily")]
    pub quran_daily: i64,
    #[serde(default)]
    pub quran_weekly: i64,
    #[serde(default)]
    pub quran_monthly: i64,
    /// Category id -> points for completing that category in a day.
    #[serde(default = "default_azkar_points")]
    pub azkar: BTreeMap<String, i64>,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            quran_daily: default_quran_daily(),
            quran_weekly: 0,
            quran_monthly: 0,
            azkar: default_azkar_points(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_daily_target")]
    pub daily_target: u32,
    #[serde(default = "default_weekly_target")]
    pub weekly_target: u32,
    #[serde(default = "default_monthly_target")]
    pub monthly_target: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            daily_target: default_daily_target(),
            weekly_target: default_weekly_target(),
            monthly_target: default_monthly_target(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub user: UserConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub points: PointsConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "ramadan-faith")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("faith.db"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("Reading {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Parsing config.toml")
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.user.id, "local");
        assert_eq!(cfg.schedule.source, "table");
        assert_eq!(cfg.points.quran_daily, 50);
        assert_eq!(cfg.points.azkar.get("after_salah"), Some(&15));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [user]
            id = "abc123"

            [points]
            quran_weekly = 120
            "#,
        )
        .unwrap();
        assert_eq!(cfg.user.id, "abc123");
        assert_eq!(cfg.user.name, "Believer");
        assert_eq!(cfg.points.quran_weekly, 120);
        assert_eq!(cfg.points.quran_daily, 50);
        assert_eq!(cfg.points.azkar.len(), 5);
    }
}
