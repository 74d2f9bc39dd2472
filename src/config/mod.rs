use crate::errors::{AppError, AppResult};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Minutes after the scheduled start during which a check-in is on time.
    #[serde(default = "default_grace_period")]
    pub grace_period_minutes: i64,
    #[serde(default)]
    pub default_location: String,
}

fn default_grace_period() -> i64 {
    crate::core::classifier::DEFAULT_GRACE_MINUTES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            grace_period_minutes: default_grace_period(),
            default_location: String::new(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rattendance")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rattendance")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rattendance.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rattendance.sqlite")
    }

    /// `--db` value: `~` is expanded, relative names land in the config dir.
    pub fn resolve_db_path(name: &str) -> PathBuf {
        if name == ":memory:" {
            return PathBuf::from(name);
        }
        let p = crate::utils::path::expand_tilde(name);
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    pub fn grace_period(&self) -> Duration {
        crate::utils::time::grace_duration(self.grace_period_minutes)
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg: Config =
            serde_yaml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;

        Self::check_grace("grace_period_minutes", cfg.grace_period_minutes)?;

        Ok(cfg)
    }

    /// Grace periods must lie in `0..=MAX_GRACE_MINUTES`.
    pub fn check_grace(source: &str, minutes: i64) -> AppResult<i64> {
        let max = crate::core::classifier::MAX_GRACE_MINUTES;
        if !(0..=max).contains(&minutes) {
            return Err(AppError::Config(format!(
                "{source} must be between 0 and {max} minutes (found {minutes})"
            )));
        }
        Ok(minutes)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was configured.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        let db_path = match custom_name {
            Some(name) => Self::resolve_db_path(&name),
            None => Self::database_file(),
        };

        if !is_test {
            fs::create_dir_all(&dir)?;

            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };

            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path).map_err(|e| {
                io::Error::new(e.kind(), format!("{}: {}", db_path.display(), e))
            })?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = serde_yaml::from_str("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.grace_period_minutes, 15);
        assert_eq!(cfg.default_location, "");
        assert_eq!(cfg.grace_period(), Duration::minutes(15));
    }

    #[test]
    fn out_of_range_grace_is_rejected() {
        let path = std::env::temp_dir().join("rattendance_huge_grace.conf");
        fs::write(
            &path,
            "database: /tmp/x.sqlite\ngrace_period_minutes: 1000000000000\n",
        )
        .unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        fs::remove_file(&path).ok();

        assert!(Config::check_grace("--grace", -1).is_err());
        assert_eq!(Config::check_grace("--grace", 1440).unwrap(), 1440);
        assert!(Config::check_grace("--grace", 1441).is_err());
    }
}
