use crate::errors::{AppError, AppResult};
use chrono::{Duration, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Upper bound for the tie-break, grace and buffer settings.
const MAX_BUFFER_MINUTES: i64 = 1440;
const MAX_FALLBACK_HOURS: f64 = 48.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_tie_break")]
    pub context_tie_break_minutes: i64,
    #[serde(default = "default_late_grace")]
    pub late_grace_minutes: i64,
    #[serde(default = "default_auto_checkout_buffer")]
    pub auto_checkout_buffer_minutes: i64,
    #[serde(default = "default_fallback_hours")]
    pub fallback_session_hours: f64,
    #[serde(default = "default_reconcile_interval")]
    pub reconcile_interval_secs: u64,
    #[serde(default = "default_absence_sweep_time")]
    pub absence_sweep_time: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_timezone() -> String {
    "Europe/Istanbul".to_string()
}
fn default_tie_break() -> i64 {
    30
}
fn default_late_grace() -> i64 {
    15
}
fn default_auto_checkout_buffer() -> i64 {
    10
}
fn default_fallback_hours() -> f64 {
    8.0
}
fn default_reconcile_interval() -> u64 {
    300
}
fn default_absence_sweep_time() -> String {
    "23:55:00".to_string()
}
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

/// Tunables consumed by the core. Built from [`Config`] so the core never
/// reads files or the environment itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// How far before the regular start an overtime window must begin for a
    /// scan to be attributed to overtime.
    pub context_tie_break: Duration,
    pub late_grace: Duration,
    pub auto_checkout_buffer: Duration,
    pub fallback_session_hours: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            context_tie_break: Duration::minutes(default_tie_break()),
            late_grace: Duration::minutes(default_late_grace()),
            auto_checkout_buffer: Duration::minutes(default_auto_checkout_buffer()),
            fallback_session_hours: default_fallback_hours(),
        }
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            timezone: default_timezone(),
            context_tie_break_minutes: default_tie_break(),
            late_grace_minutes: default_late_grace(),
            auto_checkout_buffer_minutes: default_auto_checkout_buffer(),
            fallback_session_hours: default_fallback_hours(),
            reconcile_interval_secs: default_reconcile_interval(),
            absence_sweep_time: default_absence_sweep_time(),
            log_filter: default_log_filter(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("guardshift")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".guardshift")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("guardshift.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("guardshift.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg: Config =
            serde_yaml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the core cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        self.tz()?;
        self.sweep_time()?;
        for (name, minutes) in [
            ("context_tie_break_minutes", self.context_tie_break_minutes),
            ("late_grace_minutes", self.late_grace_minutes),
            ("auto_checkout_buffer_minutes", self.auto_checkout_buffer_minutes),
        ] {
            if !(0..=MAX_BUFFER_MINUTES).contains(&minutes) {
                return Err(AppError::Config(format!(
                    "{name} must be between 0 and {MAX_BUFFER_MINUTES}, got {minutes}"
                )));
            }
        }
        let hours = self.fallback_session_hours;
        // NaN fails both comparisons.
        if !(hours > 0.0 && hours <= MAX_FALLBACK_HOURS) {
            return Err(AppError::Config(format!(
                "fallback_session_hours must be in (0, {MAX_FALLBACK_HOURS}], got {hours}"
            )));
        }
        if self.reconcile_interval_secs == 0 {
            return Err(AppError::Config(
                "reconcile_interval_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn tz(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::Config(format!("unknown timezone '{}'", self.timezone)))
    }

    pub fn sweep_time(&self) -> AppResult<NaiveTime> {
        crate::utils::time::parse_time(&self.absence_sweep_time)
            .ok_or_else(|| AppError::InvalidTime(self.absence_sweep_time.clone()))
    }

    pub fn settings(&self) -> Settings {
        Settings {
            context_tie_break: Duration::minutes(self.context_tie_break_minutes),
            late_grace: Duration::minutes(self.late_grace_minutes),
            auto_checkout_buffer: Duration::minutes(self.auto_checkout_buffer_minutes),
            fallback_session_hours: self.fallback_session_hours,
        }
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            dir.join("guardshift.sqlite")
        };

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config = Self::with_database(db_path);

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        Ok(config)
    }

    pub fn to_yaml(&self) -> io::Result<String> {
        serde_yaml::to_string(self).map_err(io::Error::other)
    }
}
